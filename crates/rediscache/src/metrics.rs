//! Per-operation metrics for the cache facade.
//!
//! Every facade operation reports its outcome twice: to atomics owned by the
//! facade (read back with [`CacheMetrics::snapshot`]) and to the process-wide
//! `metrics` recorder, if the host application installed one.

use metrics::{counter, histogram};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rediscache_core::Result;

/// Describes the series emitted by this crate.
/// Call once at startup, after installing the recorder.
pub fn register_cache_metrics() {
    metrics::describe_counter!("rediscache_hits_total", "GET requests that found a value");
    metrics::describe_counter!("rediscache_misses_total", "GET requests for absent or expired keys");
    metrics::describe_counter!(
        "rediscache_errors_total",
        "Operations that failed with a connection error"
    );
    metrics::describe_counter!(
        "rediscache_deleted_keys_total",
        "Keys removed through DEL or wildcard delete"
    );
    metrics::describe_histogram!(
        "rediscache_operation_seconds",
        "Round-trip time of cache operations, by operation and outcome"
    );
}

/// How an operation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    NotFound,
    Error,
}

impl Outcome {
    /// Classifies an operation result.
    pub fn of<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self::Ok,
            Err(e) if e.is_not_found() => Self::NotFound,
            Err(_) => Self::Error,
        }
    }

    /// Label value used in the `outcome` dimension.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NotFound => "not_found",
            Self::Error => "error",
        }
    }
}

/// Point-in-time copy of a facade's counters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub errors: u64,
    pub deleted_keys: u64,
}

impl MetricsSnapshot {
    /// Fraction of GET requests that found a value, 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    errors: AtomicU64,
    deleted_keys: AtomicU64,
}

/// Counters shared by a facade and all its clones.
#[derive(Debug, Clone, Default)]
pub struct CacheMetrics {
    counters: Arc<Counters>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the duration and outcome of `operation`.
    ///
    /// Connection errors also bump the error counter.
    pub fn record<T>(&self, operation: &'static str, result: &Result<T>, elapsed: Duration) -> Outcome {
        let outcome = Outcome::of(result);

        if outcome == Outcome::Error {
            self.counters.errors.fetch_add(1, Ordering::Relaxed);
            counter!("rediscache_errors_total", "operation" => operation).increment(1);
        }

        histogram!(
            "rediscache_operation_seconds",
            "operation" => operation,
            "outcome" => outcome.as_str()
        )
        .record(elapsed.as_secs_f64());

        outcome
    }

    /// Counts a GET as hit or miss. Errors are neither.
    pub fn record_lookup(&self, outcome: Outcome) {
        match outcome {
            Outcome::Ok => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                counter!("rediscache_hits_total").increment(1);
            },
            Outcome::NotFound => {
                self.counters.misses.fetch_add(1, Ordering::Relaxed);
                counter!("rediscache_misses_total").increment(1);
            },
            Outcome::Error => {},
        }
    }

    /// Adds keys removed by a delete.
    pub fn record_deleted(&self, count: u64) {
        if count == 0 {
            return;
        }
        self.counters.deleted_keys.fetch_add(count, Ordering::Relaxed);
        counter!("rediscache_deleted_keys_total").increment(count);
    }

    /// Returns the current counter values.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            errors: self.counters.errors.load(Ordering::Relaxed),
            deleted_keys: self.counters.deleted_keys.load(Ordering::Relaxed),
        }
    }
}
