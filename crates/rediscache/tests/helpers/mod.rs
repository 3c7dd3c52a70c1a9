//! Test helpers para rediscache.

#![allow(dead_code, unused_imports)]

pub mod stores;

pub use stores::{UnreachableStore, memory_cache};

use std::sync::Once;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static TRACING: Once = Once::new();

/// Inicializa tracing una sola vez por binario de test.
/// Usa `RUST_LOG` si esta definido, si no `warn`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    });
}
