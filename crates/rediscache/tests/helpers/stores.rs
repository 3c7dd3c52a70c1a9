//! Stores de prueba.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rediscache::{CacheError, CacheStore, Expiration, MemoryStore, RedisCache, Result};

/// Crea un facade sobre un MemoryStore vacio.
pub fn memory_cache() -> RedisCache {
    RedisCache::with_store(Arc::new(MemoryStore::new()))
}

/// Store que falla siempre con un error de conexion.
/// Cuenta las llamadas para verificar cuando el facade no contacta al store.
#[derive(Debug, Default)]
pub struct UnreachableStore {
    calls: AtomicUsize,
}

impl UnreachableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Numero de llamadas recibidas.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(CacheError::connection("connection refused"))
    }
}

#[async_trait]
impl CacheStore for UnreachableStore {
    async fn set(&self, _key: &str, _value: &str, _expiration: Expiration) -> Result<()> {
        self.fail()
    }

    async fn get(&self, _key: &str) -> Result<String> {
        self.fail()
    }

    async fn del(&self, _keys: &[String]) -> Result<u64> {
        self.fail()
    }

    async fn keys(&self, _pattern: &str) -> Result<Vec<String>> {
        self.fail()
    }

    async fn ping(&self) -> Result<()> {
        self.fail()
    }

    fn name(&self) -> &str {
        "unreachable"
    }
}
