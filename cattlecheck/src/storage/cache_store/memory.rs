use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::storage::errors::StorageError;
use crate::storage::types::CacheData;

use super::types::{CacheStore, InMemoryCacheStore};

const CACHE_PREFIX: &str = "cache";

impl InMemoryCacheStore {
    pub(crate) fn new() -> Self {
        tracing::info!("Creating new in-memory generic cache store");
        Self {
            entry: HashMap::new(),
        }
    }

    fn make_key(prefix: &str, key: &str) -> String {
        format!("{CACHE_PREFIX}:{prefix}:{key}")
    }

    fn live(&self, key: &str) -> Option<&CacheData> {
        match self.entry.get(key) {
            Some((_, Some(deadline))) if *deadline <= Instant::now() => None,
            Some((value, _)) => Some(value),
            None => None,
        }
    }

    fn purge_expired(&mut self) {
        let now = Instant::now();
        self.entry
            .retain(|_, (_, deadline)| deadline.is_none_or(|d| d > now));
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn init(&self) -> Result<(), StorageError> {
        Ok(()) // Nothing to initialize for in-memory store
    }

    async fn put_with_ttl(
        &mut self,
        prefix: &str,
        key: &str,
        value: CacheData,
        ttl: usize,
    ) -> Result<(), StorageError> {
        self.purge_expired();
        let key = Self::make_key(prefix, key);
        let deadline = Instant::now() + Duration::from_secs(ttl as u64);
        self.entry.insert(key, (value, Some(deadline)));
        Ok(())
    }

    async fn get(&self, prefix: &str, key: &str) -> Result<Option<CacheData>, StorageError> {
        let key = Self::make_key(prefix, key);
        Ok(self.live(&key).cloned())
    }

    async fn remove(&mut self, prefix: &str, key: &str) -> Result<(), StorageError> {
        let key = Self::make_key(prefix, key);
        self.entry.remove(&key);
        Ok(())
    }

    async fn remove_if_eq(
        &mut self,
        prefix: &str,
        key: &str,
        expected: &CacheData,
    ) -> Result<bool, StorageError> {
        let key = Self::make_key(prefix, key);
        if self.live(&key) == Some(expected) {
            self.entry.remove(&key);
            return Ok(true);
        }
        Ok(false)
    }
}
