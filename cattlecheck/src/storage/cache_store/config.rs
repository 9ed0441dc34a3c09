use std::sync::Arc;
use std::{env, sync::LazyLock};
use tokio::sync::Mutex;

use crate::storage::errors::StorageError;

use super::types::{CacheStore, InMemoryCacheStore, RedisCacheStore, SharedCacheStore};

static GENERIC_CACHE_STORE_TYPE: LazyLock<String> = LazyLock::new(|| {
    env::var("GENERIC_CACHE_STORE_TYPE").unwrap_or_else(|_| "memory".to_string())
});

static GENERIC_CACHE_STORE_URL: LazyLock<String> =
    LazyLock::new(|| env::var("GENERIC_CACHE_STORE_URL").unwrap_or_default());

/// Build the cache store selected by `GENERIC_CACHE_STORE_TYPE` ("memory" or "redis").
pub async fn cache_store_from_env() -> Result<SharedCacheStore, StorageError> {
    let store_type = GENERIC_CACHE_STORE_TYPE.as_str();
    let store_url = GENERIC_CACHE_STORE_URL.as_str();

    tracing::info!(
        "Initializing cache store with type: {}, url: {}",
        store_type,
        store_url
    );

    match store_type {
        "memory" => Ok(in_memory_cache_store()),
        "redis" => redis_cache_store(store_url).await,
        t => Err(StorageError::Config(format!(
            "Unsupported cache store type: {t}. Supported types are 'memory' and 'redis'"
        ))),
    }
}

/// A process-local cache store. Only valid for a single-instance deployment.
pub fn in_memory_cache_store() -> SharedCacheStore {
    Arc::new(Mutex::new(Box::new(InMemoryCacheStore::new())))
}

/// A Redis-backed cache store; the connection is verified before returning.
pub async fn redis_cache_store(url: &str) -> Result<SharedCacheStore, StorageError> {
    let client = redis::Client::open(url)?;
    let store = RedisCacheStore { client };
    store.init().await?;

    tracing::info!("Connected to cache store: type=redis, url={}", url);

    Ok(Arc::new(Mutex::new(Box::new(store))))
}
