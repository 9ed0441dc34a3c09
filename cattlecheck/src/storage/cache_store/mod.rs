mod config;
mod memory;
mod redis;
mod types;

pub use config::{cache_store_from_env, in_memory_cache_store, redis_cache_store};
pub use types::{CacheStore, SharedCacheStore};
