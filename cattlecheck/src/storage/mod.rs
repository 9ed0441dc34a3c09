mod cache_store;
mod data_store;
mod errors;
mod schema_validation;
mod types;

pub use cache_store::{
    CacheStore, SharedCacheStore, cache_store_from_env, in_memory_cache_store, redis_cache_store,
};
pub use data_store::{DB_TABLE_PREFIX, DataStore, connect_data_store, data_store_from_env};
pub use errors::StorageError;
pub use types::CacheData;

pub(crate) use schema_validation::{validate_postgres_table_schema, validate_sqlite_table_schema};
