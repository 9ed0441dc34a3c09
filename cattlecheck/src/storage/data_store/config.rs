//! Database connection and table configuration

use std::sync::Arc;
use std::{env, str::FromStr, sync::LazyLock};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::storage::errors::StorageError;

use super::types::{DataStore, PostgresDataStore, SqliteDataStore};

static GENERIC_DATA_STORE_TYPE: LazyLock<String> = LazyLock::new(|| {
    env::var("GENERIC_DATA_STORE_TYPE").unwrap_or_else(|_| "sqlite".to_string())
});

static GENERIC_DATA_STORE_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("GENERIC_DATA_STORE_URL").unwrap_or_else(|_| "sqlite:./cattlecheck.db".to_string())
});

/// Table prefix from environment variable
pub static DB_TABLE_PREFIX: LazyLock<String> =
    LazyLock::new(|| env::var("DB_TABLE_PREFIX").unwrap_or_else(|_| "cc_".to_string()));

/// Connect to the data store selected by `GENERIC_DATA_STORE_TYPE` / `GENERIC_DATA_STORE_URL`.
pub fn data_store_from_env() -> Result<Arc<dyn DataStore>, StorageError> {
    connect_data_store(
        GENERIC_DATA_STORE_TYPE.as_str(),
        GENERIC_DATA_STORE_URL.as_str(),
    )
}

/// Connect lazily to a data store of the given type ("sqlite" or "postgres").
///
/// In-memory SQLite databases live only as long as their connection, so they are
/// pinned to a single never-recycled connection.
pub fn connect_data_store(
    store_type: &str,
    store_url: &str,
) -> Result<Arc<dyn DataStore>, StorageError> {
    tracing::info!(
        "Initializing data store with type: {}, url: {}",
        store_type,
        store_url
    );

    let store: Arc<dyn DataStore> = match store_type {
        "sqlite" => {
            let opts = SqliteConnectOptions::from_str(store_url)
                .map_err(|e| StorageError::Config(format!("Invalid SQLite URL: {e}")))?
                .create_if_missing(true);

            let pool = if is_in_memory_sqlite(store_url) {
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .min_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect_lazy_with(opts)
            } else {
                SqlitePoolOptions::new().connect_lazy_with(opts)
            };

            Arc::new(SqliteDataStore { pool })
        }
        "postgres" => Arc::new(PostgresDataStore {
            pool: sqlx::PgPool::connect_lazy(store_url)
                .map_err(|e| StorageError::Config(format!("Invalid Postgres URL: {e}")))?,
        }),
        t => {
            return Err(StorageError::Config(format!(
                "Unsupported store type: {t}. Supported types are 'sqlite' and 'postgres'"
            )));
        }
    };

    tracing::info!("Data store ready: type={}, url={}", store_type, store_url);

    Ok(store)
}

fn is_in_memory_sqlite(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
