use std::{env, sync::LazyLock};

use crate::storage::DB_TABLE_PREFIX;

/// Classifier endpoint
pub static ML_API_URL: LazyLock<String> = LazyLock::new(|| {
    env::var("ML_API_URL").unwrap_or_else(|_| "http://localhost:5000/predict".to_string())
});

/// Largest accepted image payload, 10 MiB by default
pub static PREDICTION_MAX_IMAGE_BYTES: LazyLock<usize> = LazyLock::new(|| {
    env::var("PREDICTION_MAX_IMAGE_BYTES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10 * 1024 * 1024)
});

/// Classifier round-trip timeout
pub static PREDICTION_TIMEOUT_SECS: LazyLock<u64> = LazyLock::new(|| {
    env::var("PREDICTION_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(30)
});

/// Reports table name
pub(crate) static DB_TABLE_REPORTS: LazyLock<String> = LazyLock::new(|| {
    env::var("DB_TABLE_REPORTS").unwrap_or_else(|_| format!("{}{}", *DB_TABLE_PREFIX, "reports"))
});

/// Base64 characters of the image kept in a report's image reference
pub(super) const IMAGE_REF_PREFIX_CHARS: usize = 100;

pub(super) const NO_DISEASE: &str = "None";
pub(super) const NO_STAGE: &str = "N/A";
