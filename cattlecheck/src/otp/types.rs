use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{CacheData, StorageError};

/// Challenge record as kept in the cache store, keyed by phone
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub(super) struct StoredChallenge {
    pub(super) phone: String,
    pub(super) code: String,
    pub(super) created_at: DateTime<Utc>,
    pub(super) expires_at: DateTime<Utc>,
}

impl TryFrom<&StoredChallenge> for CacheData {
    type Error = StorageError;

    fn try_from(data: &StoredChallenge) -> Result<Self, Self::Error> {
        Ok(Self {
            value: serde_json::to_string(data)?,
        })
    }
}

impl TryFrom<CacheData> for StoredChallenge {
    type Error = StorageError;

    fn try_from(data: CacheData) -> Result<Self, Self::Error> {
        serde_json::from_str(&data.value).map_err(|e| StorageError::Serde(e.to_string()))
    }
}

/// A freshly issued code, handed to the caller for delivery.
#[derive(Debug, Clone)]
pub struct IssuedChallenge {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}
