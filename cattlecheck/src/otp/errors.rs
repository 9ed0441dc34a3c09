use thiserror::Error;

use crate::storage::StorageError;
use crate::utils::UtilError;

#[derive(Debug, Error, Clone)]
pub enum OtpError {
    #[error("No pending challenge")]
    NotFound,

    #[error("Challenge expired")]
    Expired,

    #[error("Code mismatch")]
    Mismatch,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Crypto error: {0}")]
    Crypto(String),
}

impl From<StorageError> for OtpError {
    fn from(err: StorageError) -> Self {
        OtpError::Storage(err.to_string())
    }
}

impl From<UtilError> for OtpError {
    fn from(err: UtilError) -> Self {
        OtpError::Crypto(err.to_string())
    }
}

#[derive(Debug, Error, Clone)]
pub enum DeliveryError {
    #[error("Message delivery not configured")]
    NotConfigured,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Provider rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        DeliveryError::Transport(err.to_string())
    }
}
