use thiserror::Error;

use crate::storage::StorageError;
use crate::utils::UtilError;

/// Failure talking to the external classifier
#[derive(Debug, Error, Clone)]
pub enum ClassifierError {
    #[error("Classifier unreachable: {0}")]
    Unreachable(String),

    #[error("Classifier timed out")]
    Timeout,

    #[error("Classifier returned status {0}")]
    Status(u16),

    #[error("Malformed classifier response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ClassifierError {
    fn from(err: reqwest::Error) -> Self {
        // Timeout first: a connect timeout is both
        if err.is_timeout() {
            ClassifierError::Timeout
        } else if err.is_connect() {
            ClassifierError::Unreachable(err.to_string())
        } else if err.is_decode() {
            ClassifierError::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            ClassifierError::Status(status.as_u16())
        } else {
            ClassifierError::Unreachable(err.to_string())
        }
    }
}

#[derive(Debug, Error, Clone)]
pub enum ReportError {
    #[error("Report not found")]
    NotFound,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<sqlx::Error> for ReportError {
    fn from(err: sqlx::Error) -> Self {
        ReportError::Storage(err.to_string())
    }
}

impl From<StorageError> for ReportError {
    fn from(err: StorageError) -> Self {
        ReportError::Storage(err.to_string())
    }
}

#[derive(Debug, Error, Clone)]
pub enum PredictionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("Id generation failed: {0}")]
    Id(#[from] UtilError),
}
