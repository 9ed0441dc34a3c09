use thiserror::Error;

#[derive(Clone, Error, Debug)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Name required for new user")]
    NameRequired,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<sqlx::Error> for UserError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                UserError::Conflict(db_err.message().to_string())
            }
            _ => UserError::Storage(err.to_string()),
        }
    }
}

impl From<crate::storage::StorageError> for UserError {
    fn from(err: crate::storage::StorageError) -> Self {
        UserError::Storage(err.to_string())
    }
}
