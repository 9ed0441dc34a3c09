use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CredentialError {
    #[error("Malformed credential")]
    Malformed,

    #[error("Bad credential signature")]
    BadSignature,

    #[error("Credential expired")]
    Expired,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Signing error: {0}")]
    Signing(String),
}
