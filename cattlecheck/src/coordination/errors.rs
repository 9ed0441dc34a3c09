//! Caller-facing error taxonomy

use thiserror::Error;

use crate::credential::CredentialError;
use crate::otp::OtpError;
use crate::prediction::{ClassifierError, PredictionError, ReportError};
use crate::userdb::UserError;

/// Errors surfaced by the authentication and prediction flows
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinationError {
    /// Missing or malformed request data
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No valid session credential
    #[error("Authentication required")]
    Unauthenticated,

    /// Authenticated, but the role does not allow the operation
    #[error("Access denied")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(String),

    /// First phone sign-in needs a display name
    #[error("Name is required for new users")]
    NameRequired,

    /// Code missing, expired or wrong. Deliberately not more specific.
    #[error("Invalid or expired OTP")]
    VerificationFailed,

    #[error("Prediction service unavailable. Please try again later.")]
    ServiceUnavailable,

    #[error("Prediction failed")]
    PredictionFailed,

    /// Storage or configuration fault; detail is only logged
    #[error("Internal server error")]
    Internal,
}

impl CoordinationError {
    /// Log the error and return self
    pub fn log(self) -> Self {
        match &self {
            Self::Internal | Self::ServiceUnavailable | Self::PredictionFailed => {
                tracing::error!("{}", self)
            }
            _ => tracing::debug!("{}", self),
        }
        self
    }
}

impl From<UserError> for CoordinationError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound => Self::NotFound("User".to_string()),
            UserError::NameRequired => Self::NameRequired,
            UserError::InvalidData(msg) => Self::InvalidInput(msg),
            UserError::Conflict(msg) => {
                tracing::warn!("Identity conflict: {}", msg);
                Self::InvalidInput("Account already exists with these details".to_string())
            }
            UserError::Storage(msg) => {
                tracing::error!("User storage error: {}", msg);
                Self::Internal
            }
        }
    }
}

impl From<OtpError> for CoordinationError {
    fn from(err: OtpError) -> Self {
        match err {
            OtpError::NotFound | OtpError::Expired | OtpError::Mismatch => {
                tracing::info!("OTP verification failed: {}", err);
                Self::VerificationFailed
            }
            OtpError::Storage(_) | OtpError::Crypto(_) => {
                tracing::error!("OTP error: {}", err);
                Self::Internal
            }
        }
    }
}

impl From<CredentialError> for CoordinationError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Malformed | CredentialError::BadSignature | CredentialError::Expired => {
                tracing::debug!("Credential rejected: {}", err);
                Self::Unauthenticated
            }
            CredentialError::Config(_) | CredentialError::Signing(_) => {
                tracing::error!("Credential error: {}", err);
                Self::Internal
            }
        }
    }
}

impl From<ReportError> for CoordinationError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::NotFound => Self::NotFound("Report".to_string()),
            ReportError::Storage(_) | ReportError::InvalidData(_) => {
                tracing::error!("Report error: {}", err);
                Self::Internal
            }
        }
    }
}

impl From<PredictionError> for CoordinationError {
    fn from(err: PredictionError) -> Self {
        match err {
            PredictionError::InvalidInput(msg) => Self::InvalidInput(msg),
            PredictionError::Classifier(ClassifierError::Unreachable(msg)) => {
                tracing::error!("Classifier unreachable: {}", msg);
                Self::ServiceUnavailable
            }
            PredictionError::Classifier(e) => {
                tracing::error!("Classifier error: {}", e);
                Self::PredictionFailed
            }
            PredictionError::Report(e) => e.into(),
            PredictionError::Id(e) => {
                tracing::error!("Report id error: {}", e);
                Self::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_sub_reasons_collapse() {
        for err in [OtpError::NotFound, OtpError::Expired, OtpError::Mismatch] {
            assert_eq!(CoordinationError::from(err), CoordinationError::VerificationFailed);
        }
    }

    #[test]
    fn test_credential_failures_are_unauthenticated() {
        assert_eq!(
            CoordinationError::from(CredentialError::Expired),
            CoordinationError::Unauthenticated
        );
        assert_eq!(
            CoordinationError::from(CredentialError::Config("x".to_string())),
            CoordinationError::Internal
        );
    }

    #[test]
    fn test_classifier_failures() {
        let unreachable = PredictionError::Classifier(ClassifierError::Unreachable("x".into()));
        let timeout = PredictionError::Classifier(ClassifierError::Timeout);

        assert_eq!(
            CoordinationError::from(unreachable),
            CoordinationError::ServiceUnavailable
        );
        assert_eq!(
            CoordinationError::from(timeout),
            CoordinationError::PredictionFailed
        );
    }

    #[test]
    fn test_storage_detail_not_exposed() {
        let err = CoordinationError::from(UserError::Storage("disk on fire".to_string()));

        assert_eq!(err, CoordinationError::Internal);
        assert_eq!(err.to_string(), "Internal server error");
    }
}
