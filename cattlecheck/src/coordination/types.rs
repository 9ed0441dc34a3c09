use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::prediction::{HealthStatus, PredictionReport};
use crate::userdb::{Role, User};

/// Identity claims asserted by the OAuth provider, as forwarded by the client
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthClaims {
    #[serde(alias = "googleId", alias = "google_id")]
    pub subject: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

/// Public projection of a [`User`]
///
/// Each sign-in flow binds a single contact: OAuth accounts carry `email`,
/// phone accounts carry `phone`. Accounts are never linked across flows, so
/// at most one of the two is serialized.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserView {
    pub user_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub role: Role,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            picture: user.picture.clone(),
            role: user.role,
        }
    }
}

/// Result of a successful sign-in
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserView,
}

/// Outcome of a code send
#[derive(Debug, Clone, Serialize)]
pub struct OtpDispatch {
    pub delivered: bool,
    pub expires_at: DateTime<Utc>,
    /// Only set when delivery failed and code exposure is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic_code: Option<String>,
}

/// What a client sees right after a prediction; the image reference is left out.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportSummary {
    pub report_id: String,
    pub status: HealthStatus,
    pub disease_name: String,
    pub stage: String,
    pub confidence: f64,
    pub precautions: Vec<String>,
    pub recommendations: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<PredictionReport> for ReportSummary {
    fn from(report: PredictionReport) -> Self {
        Self {
            report_id: report.report_id,
            status: report.status,
            disease_name: report.disease_name,
            stage: report.stage,
            confidence: report.confidence,
            precautions: report.precautions,
            recommendations: report.recommendations,
            timestamp: report.created_at,
        }
    }
}
