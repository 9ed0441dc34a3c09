use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use thiserror::Error;

use super::config::{NO_DISEASE, NO_STAGE};
use super::errors::ClassifierError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Diseased,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("Unknown health status: {0}")]
pub struct StatusParseError(String);

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::Diseased => "Diseased",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for HealthStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "healthy" => Ok(HealthStatus::Healthy),
            "diseased" => Ok(HealthStatus::Diseased),
            _ => Err(StatusParseError(s.to_string())),
        }
    }
}

impl TryFrom<String> for HealthStatus {
    type Error = StatusParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Image submitted for classification
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub mime: String,
    pub filename: String,
}

/// Body returned by the classifier service
#[derive(Debug, Deserialize)]
pub(super) struct ClassifierResponse {
    pub(super) status: String,
    #[serde(default)]
    pub(super) disease_name: Option<String>,
    #[serde(default)]
    pub(super) stage: Option<String>,
    pub(super) confidence: f64,
    #[serde(default)]
    pub(super) precautions: Vec<String>,
    #[serde(default)]
    pub(super) recommendations: Vec<String>,
}

/// A validated classification, with sentinels applied
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub status: HealthStatus,
    pub disease_name: String,
    pub stage: String,
    pub confidence: f64,
    pub precautions: Vec<String>,
    pub recommendations: Vec<String>,
}

impl ClassifierResponse {
    /// Check the status and confidence, and apply the sentinels.
    pub(super) fn into_classification(self) -> Result<Classification, ClassifierError> {
        let raw = self;
        let status: HealthStatus = raw
            .status
            .parse()
            .map_err(|e: StatusParseError| ClassifierError::Malformed(e.to_string()))?;

        if !(0.0..=100.0).contains(&raw.confidence) {
            return Err(ClassifierError::Malformed(format!(
                "Confidence out of range: {}",
                raw.confidence
            )));
        }

        let (disease_name, stage) = match status {
            HealthStatus::Healthy => (NO_DISEASE.to_string(), NO_STAGE.to_string()),
            HealthStatus::Diseased => (
                non_blank(raw.disease_name).unwrap_or_else(|| NO_DISEASE.to_string()),
                non_blank(raw.stage).unwrap_or_else(|| NO_STAGE.to_string()),
            ),
        };

        Ok(Classification {
            status,
            disease_name,
            stage,
            confidence: raw.confidence,
            precautions: raw.precautions,
            recommendations: raw.recommendations,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Persisted outcome of one successful classification
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct PredictionReport {
    pub report_id: String,
    pub user_id: String,
    /// Owner's display name at the time of the prediction
    pub user_name: String,
    #[sqlx(try_from = "String")]
    pub status: HealthStatus,
    pub disease_name: String,
    pub stage: String,
    pub confidence: f64,
    #[sqlx(json)]
    pub precautions: Vec<String>,
    #[sqlx(json)]
    pub recommendations: Vec<String>,
    /// `data:<mime>;base64,<prefix>...`, never the full image
    pub image_ref: String,
    pub created_at: DateTime<Utc>,
}

/// Optional filters for the privileged report listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportFilter {
    pub status: Option<HealthStatus>,
    pub disease_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportPage {
    pub reports: Vec<PredictionReport>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

impl ReportPage {
    pub fn total_pages(&self) -> i64 {
        if self.limit == 0 {
            return 0;
        }
        (self.total + self.limit as i64 - 1) / self.limit as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(status: &str, disease: Option<&str>, stage: Option<&str>, confidence: f64) -> ClassifierResponse {
        ClassifierResponse {
            status: status.to_string(),
            disease_name: disease.map(str::to_string),
            stage: stage.map(str::to_string),
            confidence,
            precautions: vec!["Isolate".to_string()],
            recommendations: vec![],
        }
    }

    #[test]
    fn test_healthy_uses_sentinels() {
        // Given a healthy result that still names a disease label
        let classification =
            raw("Healthy", Some("Healthy"), Some("N/A"), 92.5).into_classification().unwrap();

        assert_eq!(classification.status, HealthStatus::Healthy);
        assert_eq!(classification.disease_name, "None");
        assert_eq!(classification.stage, "N/A");
    }

    #[test]
    fn test_diseased_keeps_fields_and_defaults_missing() {
        let full =
            raw("Diseased", Some("Foot Rot"), Some("Early"), 87.0).into_classification()
                .unwrap();
        let partial = raw("diseased", Some(" "), None, 60.0).into_classification().unwrap();

        assert_eq!(full.disease_name, "Foot Rot");
        assert_eq!(full.stage, "Early");
        assert_eq!(full.precautions, vec!["Isolate".to_string()]);
        assert_eq!(partial.disease_name, "None");
        assert_eq!(partial.stage, "N/A");
    }

    #[test]
    fn test_rejects_unknown_status_and_bad_confidence() {
        assert!(raw("Sick", None, None, 50.0).into_classification().is_err());
        assert!(raw("Diseased", None, None, 100.5).into_classification().is_err());
        assert!(raw("Diseased", None, None, -1.0).into_classification().is_err());
        assert!(raw("Diseased", None, None, f64::NAN).into_classification().is_err());
    }

    #[test]
    fn test_response_defaults_missing_lists() {
        let parsed: ClassifierResponse =
            serde_json::from_str(r#"{"status":"Healthy","confidence":99}"#).unwrap();

        assert!(parsed.precautions.is_empty());
        assert_eq!(parsed.disease_name, None);
    }

    #[test]
    fn test_total_pages() {
        let page = ReportPage {
            reports: vec![],
            total: 21,
            page: 1,
            limit: 10,
        };
        assert_eq!(page.total_pages(), 3);
    }
}
