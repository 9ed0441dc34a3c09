use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use crate::utils::base64_encode;

use super::config::{ML_API_URL, PREDICTION_TIMEOUT_SECS};
use super::errors::ClassifierError;
use super::types::{Classification, ClassifierResponse, ImageUpload};

/// External image classifier
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, image: &ImageUpload) -> Result<Classification, ClassifierError>;
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    image: String,
    filename: &'a str,
}

/// Classifier reached over HTTP with a JSON `{image, filename}` body.
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpClassifier {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClassifierError::Unreachable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    /// Build from `ML_API_URL` and `PREDICTION_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ClassifierError> {
        Self::new(
            ML_API_URL.as_str(),
            Duration::from_secs(*PREDICTION_TIMEOUT_SECS),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, image: &ImageUpload) -> Result<Classification, ClassifierError> {
        let body = ClassifyRequest {
            image: base64_encode(&image.bytes),
            filename: &image.filename,
        };

        tracing::debug!(
            endpoint = %self.endpoint,
            bytes = image.bytes.len(),
            "Sending image to classifier"
        );

        let response = self.client.post(&self.endpoint).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Classifier returned an error status");
            return Err(ClassifierError::Status(status.as_u16()));
        }

        let raw: ClassifierResponse = response.json().await?;
        raw.into_classification()
    }
}
