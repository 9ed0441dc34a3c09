use chrono::Utc;
use std::sync::Arc;

use crate::utils::{base64_encode, gen_report_id};

use super::classifier::Classifier;
use super::config::{IMAGE_REF_PREFIX_CHARS, PREDICTION_MAX_IMAGE_BYTES};
use super::errors::PredictionError;
use super::storage::ReportStore;
use super::types::{ImageUpload, PredictionReport};

/// Validates an upload, classifies it and records the outcome.
#[derive(Clone)]
pub struct PredictionPipeline {
    classifier: Arc<dyn Classifier>,
    reports: ReportStore,
    max_bytes: usize,
}

impl PredictionPipeline {
    pub fn new(classifier: Arc<dyn Classifier>, reports: ReportStore, max_bytes: usize) -> Self {
        Self {
            classifier,
            reports,
            max_bytes,
        }
    }

    /// A pipeline using the `PREDICTION_MAX_IMAGE_BYTES` ceiling.
    pub fn with_default_limit(classifier: Arc<dyn Classifier>, reports: ReportStore) -> Self {
        Self::new(classifier, reports, *PREDICTION_MAX_IMAGE_BYTES)
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn reports(&self) -> &ReportStore {
        &self.reports
    }

    #[tracing::instrument(skip(self, user_name, image), fields(mime = %image.mime, bytes = image.bytes.len()))]
    pub async fn submit(
        &self,
        user_id: &str,
        user_name: &str,
        image: ImageUpload,
    ) -> Result<PredictionReport, PredictionError> {
        self.validate(&image)?;

        let classification = self.classifier.classify(&image).await.inspect_err(|e| {
            tracing::warn!(error = %e, "Classification failed");
        })?;

        let now = Utc::now();
        let report = PredictionReport {
            report_id: gen_report_id(now)?,
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            status: classification.status,
            disease_name: classification.disease_name,
            stage: classification.stage,
            confidence: classification.confidence,
            precautions: classification.precautions,
            recommendations: classification.recommendations,
            image_ref: image_ref(&image),
            created_at: now,
        };

        self.reports.insert(&report).await?;

        tracing::info!(
            report_id = %report.report_id,
            status = %report.status,
            "Prediction report recorded"
        );

        Ok(report)
    }

    fn validate(&self, image: &ImageUpload) -> Result<(), PredictionError> {
        if !image.mime.to_ascii_lowercase().starts_with("image/") {
            return Err(PredictionError::InvalidInput(
                "Only image files are allowed".to_string(),
            ));
        }
        if image.bytes.is_empty() {
            return Err(PredictionError::InvalidInput("No image uploaded".to_string()));
        }
        if image.bytes.len() > self.max_bytes {
            return Err(PredictionError::InvalidInput(format!(
                "Image exceeds the {} byte limit",
                self.max_bytes
            )));
        }
        Ok(())
    }
}

/// Bounded reference to the image: the MIME type and the first characters of its base64 form.
fn image_ref(image: &ImageUpload) -> String {
    // 75 raw bytes encode to exactly 100 base64 characters
    let head = &image.bytes[..image.bytes.len().min(IMAGE_REF_PREFIX_CHARS / 4 * 3)];
    let encoded = base64_encode(head);
    let prefix = &encoded[..encoded.len().min(IMAGE_REF_PREFIX_CHARS)];
    format!("data:{};base64,{}...", image.mime, prefix)
}
