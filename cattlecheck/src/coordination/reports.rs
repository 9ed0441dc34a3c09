use crate::prediction::{ImageUpload, PredictionPipeline, PredictionReport, ReportStore};
use crate::userdb::{User, UserStore};

use super::errors::CoordinationError;
use super::types::ReportSummary;

/// Prediction submission and owner-scoped report management.
#[derive(Clone)]
pub struct ReportCoordinator {
    pub(super) pipeline: PredictionPipeline,
    pub(super) reports: ReportStore,
    pub(super) users: UserStore,
}

impl ReportCoordinator {
    pub fn new(pipeline: PredictionPipeline, users: UserStore) -> Self {
        let reports = pipeline.reports().clone();
        Self {
            pipeline,
            reports,
            users,
        }
    }

    /// Largest accepted upload, in bytes
    pub fn max_image_bytes(&self) -> usize {
        self.pipeline.max_bytes()
    }

    /// Classify an image for `user` and record the report.
    pub async fn submit_prediction(
        &self,
        user: &User,
        image: ImageUpload,
    ) -> Result<ReportSummary, CoordinationError> {
        let report = self.pipeline.submit(&user.id, &user.name, image).await?;
        Ok(report.into())
    }

    /// The caller's reports, newest first
    pub async fn list_reports(&self, user: &User) -> Result<Vec<PredictionReport>, CoordinationError> {
        Ok(self.reports.list_for_user(&user.id).await?)
    }

    pub async fn get_report(
        &self,
        user: &User,
        report_id: &str,
    ) -> Result<PredictionReport, CoordinationError> {
        Ok(self.reports.get_for_user(&user.id, report_id).await?)
    }

    pub async fn delete_report(&self, user: &User, report_id: &str) -> Result<(), CoordinationError> {
        Ok(self.reports.delete_for_user(&user.id, report_id).await?)
    }
}
