use std::sync::Arc;

use crate::prediction::{
    errors::ReportError,
    types::{PredictionReport, ReportFilter, ReportPage},
};
use crate::storage::DataStore;

use super::postgres::*;
use super::sqlite::*;

const MAX_PAGE_LIMIT: u32 = 100;

/// Persisted prediction reports, scoped to their owners.
#[derive(Clone)]
pub struct ReportStore {
    store: Arc<dyn DataStore>,
}

impl ReportStore {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    pub async fn init(&self) -> Result<(), ReportError> {
        match (self.store.as_sqlite(), self.store.as_postgres()) {
            (Some(pool), _) => {
                create_tables_sqlite(pool).await?;
                validate_report_tables_sqlite(pool).await?;
                Ok(())
            }
            (_, Some(pool)) => {
                create_tables_postgres(pool).await?;
                validate_report_tables_postgres(pool).await?;
                Ok(())
            }
            _ => Err(ReportError::Storage("Unsupported database type".to_string())),
        }
    }

    #[tracing::instrument(skip(self, report), fields(report_id = %report.report_id, user_id = %report.user_id))]
    pub async fn insert(&self, report: &PredictionReport) -> Result<(), ReportError> {
        if let Some(pool) = self.store.as_sqlite() {
            insert_report_sqlite(pool, report).await
        } else if let Some(pool) = self.store.as_postgres() {
            insert_report_postgres(pool, report).await
        } else {
            Err(ReportError::Storage("Unsupported database type".to_string()))
        }
    }

    /// Reports owned by `user_id`, newest first
    #[tracing::instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<PredictionReport>, ReportError> {
        if let Some(pool) = self.store.as_sqlite() {
            list_reports_for_user_sqlite(pool, user_id).await
        } else if let Some(pool) = self.store.as_postgres() {
            list_reports_for_user_postgres(pool, user_id).await
        } else {
            Err(ReportError::Storage("Unsupported database type".to_string()))
        }
    }

    /// A report owned by `user_id`. Someone else's report is reported as not found.
    #[tracing::instrument(skip(self))]
    pub async fn get_for_user(
        &self,
        user_id: &str,
        report_id: &str,
    ) -> Result<PredictionReport, ReportError> {
        let result = if let Some(pool) = self.store.as_sqlite() {
            get_report_for_user_sqlite(pool, user_id, report_id).await
        } else if let Some(pool) = self.store.as_postgres() {
            get_report_for_user_postgres(pool, user_id, report_id).await
        } else {
            Err(ReportError::Storage("Unsupported database type".to_string()))
        }?;

        result.ok_or(ReportError::NotFound)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_for_user(&self, user_id: &str, report_id: &str) -> Result<(), ReportError> {
        let deleted = if let Some(pool) = self.store.as_sqlite() {
            delete_report_for_user_sqlite(pool, user_id, report_id).await
        } else if let Some(pool) = self.store.as_postgres() {
            delete_report_for_user_postgres(pool, user_id, report_id).await
        } else {
            Err(ReportError::Storage("Unsupported database type".to_string()))
        }?;

        if deleted == 0 {
            return Err(ReportError::NotFound);
        }
        tracing::info!("Report deleted");
        Ok(())
    }

    /// One page of all reports, newest first. `page` starts at 1; `limit` is clamped to 1..=100.
    pub async fn list_page(
        &self,
        filter: &ReportFilter,
        page: u32,
        limit: u32,
    ) -> Result<ReportPage, ReportError> {
        let page = page.max(1);
        let limit = limit.clamp(1, MAX_PAGE_LIMIT);
        let offset = (page as i64 - 1) * limit as i64;

        let (reports, total) = if let Some(pool) = self.store.as_sqlite() {
            list_reports_page_sqlite(pool, filter, limit as i64, offset).await
        } else if let Some(pool) = self.store.as_postgres() {
            list_reports_page_postgres(pool, filter, limit as i64, offset).await
        } else {
            Err(ReportError::Storage("Unsupported database type".to_string()))
        }?;

        Ok(ReportPage {
            reports,
            total,
            page,
            limit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::types::HealthStatus;
    use crate::test_utils::memory_data_store;
    use chrono::{Duration, Utc};

    async fn store() -> ReportStore {
        let store = ReportStore::new(memory_data_store());
        store.init().await.unwrap();
        store
    }

    fn report(id: &str, user_id: &str, status: HealthStatus, minutes_ago: i64) -> PredictionReport {
        let diseased = status == HealthStatus::Diseased;
        PredictionReport {
            report_id: id.to_string(),
            user_id: user_id.to_string(),
            user_name: "Asha".to_string(),
            status,
            disease_name: if diseased { "Foot Rot" } else { "None" }.to_string(),
            stage: if diseased { "Early" } else { "N/A" }.to_string(),
            confidence: 87.0,
            precautions: vec!["Keep hooves dry".to_string()],
            recommendations: vec!["Consult a vet".to_string()],
            image_ref: "data:image/jpeg;base64,AAAA...".to_string(),
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_preserves_fields() {
        let reports = store().await;
        let original = report("RPT1", "u1", HealthStatus::Diseased, 0);

        reports.insert(&original).await.unwrap();
        let loaded = reports.get_for_user("u1", "RPT1").await.unwrap();

        assert_eq!(loaded, original);
    }

    #[tokio::test]
    async fn test_list_for_user_newest_first_and_scoped() {
        // Given reports for two owners
        let reports = store().await;
        reports.insert(&report("RPT_OLD", "u1", HealthStatus::Healthy, 10)).await.unwrap();
        reports.insert(&report("RPT_NEW", "u1", HealthStatus::Diseased, 1)).await.unwrap();
        reports.insert(&report("RPT_OTHER", "u2", HealthStatus::Healthy, 5)).await.unwrap();

        // When listing for one owner
        let listed = reports.list_for_user("u1").await.unwrap();

        // Then only their reports come back, newest first
        let ids: Vec<_> = listed.iter().map(|r| r.report_id.as_str()).collect();
        assert_eq!(ids, vec!["RPT_NEW", "RPT_OLD"]);
    }

    #[tokio::test]
    async fn test_foreign_report_is_not_found() {
        let reports = store().await;
        reports.insert(&report("RPT1", "u1", HealthStatus::Healthy, 0)).await.unwrap();

        assert!(matches!(
            reports.get_for_user("u2", "RPT1").await,
            Err(ReportError::NotFound)
        ));
        assert!(matches!(
            reports.delete_for_user("u2", "RPT1").await,
            Err(ReportError::NotFound)
        ));
        // Still there for its owner
        assert!(reports.get_for_user("u1", "RPT1").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_own_report() {
        let reports = store().await;
        reports.insert(&report("RPT1", "u1", HealthStatus::Healthy, 0)).await.unwrap();

        reports.delete_for_user("u1", "RPT1").await.unwrap();

        assert!(reports.list_for_user("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_page_filters_and_counts() {
        let reports = store().await;
        for i in 0..5 {
            reports
                .insert(&report(&format!("RPT_D{i}"), "u1", HealthStatus::Diseased, i))
                .await
                .unwrap();
        }
        reports.insert(&report("RPT_H", "u2", HealthStatus::Healthy, 0)).await.unwrap();

        let filter = ReportFilter {
            status: Some(HealthStatus::Diseased),
            disease_name: None,
        };
        let first = reports.list_page(&filter, 1, 2).await.unwrap();
        let last = reports.list_page(&filter, 3, 2).await.unwrap();
        let everything = reports.list_page(&ReportFilter::default(), 0, 0).await.unwrap();

        assert_eq!(first.total, 5);
        assert_eq!(first.total_pages(), 3);
        assert_eq!(
            first.reports.iter().map(|r| r.report_id.as_str()).collect::<Vec<_>>(),
            vec!["RPT_D0", "RPT_D1"]
        );
        assert_eq!(last.reports.len(), 1);
        assert_eq!(everything.total, 6);
        assert_eq!(everything.page, 1);
        assert_eq!(everything.limit, 1);
    }
}
