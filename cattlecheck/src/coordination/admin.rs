use crate::prediction::{HealthStatus, ReportFilter, ReportPage};
use crate::userdb::User;

use super::errors::CoordinationError;
use super::reports::ReportCoordinator;
use super::types::UserView;

fn require_privileged(user: &User) -> Result<(), CoordinationError> {
    if user.is_privileged() {
        Ok(())
    } else {
        tracing::warn!(user_id = %user.id, "Privileged operation refused");
        Err(CoordinationError::Forbidden)
    }
}

impl ReportCoordinator {
    /// Every identity, newest first. Privileged callers only.
    pub async fn admin_list_users(&self, caller: &User) -> Result<Vec<UserView>, CoordinationError> {
        require_privileged(caller)?;
        let users = self.users.list_users().await?;
        Ok(users.iter().map(UserView::from).collect())
    }

    /// A page of all reports, optionally filtered. Privileged callers only.
    pub async fn admin_list_reports(
        &self,
        caller: &User,
        page: u32,
        limit: u32,
        status: Option<&str>,
        disease_name: Option<&str>,
    ) -> Result<ReportPage, CoordinationError> {
        require_privileged(caller)?;

        let status = status
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse::<HealthStatus>())
            .transpose()
            .map_err(|e| CoordinationError::InvalidInput(e.to_string()))?;
        let filter = ReportFilter {
            status,
            disease_name: disease_name
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        };

        Ok(self.reports.list_page(&filter, page, limit).await?)
    }
}
