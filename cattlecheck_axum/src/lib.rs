//! Axum integration for cattlecheck
//!
//! Exposes the sign-in, prediction, report and admin operations as a JSON HTTP API
//! authenticated with `Authorization: Bearer <token>`.

mod admin;
mod auth;
mod config;
mod error;
mod predict;
mod reports;
mod router;
mod session;

use std::sync::Arc;

use cattlecheck::{AuthCoordinator, ReportCoordinator, Services};

pub use error::{ApiError, IntoResponseError};
pub use router::{cattlecheck_router, cattlecheck_router_no_trace};
pub use session::AuthUser;

pub use cattlecheck::init;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthCoordinator>,
    pub reports: Arc<ReportCoordinator>,
}

impl From<Services> for AppState {
    fn from(services: Services) -> Self {
        Self {
            auth: services.auth,
            reports: services.reports,
        }
    }
}
