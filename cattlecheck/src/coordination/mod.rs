mod admin;
mod auth;
mod errors;
mod reports;
mod types;

pub use auth::AuthCoordinator;
pub use errors::CoordinationError;
pub use reports::ReportCoordinator;
pub use types::{AuthSession, OAuthClaims, OtpDispatch, ReportSummary, UserView};
