//! Combined router for all endpoints

use axum::Router;
use tower_http::LatencyUnit;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::AppState;

/// Create the application router with HTTP request tracing
///
/// Endpoints:
/// - `/auth/google`, `/auth/otp/send`, `/auth/otp/verify`, `/auth/me`
/// - `/predict`
/// - `/reports`, `/reports/{report_id}`
/// - `/admin/users`, `/admin/reports`
pub fn cattlecheck_router(state: AppState) -> Router {
    cattlecheck_router_no_trace(state).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as [`cattlecheck_router`] without the tracing middleware.
pub fn cattlecheck_router_no_trace(state: AppState) -> Router {
    let max_image_bytes = state.reports.max_image_bytes();

    Router::new()
        .nest("/auth", super::auth::router())
        .nest("/predict", super::predict::router(max_image_bytes))
        .nest("/reports", super::reports::router())
        .nest("/admin", super::admin::router())
        .with_state(state)
}
