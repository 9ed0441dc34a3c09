use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde_json::{Value, json};

use crate::AppState;
use crate::error::{ApiError, IntoResponseError};
use crate::session::AuthUser;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reports))
        .route("/{report_id}", get(get_report).delete(delete_report))
}

async fn list_reports(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let reports = state.reports.list_reports(&user).await.into_response_error()?;

    Ok(Json(json!({
        "success": true,
        "count": reports.len(),
        "reports": reports,
    })))
}

async fn get_report(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(report_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let report = state
        .reports
        .get_report(&user, &report_id)
        .await
        .into_response_error()?;

    Ok(Json(json!({ "success": true, "report": report })))
}

async fn delete_report(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(report_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .reports
        .delete_report(&user, &report_id)
        .await
        .into_response_error()?;

    Ok(Json(json!({
        "success": true,
        "message": "Report deleted successfully",
    })))
}
