use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::AppState;
use crate::config::ADMIN_DEFAULT_PAGE_LIMIT;
use crate::error::{ApiError, IntoResponseError};
use crate::session::AuthUser;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/reports", get(list_reports))
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReportQuery {
    page: Option<u32>,
    limit: Option<u32>,
    status: Option<String>,
    #[serde(alias = "disease")]
    disease_name: Option<String>,
}

async fn list_users(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let users = state
        .reports
        .admin_list_users(&user)
        .await
        .into_response_error()?;

    Ok(Json(json!({
        "success": true,
        "count": users.len(),
        "users": users,
    })))
}

async fn list_reports(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Value>, ApiError> {
    let page = state
        .reports
        .admin_list_reports(
            &user,
            query.page.unwrap_or(1),
            query.limit.unwrap_or(*ADMIN_DEFAULT_PAGE_LIMIT),
            query.status.as_deref(),
            query.disease_name.as_deref(),
        )
        .await
        .into_response_error()?;

    Ok(Json(json!({
        "success": true,
        "reports": page.reports,
        "total": page.total,
        "total_pages": page.total_pages(),
        "current_page": page.page,
        "limit": page.limit,
    })))
}
