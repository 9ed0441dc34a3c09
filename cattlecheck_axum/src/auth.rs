use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};

use cattlecheck::OAuthClaims;

use crate::AppState;
use crate::error::{ApiError, IntoResponseError};
use crate::session::AuthUser;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/google", post(oauth_login))
        .route("/otp/send", post(send_otp))
        .route("/otp/verify", post(verify_otp))
        .route("/me", get(me))
}

#[derive(Debug, Deserialize)]
pub(crate) struct SendOtpRequest {
    #[serde(default)]
    phone: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerifyOtpRequest {
    #[serde(default)]
    phone: String,
    #[serde(default, alias = "otp")]
    code: String,
    #[serde(default)]
    name: Option<String>,
}

async fn oauth_login(
    State(state): State<AppState>,
    Json(claims): Json<OAuthClaims>,
) -> Result<Json<Value>, ApiError> {
    let session = state.auth.oauth_login(claims).await.into_response_error()?;

    Ok(Json(json!({
        "success": true,
        "token": session.token,
        "expires_at": session.expires_at,
        "user": session.user,
    })))
}

async fn send_otp(
    State(state): State<AppState>,
    Json(request): Json<SendOtpRequest>,
) -> Result<Json<Value>, ApiError> {
    let dispatch = state
        .auth
        .send_otp(&request.phone)
        .await
        .into_response_error()?;

    let message = if dispatch.delivered {
        "OTP sent successfully"
    } else {
        "OTP generated but delivery failed"
    };

    let mut body = json!({
        "success": true,
        "message": message,
        "delivered": dispatch.delivered,
        "expires_at": dispatch.expires_at,
    });
    if let Some(code) = dispatch.diagnostic_code {
        body["otp"] = Value::String(code);
    }

    Ok(Json(body))
}

async fn verify_otp(
    State(state): State<AppState>,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<Json<Value>, ApiError> {
    let session = state
        .auth
        .verify_otp(&request.phone, &request.code, request.name.as_deref())
        .await
        .into_response_error()?;

    Ok(Json(json!({
        "success": true,
        "token": session.token,
        "expires_at": session.expires_at,
        "user": session.user,
    })))
}

async fn me(AuthUser(user): AuthUser) -> Json<Value> {
    Json(json!({
        "success": true,
        "user": cattlecheck::UserView::from(&user),
    }))
}
