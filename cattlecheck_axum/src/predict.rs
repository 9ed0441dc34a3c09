use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
};
use http::StatusCode;
use serde_json::{Value, json};

use cattlecheck::ImageUpload;

use crate::AppState;
use crate::config::MULTIPART_OVERHEAD_BYTES;
use crate::error::{ApiError, IntoResponseError};
use crate::session::AuthUser;

pub(crate) fn router(max_image_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", post(predict))
        .layer(DefaultBodyLimit::max(
            max_image_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES),
        ))
}

async fn predict(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let image = read_image_field(&mut multipart).await?;

    let report = state
        .reports
        .submit_prediction(&user, image)
        .await
        .into_response_error()?;

    Ok(Json(json!({
        "success": true,
        "message": "Prediction completed successfully",
        "report": report,
    })))
}

async fn read_image_field(multipart: &mut Multipart) -> Result<ImageUpload, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("image") {
            continue;
        }

        let mime = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let filename = field.file_name().unwrap_or("upload").to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;

        return Ok(ImageUpload {
            bytes: bytes.to_vec(),
            mime,
            filename,
        });
    }

    Err(ApiError::new(StatusCode::BAD_REQUEST, "No image uploaded"))
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> ApiError {
    tracing::debug!(error = %e, "Rejected multipart body");
    let status = e.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::new(StatusCode::BAD_REQUEST, "Image too large")
    } else {
        ApiError::new(StatusCode::BAD_REQUEST, "Invalid multipart body")
    }
}
