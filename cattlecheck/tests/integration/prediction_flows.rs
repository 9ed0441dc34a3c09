use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use cattlecheck::{CoordinationError, HealthStatus, HttpClassifier, ImageUpload, User};

use crate::common::{CapturingSender, MockClassifier, services, unreachable_url};

async fn signed_in(services: &cattlecheck::Services, sender: &CapturingSender) -> User {
    let phone = "+15551230000";
    services.auth.send_otp(phone).await.unwrap();
    let code = sender.last_code_for(phone).unwrap();
    let session = services
        .auth
        .verify_otp(phone, &code, Some("Asha"))
        .await
        .unwrap();
    services.auth.authenticate(&session.token).await.unwrap()
}

fn jpeg(len: usize) -> ImageUpload {
    ImageUpload {
        bytes: vec![0x5A; len],
        mime: "image/jpeg".to_string(),
        filename: "herd.jpg".to_string(),
    }
}

/// Flow: 2 MiB JPEG → classifier says Diseased / Foot Rot / 87 → report persisted as returned
#[tokio::test]
async fn test_diseased_prediction_is_recorded() {
    let mock = MockClassifier::responding(json!({
        "status": "Diseased",
        "disease_name": "Foot Rot",
        "confidence": 87
    }))
    .await;
    let classifier = Arc::new(HttpClassifier::new(&mock.url, Duration::from_secs(10)).unwrap());
    let sender = CapturingSender::default();
    let services = services(sender.clone(), classifier).await;
    let user = signed_in(&services, &sender).await;

    let summary = services
        .reports
        .submit_prediction(&user, jpeg(2 * 1024 * 1024))
        .await
        .unwrap();

    // The classifier received the whole image, base64 encoded, with its filename
    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["filename"], "herd.jpg");
    let expected_len = (2 * 1024 * 1024usize).div_ceil(3) * 4;
    assert_eq!(requests[0]["image"].as_str().unwrap().len(), expected_len);

    // The persisted report carries exactly the classifier's answer
    let stored = services
        .reports
        .get_report(&user, &summary.report_id)
        .await
        .unwrap();
    assert_eq!(stored.status, HealthStatus::Diseased);
    assert_eq!(stored.disease_name, "Foot Rot");
    assert_eq!(stored.stage, "N/A");
    assert_eq!(stored.confidence, 87.0);
    assert_eq!(stored.user_id, user.id);
    assert_eq!(stored.user_name, "Asha");
    assert!(stored.precautions.is_empty());
}

#[tokio::test]
async fn test_healthy_prediction_uses_sentinels() {
    let mock = MockClassifier::responding(json!({
        "status": "Healthy",
        "disease_name": "Healthy",
        "stage": "N/A",
        "confidence": 95.5,
        "precautions": ["Maintain regular vaccination schedule"],
        "recommendations": ["Continue current care routine"]
    }))
    .await;
    let classifier = Arc::new(HttpClassifier::new(&mock.url, Duration::from_secs(10)).unwrap());
    let sender = CapturingSender::default();
    let services = services(sender.clone(), classifier).await;
    let user = signed_in(&services, &sender).await;

    let summary = services
        .reports
        .submit_prediction(&user, jpeg(4096))
        .await
        .unwrap();

    assert_eq!(summary.status, HealthStatus::Healthy);
    assert_eq!(summary.disease_name, "None");
    assert_eq!(summary.stage, "N/A");
    assert_eq!(summary.precautions.len(), 1);
}

#[tokio::test]
async fn test_unreachable_classifier_is_service_unavailable() {
    let classifier =
        Arc::new(HttpClassifier::new(&unreachable_url().await, Duration::from_secs(5)).unwrap());
    let sender = CapturingSender::default();
    let services = services(sender.clone(), classifier).await;
    let user = signed_in(&services, &sender).await;

    let result = services.reports.submit_prediction(&user, jpeg(4096)).await;

    assert_eq!(result.unwrap_err(), CoordinationError::ServiceUnavailable);
    assert!(services.reports.list_reports(&user).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_slow_classifier_is_prediction_failed() {
    let mock = MockClassifier::slow(
        json!({"status": "Healthy", "confidence": 90}),
        Duration::from_secs(3),
    )
    .await;
    let classifier = Arc::new(HttpClassifier::new(&mock.url, Duration::from_millis(300)).unwrap());
    let sender = CapturingSender::default();
    let services = services(sender.clone(), classifier).await;
    let user = signed_in(&services, &sender).await;

    let result = services.reports.submit_prediction(&user, jpeg(4096)).await;

    assert_eq!(result.unwrap_err(), CoordinationError::PredictionFailed);
    assert!(services.reports.list_reports(&user).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unusable_classifier_answers_are_prediction_failed() {
    let bad_status = MockClassifier::failing(axum::http::StatusCode::INTERNAL_SERVER_ERROR).await;
    let bad_confidence =
        MockClassifier::responding(json!({"status": "Diseased", "confidence": 140})).await;
    let bad_label = MockClassifier::responding(json!({"status": "Unwell", "confidence": 50})).await;

    for mock in [bad_status, bad_confidence, bad_label] {
        let classifier = Arc::new(HttpClassifier::new(&mock.url, Duration::from_secs(10)).unwrap());
        let sender = CapturingSender::default();
        let services = services(sender.clone(), classifier).await;
        let user = signed_in(&services, &sender).await;

        let result = services.reports.submit_prediction(&user, jpeg(1024)).await;

        assert_eq!(result.unwrap_err(), CoordinationError::PredictionFailed);
        assert!(services.reports.list_reports(&user).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_oversized_upload_never_reaches_classifier() {
    let mock = MockClassifier::responding(json!({"status": "Healthy", "confidence": 90})).await;
    let classifier = Arc::new(HttpClassifier::new(&mock.url, Duration::from_secs(10)).unwrap());
    let sender = CapturingSender::default();
    let services = services(sender.clone(), classifier).await;
    let user = signed_in(&services, &sender).await;
    let limit = services.reports.max_image_bytes();

    let result = services.reports.submit_prediction(&user, jpeg(limit + 1)).await;

    assert!(matches!(result, Err(CoordinationError::InvalidInput(_))));
    assert!(mock.requests().is_empty());
}
