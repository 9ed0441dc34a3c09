use std::sync::Arc;

use cattlecheck::{CoordinationError, HttpClassifier, Role};

use crate::common::{CapturingSender, services, unreachable_url};

const PHONE: &str = "+15551230000";

fn wrong_code(code: &str) -> String {
    let other = if code == "000000" { "000001" } else { "000000" };
    other.to_string()
}

async fn offline_classifier() -> Arc<HttpClassifier> {
    Arc::new(HttpClassifier::new(&unreachable_url().await, std::time::Duration::from_secs(1)).unwrap())
}

/// Flow: send code → wrong code → right code with a name → session for a new identity
#[tokio::test]
async fn test_phone_sign_in_creates_identity() {
    let sender = CapturingSender::default();
    let services = services(sender.clone(), offline_classifier().await).await;

    // Step 1: send a code
    let dispatch = services.auth.send_otp(PHONE).await.unwrap();
    assert!(dispatch.delivered);
    assert_eq!(dispatch.diagnostic_code, None);
    let code = sender.last_code_for(PHONE).unwrap();
    assert_eq!(code.len(), 6);

    // Step 2: a wrong code fails generically and leaves the challenge usable
    let wrong = services.auth.verify_otp(PHONE, &wrong_code(&code), None).await;
    assert_eq!(wrong.unwrap_err(), CoordinationError::VerificationFailed);

    // Step 3: the right code with a name signs in a brand new identity
    let session = services
        .auth
        .verify_otp(PHONE, &code, Some("Asha"))
        .await
        .unwrap();
    assert_eq!(session.user.name, "Asha");
    assert_eq!(session.user.phone.as_deref(), Some(PHONE));
    assert_eq!(session.user.role, Role::Standard);

    // Step 4: the credential resolves back to that identity
    let me = services.auth.current_user(&session.token).await.unwrap();
    assert_eq!(me.user_id, session.user.user_id);

    // And the code cannot be replayed
    let replay = services.auth.verify_otp(PHONE, &code, Some("Asha")).await;
    assert_eq!(replay.unwrap_err(), CoordinationError::VerificationFailed);
}

#[tokio::test]
async fn test_second_send_invalidates_first_code() {
    let sender = CapturingSender::default();
    let services = services(sender.clone(), offline_classifier().await).await;

    services.auth.send_otp(PHONE).await.unwrap();
    let first = sender.last_code_for(PHONE).unwrap();
    let mut second = first.clone();
    while second == first {
        services.auth.send_otp(PHONE).await.unwrap();
        second = sender.last_code_for(PHONE).unwrap();
    }

    let stale = services.auth.verify_otp(PHONE, &first, Some("Asha")).await;
    let fresh = services.auth.verify_otp(PHONE, &second, Some("Asha")).await;

    assert_eq!(stale.unwrap_err(), CoordinationError::VerificationFailed);
    assert!(fresh.is_ok());
}

#[tokio::test]
async fn test_returning_phone_keeps_identity_and_name() {
    let sender = CapturingSender::default();
    let services = services(sender.clone(), offline_classifier().await).await;

    services.auth.send_otp(PHONE).await.unwrap();
    let code = sender.last_code_for(PHONE).unwrap();
    let first = services.auth.verify_otp(PHONE, &code, Some("Asha")).await.unwrap();

    services.auth.send_otp(PHONE).await.unwrap();
    let code = sender.last_code_for(PHONE).unwrap();
    let second = services.auth.verify_otp(PHONE, &code, None).await.unwrap();

    assert_eq!(first.user.user_id, second.user.user_id);
    assert_eq!(second.user.name, "Asha");
}

#[tokio::test]
async fn test_foreign_token_is_unauthenticated() {
    let services = services(CapturingSender::default(), offline_classifier().await).await;
    let other = cattlecheck::CredentialIssuer::new(
        b"some-other-deployment-secret-0123456789",
        chrono::Duration::days(1),
    )
    .unwrap();
    let (token, _) = other.issue("someone").unwrap();

    let result = services.auth.current_user(&token).await;

    assert_eq!(result.unwrap_err(), CoordinationError::Unauthenticated);
}
