use async_trait::async_trait;
use chrono::Duration;
use std::sync::{Arc, Mutex, Once};

use cattlecheck::{
    Classifier, CredentialIssuer, DeliveryError, MessageSender, Services, connect_data_store,
    in_memory_cache_store,
};

pub const TEST_SECRET: &[u8] = b"integration-test-secret-0123456789abcdef";

static TEST_ENV: Once = Once::new();

/// Load `.env_test` (falling back to `.env`) once, before any config static is read
pub fn load_test_env() {
    TEST_ENV.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }
    });
}

/// Captures outbound messages so tests can read the delivered code
#[derive(Clone, Default)]
pub struct CapturingSender {
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl CapturingSender {
    pub fn messages_to(&self, phone: &str) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| to == phone)
            .map(|(_, body)| body.clone())
            .collect()
    }

    pub fn last_code_for(&self, phone: &str) -> Option<String> {
        let body = self.messages_to(phone).pop()?;
        let rest = body.split("OTP is: ").nth(1)?;
        Some(rest.chars().take_while(|c| c.is_ascii_digit()).collect())
    }
}

#[async_trait]
impl MessageSender for CapturingSender {
    async fn send(&self, to: &str, body: &str) -> Result<(), DeliveryError> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), body.to_string()));
        Ok(())
    }
}

/// Fully wired services over a private in-memory database
pub async fn services(sender: CapturingSender, classifier: Arc<dyn Classifier>) -> Services {
    load_test_env();
    let data_store = connect_data_store("sqlite", "sqlite::memory:").unwrap();
    let issuer = CredentialIssuer::new(TEST_SECRET, Duration::days(30)).unwrap();

    Services::build(
        data_store,
        in_memory_cache_store(),
        issuer,
        Arc::new(sender),
        classifier,
    )
    .await
    .unwrap()
}

/// A loopback address nothing listens on
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/predict")
}
