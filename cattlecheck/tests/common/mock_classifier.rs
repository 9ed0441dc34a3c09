//! Axum-based mock of the image classifier, bound to an ephemeral port per test.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    routing::post,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: Value,
    delay: Duration,
    requests: Arc<Mutex<Vec<Value>>>,
}

pub struct MockClassifier {
    pub url: String,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl MockClassifier {
    /// Answer every request with `body`
    pub async fn responding(body: Value) -> Self {
        Self::start(StatusCode::OK, body, Duration::ZERO).await
    }

    pub async fn failing(status: StatusCode) -> Self {
        Self::start(status, serde_json::json!({"error": "boom"}), Duration::ZERO).await
    }

    /// Answer only after `delay`
    pub async fn slow(body: Value, delay: Duration) -> Self {
        Self::start(StatusCode::OK, body, delay).await
    }

    async fn start(status: StatusCode, body: Value, delay: Duration) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            status,
            body,
            delay,
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/predict", post(predict))
            .layer(DefaultBodyLimit::max(32 * 1024 * 1024))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}/predict"),
            requests,
        }
    }

    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}

async fn predict(State(state): State<MockState>, Json(request): Json<Value>) -> (StatusCode, Json<Value>) {
    state.requests.lock().unwrap().push(request);
    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    (state.status, Json(state.body.clone()))
}
