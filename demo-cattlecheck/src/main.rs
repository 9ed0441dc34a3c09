use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cattlecheck_axum::{AppState, cattlecheck_router};

mod server;

use crate::server::spawn_http_server;

async fn health() -> Json<Value> {
    Json(json!({ "status": "OK", "message": "Cattle disease detection API is running" }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{}=debug,cattlecheck=debug,cattlecheck_axum=debug,tower_http=info",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let services = cattlecheck_axum::init().await?;

    let app = Router::new()
        .route("/health", get(health))
        .nest("/api", cattlecheck_router(AppState::from(services)));

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);

    spawn_http_server(port, app).await??;
    Ok(())
}
