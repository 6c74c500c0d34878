pub mod access;
pub mod handlers;
mod types;
pub mod views;

use crate::{
    Result,
    auth::{CredentialValidator, InMemorySessionStore},
    config::Config,
    relay::UploadRelay,
};
use axum::{Router, extract::DefaultBodyLimit, routing::get};
use handlers::AppState;
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub use types::LoginForm;

/// Builds the shared state from configuration.
pub fn build_state(config: Config) -> Result<AppState> {
    if config.auth.uses_dev_secret() {
        warn!("Using the development session secret; set SESSION_SECRET_KEY in production");
    }
    if config.prediction.is_placeholder() {
        warn!("PREDICTION_API_URL is not configured; uploads will report a configuration error");
    }

    let sessions = InMemorySessionStore::new(
        &config.auth.secret_key,
        config.auth.session_ttl_secs,
    )?;
    let relay = UploadRelay::new(config.prediction.clone())?;

    Ok(AppState {
        credentials: Arc::new(CredentialValidator::from_config(&config.auth)),
        sessions: Arc::new(sessions),
        relay: Arc::new(relay),
        config: Arc::new(config),
    })
}

pub fn router(state: AppState) -> Router {
    let max_upload_bytes = state.config.server.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::login_page).post(handlers::login_submit))
        .route(
            "/predict",
            get(handlers::predict_page).post(handlers::predict_submit),
        )
        .route("/logout", get(handlers::logout))
        .fallback(handlers::fallback)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    let state = build_state(config)?;
    info!("Prediction endpoint: {}", state.relay.endpoint());

    let app = router(state);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
