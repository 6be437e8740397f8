//! HTTP endpoint around the compression pipeline

pub mod handler;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::config::{ServerSettings, Settings};
use crate::error::ServeError;

pub use handler::ApiError;

/// Shared, read-only state handed to every request
#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
}

/// Build the application router
pub fn router(server: &ServerSettings) -> Router {
    let state = AppState {
        settings: Arc::new(server.compression.clone()),
    };

    let body_limit = match server.max_upload_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/api/compress", post(handler::compress))
        .route("/health", get(handler::health))
        .layer(body_limit)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until Ctrl-C
pub async fn serve(server: ServerSettings) -> Result<(), ServeError> {
    server.compression.validate()?;

    let addr = server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind { addr, source })?;

    log::info!(
        "Listening on http://{} (quality {}, upload limit {})",
        listener.local_addr()?,
        server.compression.jpeg_quality,
        server
            .max_upload_bytes
            .map(|n| format!("{} bytes", n))
            .unwrap_or_else(|| "none".to_string())
    );

    axum::serve(listener, router(&server))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::warn!("Could not listen for Ctrl-C: {}", err);
        std::future::pending::<()>().await;
    }
    log::info!("Shutting down");
}
