//! HTTP surface of the chat gateway.

pub mod core;
pub mod error_handler;
pub mod middleware_layer;
mod routes;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tracing::{error, info};

pub use crate::core::{
    app_state::AppState,
    config::{ConfigError, GatewayConfig},
};
pub use error_handler::{AppError, AppResult};

use crate::{
    middleware_layer::{cors::cors_layer, request_id::request_id},
    routes::{
        chat::chat_route::chat_route, feedback::update_feedback_route::update_feedback_route,
        health_route::health_route, session::new_session_route::new_session_route,
    },
};

/// All routes with CORS and request-id layers applied.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.allowed_origins);

    Router::new()
        .route("/", get(health_route))
        .route("/chat", post(chat_route))
        .route("/update-feedback", post(update_feedback_route))
        .route("/session/new", get(new_session_route))
        .layer(cors)
        .layer(middleware::from_fn(request_id))
        .with_state(state)
}

/// Build adapters, optionally warm the search index, and serve until Ctrl+C.
pub async fn start(config: GatewayConfig) -> Result<(), AppError> {
    let state = AppState::from_config(&config)?;

    if config.search_warmup {
        state.pipeline.warm_up().await;
    }

    let app = router(Arc::new(state));

    // Bind to address
    let listener = tokio::net::TcpListener::bind(&config.api_address)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %config.api_address, "chat gateway listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("chat gateway stopped");
    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
