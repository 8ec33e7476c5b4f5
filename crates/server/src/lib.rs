//! # server
//!
//! HTTP and WebSocket service for reconstruction-error anomaly scoring.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod input;
pub mod rate_limit;
pub mod routes;
pub mod state;
pub mod ws;

pub use config::{ConfigError, ServiceConfig};
pub use error::ApiError;
pub use rate_limit::RateLimiter;
pub use state::AppState;

/// Build the service router with middleware.
pub fn build_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints (Kubernetes-compatible)
        .route("/health/live", get(routes::liveness))
        .route("/health/ready", get(routes::readiness))
        .route("/health", get(routes::liveness))
        // API endpoints
        .route("/datasets", get(routes::list_datasets))
        .route("/predict", post(routes::predict))
        .route("/analyze", post(routes::analyze))
        .route("/ws", get(ws::ws_handler))
        // Middleware layers
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
