//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod error;
pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

pub use error::ApiError;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/patterns", get(patterns_handler))
        .route("/session", get(session_handler))
        .route("/session/start", post(start_handler))
        .route("/session/pause", post(pause_handler))
        .route("/session/resume", post(resume_handler))
        .route("/session/stop", post(stop_handler))
        .route("/session/events", get(events_handler))
        .route("/stats", get(stats_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
