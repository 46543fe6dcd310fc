//! API routes

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub mod health;
pub mod webhooks;

/// Build the HTTP router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health::health))
        .route("/health", get(health::health))
        .route("/webhook", post(webhooks::github))
        .with_state(state)
}
