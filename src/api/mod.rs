//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/quiz", post(start_quiz_handler).get(get_quiz_handler))
        .route("/quiz/submit", post(submit_quiz_handler))
        .route("/quiz/leave", post(leave_quiz_handler))
        .route("/notifications", get(notifications_handler))
        .route("/notifications/:id", delete(dismiss_notification_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
