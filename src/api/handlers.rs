//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use tracing::{error, info, warn};

use crate::{error::QuizError, state::AppState};
use super::responses::{
    ErrorResponse, HealthResponse, NotificationsResponse, QuizResponse, StartQuizRequest,
    StatusResponse, SubmitResponse,
};

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a hosting-state error onto a status code and error body
pub fn error_response(e: QuizError) -> ApiError {
    let status = match &e {
        QuizError::NoSession => StatusCode::NOT_FOUND,
        QuizError::Conflict(_) | QuizError::AlreadySubmitted(_) => StatusCode::CONFLICT,
        QuizError::Timer(_) => StatusCode::BAD_REQUEST,
        QuizError::Poisoned(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!("Request failed: {}", e);
    } else {
        warn!("Request rejected: {}", e);
    }

    (status, Json(ErrorResponse::new(e.to_string())))
}

/// Handle POST /quiz - Start a quiz session and its timer
pub async fn start_quiz_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StartQuizRequest>,
) -> Result<(StatusCode, Json<QuizResponse>), ApiError> {
    let quiz = state
        .start_quiz(request.quiz_id, request.duration_seconds)
        .map_err(error_response)?;

    info!("Quiz endpoint called - quiz '{}' started", quiz.quiz_id);
    Ok((StatusCode::CREATED, Json(QuizResponse::started(quiz))))
}

/// Handle GET /quiz - Return the current quiz session
pub async fn get_quiz_handler(State(state): State<Arc<AppState>>) -> Result<Json<QuizResponse>, ApiError> {
    let quiz = state
        .snapshot()
        .map_err(error_response)?
        .ok_or(QuizError::NoSession)
        .map_err(error_response)?;

    let message = format!("Quiz '{}' is {:?}", quiz.quiz_id, quiz.timer.state);
    Ok(Json(QuizResponse::new("ok".to_string(), message, Some(quiz))))
}

/// Handle POST /quiz/submit - Submit the current quiz manually
pub async fn submit_quiz_handler(State(state): State<Arc<AppState>>) -> Result<Json<SubmitResponse>, ApiError> {
    let submission = state.submit_quiz().map_err(error_response)?;

    info!("Submit endpoint called - quiz '{}' submitted", submission.quiz_id);
    Ok(Json(SubmitResponse::submitted(submission)))
}

/// Handle POST /quiz/leave - Stop the current quiz without submitting it
pub async fn leave_quiz_handler(State(state): State<Arc<AppState>>) -> Result<Json<QuizResponse>, ApiError> {
    let quiz = state.leave_quiz().map_err(error_response)?;
    Ok(Json(QuizResponse::left(quiz)))
}

/// Handle GET /notifications - Return notices that are still visible
pub async fn notifications_handler(State(state): State<Arc<AppState>>) -> Json<NotificationsResponse> {
    Json(NotificationsResponse {
        notifications: state.notifications.active(Utc::now()),
    })
}

/// Handle DELETE /notifications/:id - Dismiss a notice
pub async fn dismiss_notification_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    if state.notifications.dismiss(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("No notice with id {}", id))),
        ))
    }
}

/// Handle GET /status - Return current server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, ApiError> {
    let quiz = state.snapshot().map_err(error_response)?;

    Ok(Json(StatusResponse {
        quiz,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        default_duration_seconds: state.default_duration_seconds,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
