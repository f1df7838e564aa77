//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{Notice, QuizSnapshot, Submission};

/// Body of POST /quiz
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartQuizRequest {
    pub quiz_id: Option<String>,
    /// Time limit in seconds; absent runs the quiz untimed
    pub duration_seconds: Option<i64>,
}

/// API response structure for quiz endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub quiz: Option<QuizSnapshot>,
}

impl QuizResponse {
    /// Create a new quiz response
    pub fn new(status: String, message: String, quiz: Option<QuizSnapshot>) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            quiz,
        }
    }

    /// Create a started response
    pub fn started(quiz: QuizSnapshot) -> Self {
        let message = format!("Quiz '{}' started", quiz.quiz_id);
        Self::new("started".to_string(), message, Some(quiz))
    }

    /// Create a left response
    pub fn left(quiz: Option<QuizSnapshot>) -> Self {
        let message = match &quiz {
            Some(quiz) => format!("Left quiz '{}'", quiz.quiz_id),
            None => "No quiz to leave".to_string(),
        };
        Self::new("left".to_string(), message, quiz)
    }
}

/// Response for POST /quiz/submit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub submission: Submission,
}

impl SubmitResponse {
    pub fn submitted(submission: Submission) -> Self {
        Self {
            status: "submitted".to_string(),
            timestamp: Utc::now(),
            submission,
        }
    }
}

/// Error body returned by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Response for GET /notifications
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notice>,
}

/// Server status with the current quiz, if any
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub quiz: Option<QuizSnapshot>,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub default_duration_seconds: Option<i64>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
