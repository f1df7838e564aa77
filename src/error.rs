//! Error types for the quiz timer and its hosting state

use thiserror::Error;

/// Errors raised while constructing a timer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// A countdown cannot run for a negative amount of time
    #[error("Quiz duration must not be negative, got {0} seconds")]
    NegativeDuration(i64),
}

/// Errors raised by a display target while rendering a reading
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisplayError {
    /// Nothing is listening on the other side of the display anymore
    #[error("Display target is no longer attached")]
    Detached,
}

/// Errors raised by the quiz hosting state
#[derive(Error, Debug)]
pub enum QuizError {
    #[error("No quiz session is active")]
    NoSession,

    #[error("Quiz '{0}' is still running")]
    Conflict(String),

    #[error("Quiz '{0}' has already been submitted")]
    AlreadySubmitted(String),

    #[error(transparent)]
    Timer(#[from] TimerError),

    /// A lock was poisoned by a panicking holder
    #[error("Failed to lock {0}")]
    Poisoned(&'static str),
}
