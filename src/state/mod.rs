//! State management module
//!
//! This module contains the hosting state that owns a quiz session, its timer
//! display and the notices shown alongside it.

pub mod app_state;
pub mod notifications;
pub mod quiz;

// Re-export main types
pub use app_state::AppState;
pub use notifications::{Notice, NoticeLevel, Notifications};
pub use quiz::{QuizSession, QuizSnapshot, SubmitReason, Submission};
