//! Quiz Timer - countdown timer for timed quizzes
//!
//! This library provides the quiz countdown timer (one-time warning, automatic
//! submission on expiry) and a small hosting service that owns a quiz session,
//! its display and the notices shown to the student.

pub mod api;
pub mod config;
pub mod error;
pub mod state;
pub mod tasks;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{DisplayError, QuizError, TimerError};
pub use state::AppState;
pub use timer::{format_time, CountdownTimer, DisplayTarget, TimerHooks};
pub use utils::signals::shutdown_signal;
