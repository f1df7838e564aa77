//! Quiz session owned by the hosting state

use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{info, warn};

use super::notifications::{NoticeLevel, Notifications, DEFAULT_NOTICE_TTL, WARNING_NOTICE_TTL};
use crate::{
    error::DisplayError,
    timer::{CountdownTimer, DisplayTarget, TimerHooks, TimerReading, TimerSnapshot},
};

pub const WARNING_MESSAGE: &str = "Warning: 5 minutes remaining!";
pub const TIME_UP_MESSAGE: &str = "Time is up! Submitting quiz automatically.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitReason {
    Manual,
    TimeUp,
}

/// Record that a quiz was handed in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub quiz_id: String,
    pub reason: SubmitReason,
    pub submitted_at: DateTime<Utc>,
    pub elapsed_seconds: u64,
}

impl Submission {
    pub fn new(quiz_id: &str, reason: SubmitReason, elapsed_seconds: u64) -> Self {
        Self {
            quiz_id: quiz_id.to_string(),
            reason,
            submitted_at: Utc::now(),
            elapsed_seconds,
        }
    }
}

/// Slot a submission is written into, shared between the session and its timer hooks
pub type SubmissionSlot = Arc<Mutex<Option<Submission>>>;

/// Display target that publishes readings on a watch channel
pub struct WatchDisplay {
    tx: Arc<watch::Sender<TimerReading>>,
}

impl WatchDisplay {
    pub fn new(tx: Arc<watch::Sender<TimerReading>>) -> Self {
        Self { tx }
    }
}

impl DisplayTarget for WatchDisplay {
    fn show(&mut self, reading: &TimerReading) -> Result<(), DisplayError> {
        self.tx
            .send(reading.clone())
            .map_err(|_| DisplayError::Detached)
    }
}

/// Timer hooks that raise notices and auto-submit on expiry
pub struct QuizHooks {
    quiz_id: String,
    notifications: Arc<Notifications>,
    submission: SubmissionSlot,
}

impl QuizHooks {
    pub fn new(quiz_id: &str, notifications: Arc<Notifications>, submission: SubmissionSlot) -> Self {
        Self {
            quiz_id: quiz_id.to_string(),
            notifications,
            submission,
        }
    }
}

impl TimerHooks for QuizHooks {
    fn on_warning(&mut self, _remaining_seconds: u64) {
        self.notifications
            .push(WARNING_MESSAGE, NoticeLevel::Warning, WARNING_NOTICE_TTL);
    }

    fn on_expiry(&mut self, elapsed_seconds: u64) {
        self.notifications
            .push(TIME_UP_MESSAGE, NoticeLevel::Danger, DEFAULT_NOTICE_TTL);

        let mut slot = self.submission.lock().unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            Some(existing) => {
                warn!("Quiz '{}' was already submitted ({:?}), skipping auto-submit", self.quiz_id, existing.reason);
            }
            None => {
                info!("Auto-submitting quiz '{}' after {}s", self.quiz_id, elapsed_seconds);
                *slot = Some(Submission::new(&self.quiz_id, SubmitReason::TimeUp, elapsed_seconds));
            }
        }
    }
}

/// A quiz being taken, with its timer
pub struct QuizSession {
    pub quiz_id: String,
    pub timer: CountdownTimer,
    pub submission: SubmissionSlot,
}

impl QuizSession {
    pub fn submission(&self) -> Option<Submission> {
        self.submission
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Still ticking and not yet handed in
    pub fn is_running(&self) -> bool {
        self.timer.is_running() && self.submission().is_none()
    }

    pub fn snapshot(&self, display: TimerReading) -> QuizSnapshot {
        QuizSnapshot {
            quiz_id: self.quiz_id.clone(),
            timer: self.timer.snapshot(),
            display,
            submission: self.submission(),
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("quiz_id", &self.quiz_id)
            .field("timer", &self.timer.snapshot())
            .field("submission", &self.submission())
            .finish()
    }
}

/// Serializable view of a quiz session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSnapshot {
    pub quiz_id: String,
    pub timer: TimerSnapshot,
    pub display: TimerReading,
    pub submission: Option<Submission>,
}
