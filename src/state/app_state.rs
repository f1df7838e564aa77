//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use tokio::sync::watch;
use tracing::{info, warn};

use super::{
    notifications::{NoticeLevel, Notifications, DEFAULT_NOTICE_TTL},
    quiz::{QuizHooks, QuizSession, QuizSnapshot, SubmitReason, Submission, WatchDisplay},
};
use crate::{error::QuizError, timer::{CountdownTimer, TimerReading}};

/// Quiz id used when a client does not name one
pub const DEFAULT_QUIZ_ID: &str = "quiz";

/// Hosting state: owns the active quiz session and everything it shows
#[derive(Debug)]
pub struct AppState {
    /// Active quiz session, if any
    pub session: Mutex<Option<QuizSession>>,
    /// Notices shown to the user
    pub notifications: Arc<Notifications>,
    /// Time limit applied when a quiz is started without one
    pub default_duration_seconds: Option<i64>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Channel the timer display is published on
    pub display_tx: Arc<watch::Sender<TimerReading>>,
    /// Keep the receiver alive to prevent channel closure
    pub _display_rx: watch::Receiver<TimerReading>,
}

impl AppState {
    /// Create a new AppState with no quiz running
    pub fn new(port: u16, host: String, default_duration_seconds: Option<i64>) -> Self {
        let (display_tx, display_rx) = watch::channel(TimerReading::default());

        Self {
            session: Mutex::new(None),
            notifications: Arc::new(Notifications::new()),
            default_duration_seconds,
            start_time: Instant::now(),
            port,
            host,
            display_tx: Arc::new(display_tx),
            _display_rx: display_rx,
        }
    }

    fn lock_session(&self) -> Result<MutexGuard<'_, Option<QuizSession>>, QuizError> {
        self.session
            .lock()
            .map_err(|_| QuizError::Poisoned("quiz session"))
    }

    /// Current value of the timer display
    pub fn display(&self) -> TimerReading {
        self.display_tx.borrow().clone()
    }

    /// Start a quiz session and its timer
    ///
    /// Refuses while another quiz is still running; a finished one is replaced.
    pub fn start_quiz(&self, quiz_id: Option<String>, duration: Option<i64>) -> Result<QuizSnapshot, QuizError> {
        let mut session = self.lock_session()?;

        if let Some(existing) = session.as_ref() {
            if existing.is_running() {
                return Err(QuizError::Conflict(existing.quiz_id.clone()));
            }
        }

        let quiz_id = quiz_id.unwrap_or_else(|| DEFAULT_QUIZ_ID.to_string());
        let duration = duration.or(self.default_duration_seconds);

        let submission = Arc::new(Mutex::new(None));
        let hooks = QuizHooks::new(&quiz_id, Arc::clone(&self.notifications), Arc::clone(&submission));
        let display = WatchDisplay::new(Arc::clone(&self.display_tx));

        // A rejected duration leaves the previous session and the display untouched
        let timer = CountdownTimer::start(duration, Some(Box::new(display)), Box::new(hooks))?;

        if let Some(previous) = session.take() {
            previous.timer.stop();
            info!("Replaced finished quiz '{}'", previous.quiz_id);
        }

        info!("Started quiz '{}' with duration {:?}s", quiz_id, duration);

        let quiz = QuizSession {
            quiz_id,
            timer,
            submission,
        };
        let snapshot = quiz.snapshot(self.display());
        *session = Some(quiz);

        Ok(snapshot)
    }

    /// Hand in the active quiz before time runs out
    pub fn submit_quiz(&self) -> Result<Submission, QuizError> {
        let session = self.lock_session()?;
        let quiz = session.as_ref().ok_or(QuizError::NoSession)?;

        // Waits for any in-flight tick, so expiry cannot race the manual submit
        quiz.timer.stop();
        let elapsed = quiz.timer.snapshot().elapsed_seconds;

        let mut slot = quiz
            .submission
            .lock()
            .map_err(|_| QuizError::Poisoned("submission"))?;

        if slot.is_some() {
            warn!("Rejected duplicate submission of quiz '{}'", quiz.quiz_id);
            return Err(QuizError::AlreadySubmitted(quiz.quiz_id.clone()));
        }

        let submission = Submission::new(&quiz.quiz_id, SubmitReason::Manual, elapsed);
        *slot = Some(submission.clone());
        drop(slot);

        info!("Quiz '{}' submitted after {}s", quiz.quiz_id, elapsed);
        self.notifications
            .push("Quiz submitted.", NoticeLevel::Success, DEFAULT_NOTICE_TTL);

        Ok(submission)
    }

    /// Tear down the active quiz without submitting it
    pub fn leave_quiz(&self) -> Result<Option<QuizSnapshot>, QuizError> {
        let mut session = self.lock_session()?;

        let Some(quiz) = session.take() else {
            return Ok(None);
        };

        quiz.timer.stop();
        info!("Left quiz '{}'", quiz.quiz_id);

        Ok(Some(quiz.snapshot(self.display())))
    }

    /// Current quiz session view
    pub fn snapshot(&self) -> Result<Option<QuizSnapshot>, QuizError> {
        let session = self.lock_session()?;
        Ok(session.as_ref().map(|quiz| quiz.snapshot(self.display())))
    }

    /// Stop any running timer before the process exits
    pub fn shutdown(&self) {
        match self.session.lock() {
            Ok(session) => {
                if let Some(quiz) = session.as_ref() {
                    info!("Stopping timer for quiz '{}'", quiz.quiz_id);
                    quiz.timer.stop();
                }
            }
            Err(e) => warn!("Failed to lock quiz session during shutdown: {}", e),
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
