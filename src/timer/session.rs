//! Timer session state
//!
//! A session owns the fields the countdown mutates once per second. It knows
//! nothing about scheduling: callers hand it the current instant.
//!
//! ```text
//! Idle                          (no display target, never started)
//! Running -> Stopped            (explicit stop)
//! Running -> Expired            (countdown reached zero)
//! ```

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use super::tick::{self, TickAction, TimerReading};
use crate::error::TimerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    Countdown,
    Stopwatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Stopped,
    Expired,
}

/// Outcome of one tick on a running session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    pub action: TickAction,
    pub elapsed_seconds: u64,
    /// Absent on expiry; the display is left as it was.
    pub reading: Option<TimerReading>,
}

/// Serializable view of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub mode: TimerMode,
    pub state: TimerState,
    pub duration_seconds: Option<u64>,
    pub elapsed_seconds: u64,
    pub remaining_seconds: Option<u64>,
    pub warning_fired: bool,
    /// What the display shows for `elapsed_seconds`
    pub display: TimerReading,
}

#[derive(Debug, Clone)]
pub struct TimerSession {
    duration: Option<u64>,
    start_instant: Instant,
    warning_fired: bool,
    state: TimerState,
    /// Set when the session leaves `Running`; freezes the elapsed time.
    ended_at: Option<Instant>,
}

impl TimerSession {
    /// Create an idle session. Negative durations are rejected.
    pub fn new(duration: Option<i64>, start_instant: Instant) -> Result<Self, TimerError> {
        let duration = duration
            .map(|secs| u64::try_from(secs).map_err(|_| TimerError::NegativeDuration(secs)))
            .transpose()?;

        Ok(Self {
            duration,
            start_instant,
            warning_fired: false,
            state: TimerState::Idle,
            ended_at: None,
        })
    }

    pub fn mode(&self) -> TimerMode {
        if self.duration.is_some() {
            TimerMode::Countdown
        } else {
            TimerMode::Stopwatch
        }
    }

    pub fn duration(&self) -> Option<u64> {
        self.duration
    }

    pub fn start_instant(&self) -> Instant {
        self.start_instant
    }

    pub fn warning_fired(&self) -> bool {
        self.warning_fired
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Whole seconds since the session started, frozen once it has ended.
    pub fn elapsed(&self, now: Instant) -> u64 {
        let until = self.ended_at.unwrap_or(now);
        until.saturating_duration_since(self.start_instant).as_secs()
    }

    /// Reading for the current elapsed time. Ended sessions keep their last value.
    pub fn reading(&self, now: Instant) -> TimerReading {
        tick::reading(self.elapsed(now), self.duration)
    }

    /// Move an idle session into `Running`. Any other state is left alone.
    pub fn begin(&mut self) -> bool {
        if self.state != TimerState::Idle {
            return false;
        }

        self.state = TimerState::Running;
        true
    }

    /// Process one tick. Returns `None` when the session is not running.
    pub fn tick(&mut self, now: Instant) -> Option<Tick> {
        if !self.is_running() {
            return None;
        }

        let elapsed = self.elapsed(now);
        let action = tick::evaluate(elapsed, self.duration, self.warning_fired);

        match action {
            TickAction::Expire => {
                self.state = TimerState::Expired;
                self.ended_at = Some(now);

                Some(Tick {
                    action,
                    elapsed_seconds: elapsed,
                    reading: None,
                })
            }
            TickAction::Warn | TickAction::None => {
                if action == TickAction::Warn {
                    self.warning_fired = true;
                }

                Some(Tick {
                    action,
                    elapsed_seconds: elapsed,
                    reading: Some(tick::reading(elapsed, self.duration)),
                })
            }
        }
    }

    /// Stop a running session. Returns whether anything changed.
    pub fn stop(&mut self, now: Instant) -> bool {
        if !self.is_running() {
            return false;
        }

        self.state = TimerState::Stopped;
        self.ended_at = Some(now);
        true
    }

    pub fn snapshot(&self, now: Instant) -> TimerSnapshot {
        let elapsed = self.elapsed(now);

        TimerSnapshot {
            mode: self.mode(),
            state: self.state,
            duration_seconds: self.duration,
            elapsed_seconds: elapsed,
            remaining_seconds: self
                .duration
                .map(|duration| tick::remaining_seconds(elapsed, duration)),
            warning_fired: self.warning_fired,
            display: tick::reading(elapsed, self.duration),
        }
    }
}
