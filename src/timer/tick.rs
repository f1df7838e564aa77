//! Per-tick decisions for the quiz timer
//!
//! Everything here is a pure function of elapsed time, the optional quiz
//! duration and whether the warning has already fired. The scheduling task
//! only feeds these functions clock readings and acts on the result.

use serde::{Deserialize, Serialize};

use super::format::format_time;

/// Remaining time at which the one-time warning fires.
pub const WARNING_THRESHOLD_SECS: u64 = 300;

/// Remaining time at or below which the display is marked urgent.
pub const URGENT_THRESHOLD_SECS: u64 = 60;

/// What a single tick asks the timer to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickAction {
    None,
    Warn,
    Expire,
}

/// A formatted value for the display target
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerReading {
    /// `M:SS` or `H:MM:SS`
    pub text: String,
    /// Seconds behind `text`: remaining for a countdown, elapsed for a stopwatch
    pub seconds: u64,
    pub urgent: bool,
}

/// Seconds left in a countdown, clamped at zero.
pub fn remaining_seconds(elapsed: u64, duration: u64) -> u64 {
    duration.saturating_sub(elapsed)
}

/// Decides the action for a tick.
///
/// Expiry is checked before the warning, so a tick that reaches zero never warns.
/// Stopwatch sessions (`duration == None`) never warn or expire.
pub fn evaluate(elapsed: u64, duration: Option<u64>, warning_fired: bool) -> TickAction {
    let Some(duration) = duration else {
        return TickAction::None;
    };

    let remaining = remaining_seconds(elapsed, duration);

    if remaining == 0 {
        TickAction::Expire
    } else if remaining <= WARNING_THRESHOLD_SECS && !warning_fired {
        TickAction::Warn
    } else {
        TickAction::None
    }
}

/// Builds the reading shown for a tick.
pub fn reading(elapsed: u64, duration: Option<u64>) -> TimerReading {
    match duration {
        Some(duration) => {
            let remaining = remaining_seconds(elapsed, duration);
            TimerReading {
                text: format_time(remaining),
                seconds: remaining,
                urgent: remaining <= URGENT_THRESHOLD_SECS,
            }
        }
        None => TimerReading {
            text: format_time(elapsed),
            seconds: elapsed,
            urgent: false,
        },
    }
}
