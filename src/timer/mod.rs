//! Quiz timer module
//!
//! Pure tick evaluation and formatting live apart from the handle that
//! schedules ticks, so the warning and expiry rules can be tested without
//! waiting on a clock.

pub mod countdown;
pub mod format;
pub mod session;
pub mod tick;

// Re-export main types
pub use countdown::{CountdownTimer, DisplayTarget, NoHooks, TimerHooks};
pub use format::format_time;
pub use session::{TimerMode, TimerSession, TimerSnapshot, TimerState};
pub use tick::{evaluate, TickAction, TimerReading, URGENT_THRESHOLD_SECS, WARNING_THRESHOLD_SECS};
