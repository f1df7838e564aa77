//! Background tasks module
//!
//! This module contains the tasks that run alongside the HTTP server.

pub mod countdown;
pub mod notice_sweeper;

// Re-export main functions
pub(crate) use countdown::countdown_task;
pub use notice_sweeper::notice_sweeper_task;
