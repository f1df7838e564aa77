//! Process-level helpers for the hosting binary

pub mod signals;

pub use signals::shutdown_signal;
