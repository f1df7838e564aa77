//! Transient user-visible notices

use std::{
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How long a notice stays visible unless told otherwise
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(5);

/// Visibility of the quiz time warning
pub const WARNING_NOTICE_TTL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Danger,
}

/// A message shown to the user for a limited time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub id: u64,
    pub message: String,
    pub level: NoticeLevel,
    pub created_at: DateTime<Utc>,
    pub ttl_seconds: u64,
}

impl Notice {
    pub fn expires_at(&self) -> DateTime<Utc> {
        let ttl = i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX);
        chrono::Duration::try_seconds(ttl)
            .and_then(|ttl| self.created_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

#[derive(Debug, Default)]
struct NoticeList {
    next_id: u64,
    notices: Vec<Notice>,
}

/// Notices owned by the hosting state
#[derive(Debug, Default)]
pub struct Notifications {
    inner: Mutex<NoticeList>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    fn list(&self) -> MutexGuard<'_, NoticeList> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Show a notice for `ttl`
    pub fn push(&self, message: impl Into<String>, level: NoticeLevel, ttl: Duration) -> Notice {
        let mut list = self.list();
        list.next_id += 1;

        let notice = Notice {
            id: list.next_id,
            message: message.into(),
            level,
            created_at: Utc::now(),
            ttl_seconds: ttl.as_secs(),
        };

        debug!("Notice #{} ({:?}): {}", notice.id, notice.level, notice.message);
        list.notices.push(notice.clone());
        notice
    }

    /// Show an info notice for the default time
    pub fn info(&self, message: impl Into<String>) -> Notice {
        self.push(message, NoticeLevel::Info, DEFAULT_NOTICE_TTL)
    }

    /// Notices still visible at `now`, oldest first
    pub fn active(&self, now: DateTime<Utc>) -> Vec<Notice> {
        self.list()
            .notices
            .iter()
            .filter(|notice| !notice.is_expired(now))
            .cloned()
            .collect()
    }

    /// Remove a notice before it expires
    pub fn dismiss(&self, id: u64) -> bool {
        let mut list = self.list();
        let before = list.notices.len();
        list.notices.retain(|notice| notice.id != id);
        list.notices.len() != before
    }

    /// Drop every expired notice, returning how many were removed
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        let mut list = self.list();
        let before = list.notices.len();
        list.notices.retain(|notice| !notice.is_expired(now));
        before - list.notices.len()
    }

    pub fn len(&self) -> usize {
        self.list().notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
