// Status bar notifications

use std::time::{SystemTime, UNIX_EPOCH};

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// Notification with timestamp
#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub timestamp: u64, // Unix timestamp in milliseconds
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

impl Notification {
    pub fn new(level: NotificationLevel, message: String) -> Self {
        Self {
            level,
            message,
            timestamp: now_millis(),
        }
    }

    pub fn info(message: String) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn warning(message: String) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    pub fn error(message: String) -> Self {
        Self::new(NotificationLevel::Error, message)
    }

    /// Whether the notification is younger than `max_age_ms`
    pub fn is_recent(&self, max_age_ms: u64) -> bool {
        now_millis().saturating_sub(self.timestamp) < max_age_ms
    }
}
