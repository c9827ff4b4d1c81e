// Transient user-facing notifications.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Success => "OK",
            Severity::Error => "Feil",
            Severity::Info => "Info",
            Severity::Warning => "Advarsel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub severity: Severity,
    pub message: String,
    pub expires_at: Instant,
}

/// Active notifications, oldest first. Each one lives for a fixed time unless
/// dismissed earlier.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    ttl: Duration,
    next_id: u64,
    active: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        NotificationCenter {
            ttl,
            next_id: 1,
            active: Vec::new(),
        }
    }

    pub fn push(&mut self, severity: Severity, message: impl Into<String>, now: Instant) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.active.push(Notification {
            id,
            severity,
            message: message.into(),
            expires_at: now + self.ttl,
        });
        id
    }

    /// Dismiss the newest notification, if any.
    pub fn dismiss_latest(&mut self) -> bool {
        self.active.pop().is_some()
    }

    /// Drop everything whose time is up. Returns whether anything was removed.
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.active.len();
        self.active.retain(|n| n.expires_at > now);
        self.active.len() != before
    }

    /// When the next notification runs out.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.active.iter().map(|n| n.expires_at).min()
    }

    pub fn active(&self) -> &[Notification] {
        &self.active
    }
}
