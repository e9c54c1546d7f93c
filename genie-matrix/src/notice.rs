//! User-facing notices
//!
//! The editor never talks to a message box. Anything the user should see is
//! queued here and the host drains the queue after each operation.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// One non-modal message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            NoticeLevel::Info => write!(f, "{}", self.message),
            NoticeLevel::Error => write!(f, "Error: {}", self.message),
        }
    }
}

/// Pending notices, oldest first
#[derive(Debug, Default)]
pub struct Notices {
    pending: Vec<Notice>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.pending.push(Notice {
            level: NoticeLevel::Info,
            message: message.into(),
        });
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.pending.push(Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        });
    }

    /// Take all pending notices
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.pending)
    }
}
