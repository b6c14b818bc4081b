// The single status line and its auto-clear policy.
use crate::timer::{ScheduledTask, TimerId, TimerQueue};
use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Info,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub severity: Severity,
    /// Whether an auto-clear is armed for this message.
    pub transient: bool,
}

impl StatusMessage {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[derive(Debug)]
struct PendingClear {
    task: ScheduledTask,
    text: String,
}

/// Holds at most one live message. Setting a message cancels the previous
/// message's auto-clear.
#[derive(Debug, Default)]
pub struct StatusLine {
    current: Option<StatusMessage>,
    pending: Option<PendingClear>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&StatusMessage> {
        self.current.as_ref()
    }

    pub fn text(&self) -> Option<&str> {
        self.current.as_ref().map(|m| m.text.as_str())
    }

    pub fn set(
        &mut self,
        text: &str,
        severity: Severity,
        timeout: Option<Duration>,
        timers: &mut TimerQueue,
        now: Instant,
    ) {
        if let Some(previous) = self.pending.take() {
            previous.task.cancel();
        }

        self.current = if text.is_empty() {
            None
        } else {
            Some(StatusMessage {
                text: text.to_string(),
                severity,
                transient: timeout.is_some(),
            })
        };

        if let Some(delay) = timeout {
            self.pending = Some(PendingClear {
                task: timers.schedule(now, delay),
                text: text.to_string(),
            });
        }
    }

    /// Reacts to a fired timer. Returns true when the line was cleared.
    pub fn on_timer(&mut self, id: TimerId) -> bool {
        let Some(pending) = self.pending.take_if(|p| p.task.id() == id) else {
            return false;
        };

        if self.text() == Some(pending.text.as_str()) {
            self.current = None;
            return true;
        }
        false
    }
}
