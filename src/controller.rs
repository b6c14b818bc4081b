// File: src/controller.rs
//! Central logic controller for the task list.
//! Every front end (TUI, command line, tests) delegates intents to `ListManager`,
//! which keeps the in-memory list, the stored copy and the rendered view in step.
use crate::config::Config;
use crate::gateway::PersistenceGateway;
use crate::status::{Severity, StatusLine, StatusMessage};
use crate::timer::{Clock, TimerQueue};
use crate::view::{Intent, ListView, Row};
use std::time::{Duration, Instant};

pub const MSG_EMPTY_LIST: &str = "No tasks yet. Add one above!";
pub const MSG_EMPTY_INPUT: &str = "Cannot add an empty task.";
pub const MSG_REMOVE_FAILED: &str = "Error removing task.";
pub const MSG_SAVE_FAILED: &str = "Could not save tasks. Storage might be full or disabled.";
pub const MSG_LOAD_FAILED: &str = "Error loading tasks. Storage might be corrupted.";

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerSettings {
    pub status_timeout: Duration,
    pub preview_chars: usize,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self {
            status_timeout: Duration::from_millis(3000),
            preview_chars: 20,
        }
    }
}

impl From<&Config> for ManagerSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            status_timeout: Duration::from_millis(cfg.status_timeout_ms),
            preview_chars: cfg.preview_chars,
        }
    }
}

/// First `max_chars` characters of `text` followed by an ellipsis.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Owns the task list for the whole session.
///
/// The only way to obtain one is `initialize`, so loading always happens
/// exactly once and before any intent.
pub struct ListManager<V: ListView> {
    items: Vec<String>,
    gateway: PersistenceGateway,
    view: V,
    status: StatusLine,
    timers: TimerQueue,
    clock: Box<dyn Clock>,
    settings: ManagerSettings,
}

impl<V: ListView> ListManager<V> {
    /// Loads the stored list and renders it.
    pub fn initialize(
        mut gateway: PersistenceGateway,
        view: V,
        clock: Box<dyn Clock>,
        settings: ManagerSettings,
    ) -> Self {
        let (items, load_failed) = match gateway.load() {
            Ok(items) => (items, false),
            Err(e) => {
                log::error!("Could not load tasks: {:#}", e);
                (Vec::new(), true)
            }
        };

        let mut manager = Self {
            items,
            gateway,
            view,
            status: StatusLine::new(),
            timers: TimerQueue::new(),
            clock,
            settings,
        };

        if load_failed {
            manager.set_status(MSG_LOAD_FAILED, Severity::Error, None);
        }
        manager.render();
        log::info!("Task list initialized with {} items", manager.items.len());
        manager
    }

    pub fn dispatch(&mut self, intent: Intent) {
        match intent {
            Intent::Submit(raw) => self.add_item(&raw),
            Intent::Remove(index) => self.remove_item(index),
        }
    }

    pub fn add_item(&mut self, raw_text: &str) {
        let text = raw_text.trim();

        if text.is_empty() {
            self.set_status(MSG_EMPTY_INPUT, Severity::Error, None);
            self.view.focus_input();
            return;
        }

        self.items.push(text.to_string());
        self.view.clear_input();
        let saved = self.persist();
        self.render();
        if saved {
            let msg = format!("Task \"{}\" added.", preview(text, self.settings.preview_chars));
            self.set_status(&msg, Severity::Info, Some(self.settings.status_timeout));
        }
        self.view.focus_input();
        log::debug!("Added task at position {}", self.items.len() - 1);
    }

    pub fn remove_item(&mut self, index: usize) {
        if index >= self.items.len() {
            log::warn!(
                "Attempted to remove task with invalid index: {} (len {})",
                index,
                self.items.len()
            );
            self.set_status(MSG_REMOVE_FAILED, Severity::Error, None);
            return;
        }

        let removed = self.items.remove(index);
        let saved = self.persist();
        self.render();
        if saved {
            let msg = format!(
                "Task \"{}\" removed.",
                preview(&removed, self.settings.preview_chars)
            );
            self.set_status(&msg, Severity::Info, Some(self.settings.status_timeout));
        }
        log::debug!("Removed task at position {}", index);
    }

    /// Rebuilds the whole view from the current list.
    pub fn render(&mut self) {
        let rows: Vec<Row> = self
            .items
            .iter()
            .enumerate()
            .map(|(index, text)| Row {
                index,
                text: text.clone(),
            })
            .collect();
        self.view.render_list(&rows);

        if self.items.is_empty() {
            let showing_error = self.status.current().is_some_and(StatusMessage::is_error);
            if !showing_error {
                self.set_status(MSG_EMPTY_LIST, Severity::Info, None);
            }
        } else if self.status.text() == Some(MSG_EMPTY_LIST) {
            self.set_status("", Severity::Info, None);
        }
    }

    /// Replaces the status line. With a timeout the message clears itself,
    /// unless something else has been shown in the meantime.
    pub fn set_status(&mut self, text: &str, severity: Severity, timeout: Option<Duration>) {
        let now = self.clock.now();
        self.status.set(text, severity, timeout, &mut self.timers, now);
        self.view.render_status(self.status.current());
    }

    /// Fires due timers. Call from the front end's event loop.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        for id in self.timers.fire_due(now) {
            if self.status.on_timer(id) {
                if self.items.is_empty() {
                    self.set_status(MSG_EMPTY_LIST, Severity::Info, None);
                } else {
                    self.view.render_status(None);
                }
            }
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.current()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn stored_value(&self) -> anyhow::Result<Option<String>> {
        self.gateway.raw()
    }

    /// Writes the list back. A failure is logged and shown; the in-memory list
    /// stays as it is and nothing is retried.
    fn persist(&mut self) -> bool {
        match self.gateway.save(&self.items) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Error saving tasks: {:#}", e);
                self.set_status(MSG_SAVE_FAILED, Severity::Error, None);
                false
            }
        }
    }
}
