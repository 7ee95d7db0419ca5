//! Status line notifier for the settings window
//!
//! Confirmations disappear after a fixed display duration; alerts stay until
//! the next message replaces them or the user dismisses them.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use super::constants::{STATUS_ERROR, STATUS_OK};
use crate::constants::messages::DISPLAY_DURATION_MS;
use crate::lifecycle::Notifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub title: String,
    pub text: String,
    pub severity: Severity,
    shown_at: Instant,
}

impl StatusMessage {
    pub fn color(&self) -> egui::Color32 {
        match self.severity {
            Severity::Info => STATUS_OK,
            Severity::Error => STATUS_ERROR,
        }
    }

    /// Time left on screen, `None` for messages that stay until dismissed
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        match self.severity {
            Severity::Info => Some(
                Duration::from_millis(DISPLAY_DURATION_MS)
                    .saturating_sub(now.saturating_duration_since(self.shown_at)),
            ),
            Severity::Error => None,
        }
    }
}

/// Cloneable handle; clones share the same status line
#[derive(Debug, Clone, Default)]
pub struct StatusNotifier {
    current: Rc<RefCell<Option<StatusMessage>>>,
}

impl StatusNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Message still due on screen at `now`, dropping an expired one
    pub fn visible(&self, now: Instant) -> Option<StatusMessage> {
        let mut current = self.current.borrow_mut();
        let expired = current
            .as_ref()
            .and_then(|m| m.remaining(now))
            .is_some_and(|left| left.is_zero());
        if expired {
            *current = None;
        }
        current.clone()
    }

    pub fn dismiss(&self) {
        self.current.borrow_mut().take();
    }

    fn show(&self, title: &str, text: &str, severity: Severity) {
        *self.current.borrow_mut() = Some(StatusMessage {
            title: title.to_string(),
            text: text.to_string(),
            severity,
            shown_at: Instant::now(),
        });
    }
}

impl Notifier for StatusNotifier {
    fn notify(&mut self, title: &str, message: &str) {
        info!(title, message, "Notification");
        self.show(title, message, Severity::Info);
    }

    fn alert(&mut self, title: &str, message: &str) {
        warn!(title, message, "Alert");
        self.show(title, message, Severity::Error);
    }
}
