//! UI collaborator contracts.
//!
//! The screens talk to the host interface through these traits only: a toast
//! sink for success/error feedback and a yes/no gate standing in for the
//! confirm dialog. Both are injected so tests swap in fakes.

use std::cell::RefCell;

/// Toast/notification sink. Fire-and-forget; no return value is consumed.
pub trait Notifier {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Notifier that drops every message.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn success(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// Notifier that forwards toasts to the tracing subscriber.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        tracing::info!(toast = "success", "{message}");
    }

    fn error(&self, message: &str) {
        tracing::warn!(toast = "error", "{message}");
    }
}

/// Notifier that records every toast, for tests and headless hosts.
#[derive(Default)]
pub struct RecordingNotifier {
    successes: RefCell<Vec<String>>,
    errors: RefCell<Vec<String>>,
}

impl RecordingNotifier {
    pub fn successes(&self) -> Vec<String> {
        self.successes.borrow().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.successes.borrow_mut().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
}

/// Content of a confirm/cancel dialog.
#[derive(Debug, Clone)]
pub struct ConfirmPrompt<'a> {
    pub title: &'a str,
    pub description: &'a str,
    /// Label on the confirm action
    pub confirm_label: &'a str,
    /// Destructive prompts render the confirm action in a warning color
    pub destructive: bool,
}

/// The reusable confirm/cancel dialog: a yes/no gate with caller-supplied
/// copy and no internal state.
pub trait ConfirmationGate {
    fn confirm(&self, prompt: &ConfirmPrompt<'_>) -> bool;
}

/// Gate that confirms immediately, for hosts without an interactive dialog.
pub struct AlwaysConfirm;

impl ConfirmationGate for AlwaysConfirm {
    fn confirm(&self, _prompt: &ConfirmPrompt<'_>) -> bool {
        true
    }
}

/// Gate that refuses everything; disables destructive actions outright.
pub struct NeverConfirm;

impl ConfirmationGate for NeverConfirm {
    fn confirm(&self, _prompt: &ConfirmPrompt<'_>) -> bool {
        false
    }
}
