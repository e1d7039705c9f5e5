//! User-facing failure notifications.
//!
//! Repositories report every failure they surface to the user through an
//! injected `Notifier`; hosts decide how to render it (toast, stderr, ...).

use log::warn;
use std::sync::Mutex;

pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// Forwards notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, message: &str) {
        warn!("event=user_notice module=notify level=error message={message}");
    }
}

/// Discards notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn error(&self, _message: &str) {}
}

/// Collects notifications in memory until drained.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    messages: Mutex<Vec<String>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }

    pub fn drain(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|mut messages| std::mem::take(&mut *messages))
            .unwrap_or_default()
    }
}

impl Notifier for MemoryNotifier {
    fn error(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryNotifier, Notifier};

    #[test]
    fn memory_notifier_keeps_order_and_drains() {
        let notifier = MemoryNotifier::new();
        notifier.error("first");
        notifier.error("second");

        assert_eq!(notifier.messages(), vec!["first", "second"]);
        assert_eq!(notifier.drain().len(), 2);
        assert!(notifier.messages().is_empty());
    }
}
