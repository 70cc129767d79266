//! Waking mechanism for selects blocked on channel operations.

use std::sync::Arc;

use crate::signal::Signal;

/// A registry of selects interested in one channel's state.
///
/// Lives behind the channel core's mutex, so registration and buffer state
/// are always observed together.
pub(crate) struct Waker {
    signals: Vec<Arc<Signal>>,
}

impl Waker {
    pub(crate) fn new() -> Waker {
        Waker {
            signals: Vec::new(),
        }
    }

    /// Registers a select's signal.
    ///
    /// A select with several cases on the same channel registers the same
    /// signal once per case; each registration is a separate entry.
    pub(crate) fn register(&mut self, signal: Arc<Signal>) {
        self.signals.push(signal);
    }

    /// Unregisters one entry for the given signal.
    ///
    /// A no-op when no entry is present, so deregistration is idempotent
    /// and safe against a notification racing with case completion.
    pub(crate) fn unregister(&mut self, signal: &Arc<Signal>) {
        if let Some(i) = self.signals.iter().position(|s| Arc::ptr_eq(s, signal)) {
            self.signals.remove(i);
        }
    }

    /// Notifies every registered select that the channel's state changed.
    pub(crate) fn notify_all(&self) {
        for signal in &self.signals {
            signal.notify();
        }
    }
}
