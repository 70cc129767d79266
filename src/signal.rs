//! Notification primitive for blocked selects.

use std::time::Instant;

use parking_lot::{Condvar, Mutex};

/// A one-shot, reusable wakeup token.
///
/// Each blocking select invocation owns one `Signal` and registers it with
/// every channel it is waiting on. Channels call [`notify`] whenever their
/// state changes; the select consumes the token in [`wait`] or
/// [`wait_until`] and rescans its cases.
///
/// Notifications are sticky: a `notify` that arrives while no thread is
/// waiting is observed by the next `wait`. Multiple notifications coalesce
/// into one token. Only one thread may wait at a time (a select runs on
/// exactly one thread).
///
/// [`notify`]: Signal::notify
/// [`wait`]: Signal::wait
/// [`wait_until`]: Signal::wait_until
pub(crate) struct Signal {
    notified: Mutex<bool>,
    cond: Condvar,
}

impl Signal {
    pub(crate) fn new() -> Signal {
        Signal {
            notified: Mutex::new(false),
            cond: Condvar::new(),
        }
    }

    /// Blocks until the token is available, then consumes it.
    pub(crate) fn wait(&self) {
        let mut notified = self.notified.lock();
        while !*notified {
            self.cond.wait(&mut notified);
        }
        *notified = false;
    }

    /// Blocks until the token is available or the deadline passes.
    ///
    /// Returns `true` if a token was consumed, `false` on timeout. Spurious
    /// condvar wakeups loop back into the wait, so `false` is only returned
    /// once the monotonic clock has actually reached `deadline`.
    pub(crate) fn wait_until(&self, deadline: Instant) -> bool {
        let mut notified = self.notified.lock();
        while !*notified {
            if self.cond.wait_until(&mut notified, deadline).timed_out() && !*notified {
                return false;
            }
        }
        *notified = false;
        true
    }

    /// Makes the token available and wakes the waiting thread, if any.
    pub(crate) fn notify(&self) {
        let mut notified = self.notified.lock();
        *notified = true;
        self.cond.notify_one();
    }
}
