//! Join-on-drop thread guard.

use std::fmt;
use std::panic;
use std::thread::{self, JoinHandle};

/// A guard that joins its thread when dropped.
///
/// Wrapping a [`JoinHandle`] in a `ThreadGuard` ensures the thread is
/// joined even when the enclosing scope is left early, by return or by
/// panic, so test and example code cannot leak threads.
///
/// If the guarded thread panicked, dropping the guard re-raises that
/// panic on the current thread, unless the current thread is already
/// unwinding.
///
/// # Examples
///
/// ```
/// use std::thread;
/// use csp_channel::{Channel, ThreadGuard};
///
/// let c = Channel::new();
///
/// let c2 = c.clone();
/// let _guard = ThreadGuard::new(thread::spawn(move || c2.send(1)));
///
/// assert_eq!(c.recv(), 1);
/// // The sender is joined when `_guard` goes out of scope.
/// ```
pub struct ThreadGuard<T> {
    handle: Option<JoinHandle<T>>,
}

impl<T> ThreadGuard<T> {
    /// Takes ownership of a thread handle.
    pub fn new(handle: JoinHandle<T>) -> ThreadGuard<T> {
        ThreadGuard {
            handle: Some(handle),
        }
    }

    /// Joins the thread now, returning its result.
    ///
    /// # Panics
    ///
    /// Re-raises the thread's panic, if it panicked.
    pub fn join(mut self) -> T {
        let handle = self.handle.take().unwrap();
        handle.join().unwrap_or_else(|e| panic::resume_unwind(e))
    }
}

impl<T> fmt::Debug for ThreadGuard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad("ThreadGuard { .. }")
    }
}

impl<T> Drop for ThreadGuard<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.join() {
                if !thread::panicking() {
                    panic::resume_unwind(e);
                }
            }
        }
    }
}
