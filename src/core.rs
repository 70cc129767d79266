//! The channel synchronization core.
//!
//! One `Core<T>` backs every endpoint of a channel. It owns the buffer, the
//! mutex, the three condition variables and the select registry, and
//! implements the blocking send/receive protocols plus the non-blocking
//! primitives used by select.

use std::collections::VecDeque;
use std::sync::Arc;
use std::thread::ThreadId;

use parking_lot::{Condvar, Mutex, MutexGuard};

use crate::signal::Signal;
use crate::utils::current_thread_id;
use crate::waker::Waker;

/// State guarded by the core's mutex.
struct Inner<T> {
    /// Values in flight, oldest at the front, each tagged with the id of
    /// the thread that sent it. Holds at most `capacity + 1` entries; the
    /// extra slot is occupied only while a sender awaits its receiver.
    buffer: VecDeque<(ThreadId, T)>,

    /// `false` while the most recent sender is still blocked waiting for
    /// its value to be consumed.
    send_done: bool,

    /// Selects waiting for this channel to change state.
    waker: Waker,
}

/// A rendezvous point (capacity 0) or bounded queue (capacity N).
pub(crate) struct Core<T> {
    capacity: usize,
    inner: Mutex<Inner<T>>,

    /// Notified when a sender may proceed to enqueue.
    send_begin: Condvar,

    /// Notified when a sender's enqueued value has been dequeued.
    send_end: Condvar,

    /// Notified when the buffer becomes non-empty.
    recv_ready: Condvar,
}

impl<T> Core<T> {
    pub(crate) fn new(capacity: usize) -> Core<T> {
        assert!(
            capacity < usize::MAX,
            "capacity must be strictly less than the largest possible usize value",
        );

        Core {
            capacity,
            inner: Mutex::new(Inner {
                buffer: VecDeque::new(),
                send_done: true,
                waker: Waker::new(),
            }),
            send_begin: Condvar::new(),
            send_end: Condvar::new(),
            recv_ready: Condvar::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    fn is_full(&self, inner: &Inner<T>) -> bool {
        inner.buffer.len() > self.capacity
    }

    /// Blocking send.
    pub(crate) fn send(&self, value: T) {
        // Unlock before notifying; otherwise the notified thread would
        // immediately block on the mutex again.
        {
            // Wait until the buffer is no longer full and any previous
            // send is not blocking its sender any longer.
            let mut inner = self.inner.lock();
            while self.is_full(&inner) || !inner.send_done {
                self.send_begin.wait(&mut inner);
            }
            inner.buffer.push_back((current_thread_id(), value));
            inner.send_done = false;
            inner.waker.notify_all();
        }

        self.recv_ready.notify_one();

        // Wait until the value has been received by another thread.
        {
            let mut inner = self.inner.lock();

            // Checking `!is_full` alone suffices: `send_done == false`
            // keeps every other sender out of the enqueue step, so no one
            // can refill the buffer while we didn't hold the lock.
            while self.is_full(&inner) {
                self.send_end.wait(&mut inner);
            }
            inner.send_done = true;
            inner.waker.notify_all();
        }

        self.send_begin.notify_one();
    }

    /// Non-blocking send, used when firing a select case.
    ///
    /// Succeeds exactly when a blocking send would reach the enqueue step
    /// without waiting. Unlike [`send`], it completes immediately: the
    /// value is left in the buffer and no in-flight phase begins, so the
    /// buffer may sit at `capacity + 1` entries with `send_done == true`
    /// until a receiver catches up.
    ///
    /// [`send`]: Core::send
    pub(crate) fn try_send(&self, value: T) -> Result<(), T> {
        {
            let mut inner = self.inner.lock();
            if self.is_full(&inner) || !inner.send_done {
                return Err(value);
            }
            inner.buffer.push_back((current_thread_id(), value));
            inner.waker.notify_all();
        }

        self.recv_ready.notify_one();
        Ok(())
    }

    /// Blocking receive. All three public receive shapes funnel here.
    pub(crate) fn recv(&self) -> T {
        let mut inner = self.inner.lock();
        while inner.buffer.is_empty() {
            self.recv_ready.wait(&mut inner);
        }
        self.finish_recv(inner)
    }

    /// Non-blocking receive, used when firing a select case.
    pub(crate) fn try_recv(&self) -> Option<T> {
        let inner = self.inner.lock();
        if inner.buffer.is_empty() {
            return None;
        }
        Some(self.finish_recv(inner))
    }

    /// Pops the front value from a non-empty buffer and performs the
    /// receive-side notifications.
    fn finish_recv(&self, mut inner: MutexGuard<'_, Inner<T>>) -> T {
        // A thread cannot receive a value it is itself blocked sending:
        // that configuration would deadlock by construction.
        debug_assert!(
            !self.is_full(&inner) || inner.buffer.front().unwrap().0 != current_thread_id()
        );

        let (_, value) = inner.buffer.pop_front().unwrap();
        debug_assert!(!self.is_full(&inner));

        let no_sender_in_flight = inner.send_done;
        inner.waker.notify_all();
        drop(inner);

        // Consider two concurrent sends s and s'. Suppose s waits to
        // enqueue (`send_begin`) while s' waits for acknowledgment
        // (`send_end`) that its enqueued value has been dequeued. s' must
        // finish before s may proceed, so `send_end` is the right target:
        // s' wakes, completes, and performs the `send_begin` notification
        // itself. Only when no sender is in flight (a select-fired send
        // leaves none) is a sender blocked on a full buffer woken here
        // directly.
        self.send_end.notify_one();
        if no_sender_in_flight {
            self.send_begin.notify_one();
        }

        value
    }

    /// Registers a select's signal with this channel.
    pub(crate) fn register(&self, signal: &Arc<Signal>) {
        self.inner.lock().waker.register(signal.clone());
    }

    /// Unregisters a select's signal. Idempotent.
    pub(crate) fn unregister(&self, signal: &Arc<Signal>) {
        self.inner.lock().waker.unregister(signal);
    }
}
