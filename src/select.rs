//! The select interface.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use smallvec::SmallVec;

use crate::channel::{Receiver, Sender};
use crate::err::{SelectTimeoutError, TrySelectError};
use crate::signal::Signal;
use crate::utils;

/// One pending case, type-erased over its element and callback types.
///
/// Cases on different channels carry different element types, so the
/// multiplexer sees them only through this capability set: attempt the
/// transfer now, run the deferred user callback, and manage the
/// channel-side registration of the select's signal.
trait Case {
    /// Attempts the data transfer. On success the case is *fired*: a
    /// receive case has moved the value out of the channel (and into its
    /// slot, if it has one), a send case has delivered its value.
    fn try_fire(&mut self) -> bool;

    /// Runs the user callback of a fired case, if any.
    fn complete(&mut self);

    /// Registers the select's signal with this case's channel.
    fn register(&self, signal: &Arc<Signal>);

    /// Unregisters the select's signal from this case's channel.
    fn unregister(&self, signal: &Arc<Signal>);
}

/// Receive case delivering the value to a callback.
struct RecvCase<T, F: FnOnce(T)> {
    rx: Receiver<T>,
    callback: Option<F>,
    received: Option<T>,
}

impl<T, F: FnOnce(T)> Case for RecvCase<T, F> {
    fn try_fire(&mut self) -> bool {
        match self.rx.core.try_recv() {
            Some(value) => {
                self.received = Some(value);
                true
            }
            None => false,
        }
    }

    fn complete(&mut self) {
        if let (Some(f), Some(value)) = (self.callback.take(), self.received.take()) {
            f(value);
        }
    }

    fn register(&self, signal: &Arc<Signal>) {
        self.rx.core.register(signal);
    }

    fn unregister(&self, signal: &Arc<Signal>) {
        self.rx.core.unregister(signal);
    }
}

/// Receive case delivering the value into a caller slot.
struct RecvIntoCase<'s, T, F: FnOnce()> {
    rx: Receiver<T>,
    slot: &'s mut T,
    callback: Option<F>,
}

impl<'s, T, F: FnOnce()> Case for RecvIntoCase<'s, T, F> {
    fn try_fire(&mut self) -> bool {
        match self.rx.core.try_recv() {
            Some(value) => {
                *self.slot = value;
                true
            }
            None => false,
        }
    }

    fn complete(&mut self) {
        if let Some(f) = self.callback.take() {
            f();
        }
    }

    fn register(&self, signal: &Arc<Signal>) {
        self.rx.core.register(signal);
    }

    fn unregister(&self, signal: &Arc<Signal>) {
        self.rx.core.unregister(signal);
    }
}

/// Send case.
struct SendCase<T, F: FnOnce()> {
    tx: Sender<T>,
    value: Option<T>,
    callback: Option<F>,
}

impl<T, F: FnOnce()> Case for SendCase<T, F> {
    fn try_fire(&mut self) -> bool {
        let value = match self.value.take() {
            Some(value) => value,
            None => return false,
        };
        match self.tx.core.try_send(value) {
            Ok(()) => true,
            Err(value) => {
                self.value = Some(value);
                false
            }
        }
    }

    fn complete(&mut self) {
        if let Some(f) = self.callback.take() {
            f();
        }
    }

    fn register(&self, signal: &Arc<Signal>) {
        self.tx.core.register(signal);
    }

    fn unregister(&self, signal: &Arc<Signal>) {
        self.tx.core.unregister(signal);
    }
}

/// Creates an empty select.
///
/// Shorthand for [`Select::new`], so case chains read as a single
/// expression.
///
/// # Examples
///
/// ```
/// use csp_channel::{select, Channel};
///
/// let c = Channel::with_capacity(1);
/// let c2 = Channel::<i32>::new();
/// c.send(42);
///
/// let mut v = 0;
/// select()
///     .recv(&c2, |_| unreachable!())
///     .recv_only(&c, &mut v)
///     .wait();
/// assert_eq!(v, 42);
/// ```
pub fn select<'a>() -> Select<'a> {
    Select::new()
}

/// Waits on multiple channel cases and fires exactly one.
///
/// A `Select` accumulates send and receive cases and is then consumed by
/// one of the three terminators: [`wait`] blocks until some case can fire,
/// [`wait_timeout`] blocks up to a duration, and [`try_once`] inspects
/// every case once without blocking. Firing a case performs its data
/// transfer and then invokes its callback, if it has one.
///
/// Within one invocation cases are tried in the order they were added; the
/// first ready case fires. Direct sends and receives on the involved
/// channels, from any thread and through any endpoint, wake a blocked
/// select.
///
/// A `Select` is an ephemeral, stack-local value used by a single thread.
/// Placing both ends of the same channel inside one select is not
/// supported: the select may pair its own send case with its receive case
/// over the channel's buffer, or fail to fire at all.
///
/// [`wait`]: Select::wait
/// [`wait_timeout`]: Select::wait_timeout
/// [`try_once`]: Select::try_once
///
/// # Examples
///
/// ```
/// use std::thread;
/// use csp_channel::{select, Channel};
///
/// let c = Channel::<u32>::new();
///
/// let c2 = c.clone();
/// let t = thread::spawn(move || c2.send(10));
///
/// let mut v = 0;
/// select().recv_only(&c, &mut v).wait();
/// assert_eq!(v, 10);
/// t.join().unwrap();
/// ```
pub struct Select<'a> {
    /// The cases, in the order they were added.
    cases: SmallVec<[Box<dyn Case + 'a>; 4]>,
}

impl<'a> Select<'a> {
    /// Creates an empty select.
    pub fn new() -> Select<'a> {
        Select {
            cases: SmallVec::new(),
        }
    }

    /// Adds a receive case that passes the received value to `f`.
    ///
    /// # Examples
    ///
    /// ```
    /// use csp_channel::{select, Channel};
    ///
    /// let c = Channel::with_capacity(1);
    /// c.send(7);
    ///
    /// let mut v = 0;
    /// select().recv(&c, |k| v = k).wait();
    /// assert_eq!(v, 7);
    /// ```
    pub fn recv<T, R, F>(mut self, r: R, f: F) -> Select<'a>
    where
        R: Into<Receiver<T>>,
        T: 'a,
        F: FnOnce(T) + 'a,
    {
        self.cases.push(Box::new(RecvCase {
            rx: r.into(),
            callback: Some(f),
            received: None,
        }));
        self
    }

    /// Adds a receive case that moves the received value into `slot` and
    /// then runs `f`.
    pub fn recv_into<T, R, F>(mut self, r: R, slot: &'a mut T, f: F) -> Select<'a>
    where
        R: Into<Receiver<T>>,
        T: 'a,
        F: FnOnce() + 'a,
    {
        self.cases.push(Box::new(RecvIntoCase {
            rx: r.into(),
            slot,
            callback: Some(f),
        }));
        self
    }

    /// Adds a receive case that moves the received value into `slot`.
    pub fn recv_only<T, R>(mut self, r: R, slot: &'a mut T) -> Select<'a>
    where
        R: Into<Receiver<T>>,
        T: 'a,
    {
        self.cases.push(Box::new(RecvIntoCase {
            rx: r.into(),
            slot,
            callback: None::<fn()>,
        }));
        self
    }

    /// Adds a send case that delivers `value` and then runs `f`.
    ///
    /// # Examples
    ///
    /// ```
    /// use csp_channel::{select, Channel};
    ///
    /// let c = Channel::with_capacity(1);
    ///
    /// let mut sent = false;
    /// select().send(&c, 7, || sent = true).wait();
    /// assert!(sent);
    /// assert_eq!(c.recv(), 7);
    /// ```
    pub fn send<T, S, F>(mut self, s: S, value: T, f: F) -> Select<'a>
    where
        S: Into<Sender<T>>,
        T: 'a,
        F: FnOnce() + 'a,
    {
        self.cases.push(Box::new(SendCase {
            tx: s.into(),
            value: Some(value),
            callback: Some(f),
        }));
        self
    }

    /// Adds a send case that delivers `value`.
    pub fn send_only<T, S>(mut self, s: S, value: T) -> Select<'a>
    where
        S: Into<Sender<T>>,
        T: 'a,
    {
        self.cases.push(Box::new(SendCase {
            tx: s.into(),
            value: Some(value),
            callback: None::<fn()>,
        }));
        self
    }

    /// Blocks until one of the cases fires, then returns.
    ///
    /// # Panics
    ///
    /// Panics if no cases have been added: an empty select would block
    /// forever.
    pub fn wait(self) {
        if self.cases.is_empty() {
            panic!("no cases have been added to the select");
        }
        let fired = self.run(None);
        debug_assert!(fired);
    }

    /// Blocks until one of the cases fires, but only for a limited time.
    ///
    /// The timeout is measured against the monotonic clock and the call
    /// never gives up early: spurious wakeups go back to waiting. If no
    /// case fired within `timeout`, an error is returned and no callback
    /// has run. On an empty select the full timeout elapses before the
    /// error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use csp_channel::{select, Channel};
    ///
    /// let c = Channel::<i32>::new();
    ///
    /// // No sender in sight: times out.
    /// let res = select()
    ///     .recv(&c, |_| unreachable!())
    ///     .wait_timeout(Duration::from_millis(50));
    /// assert!(res.is_err());
    /// ```
    pub fn wait_timeout(self, timeout: Duration) -> Result<(), SelectTimeoutError> {
        let deadline = Instant::now() + timeout;

        if self.cases.is_empty() {
            utils::sleep_until(Some(deadline));
            return Err(SelectTimeoutError);
        }

        if self.run(Some(deadline)) {
            Ok(())
        } else {
            Err(SelectTimeoutError)
        }
    }

    /// Inspects every case once and fires the first ready one.
    ///
    /// Never blocks. If no case is ready, an error is returned and no
    /// callback has run.
    ///
    /// # Examples
    ///
    /// ```
    /// use csp_channel::{select, Channel};
    ///
    /// let c = Channel::<i32>::new();
    ///
    /// // A rendezvous channel with no pending sender is not ready.
    /// let res = select().recv(&c, |_| unreachable!()).try_once();
    /// assert!(res.is_err());
    /// ```
    pub fn try_once(mut self) -> Result<(), TrySelectError> {
        match self.scan() {
            Some(i) => {
                self.cases[i].complete();
                Ok(())
            }
            None => Err(TrySelectError),
        }
    }

    /// The blocking loop shared by `wait` and `wait_timeout`.
    ///
    /// Returns `true` if a case fired, `false` if the deadline passed
    /// first.
    fn run(mut self, deadline: Option<Instant>) -> bool {
        let signal = Arc::new(Signal::new());

        loop {
            // Fire the first ready case, if any.
            if let Some(i) = self.scan() {
                self.cases[i].complete();
                return true;
            }

            // None ready: ask every involved channel to wake us on a
            // state change, then look again. A transition between the
            // scan and the registration would otherwise go unseen.
            for case in self.cases.iter() {
                case.register(&signal);
            }
            if let Some(i) = self.scan() {
                self.unregister_all(&signal);
                self.cases[i].complete();
                return true;
            }

            let notified = match deadline {
                None => {
                    signal.wait();
                    true
                }
                Some(d) => signal.wait_until(d),
            };
            self.unregister_all(&signal);

            if !notified {
                // The deadline passed while we were blocked. One final
                // non-blocking pass, so the whole invocation appears as
                // a single operation from the outside.
                return match self.scan() {
                    Some(i) => {
                        self.cases[i].complete();
                        true
                    }
                    None => false,
                };
            }
        }
    }

    /// Tries every case in insertion order; returns the fired index.
    fn scan(&mut self) -> Option<usize> {
        for i in 0..self.cases.len() {
            if self.cases[i].try_fire() {
                return Some(i);
            }
        }
        None
    }

    fn unregister_all(&self, signal: &Arc<Signal>) {
        for case in self.cases.iter() {
            case.unregister(signal);
        }
    }
}

impl<'a> Default for Select<'a> {
    fn default() -> Select<'a> {
        Select::new()
    }
}

impl<'a> fmt::Debug for Select<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Select").finish()
    }
}
