//! The channel interface.

use std::fmt;
use std::sync::Arc;

use crate::core::Core;

/// A bidirectional handle onto a channel.
///
/// A channel transports values of a fixed element type between threads. It
/// is a first-class value: handles are cheap to clone, may be stored in
/// collections, passed to spawned threads, or even sent through other
/// channels. All handles onto the same channel share ownership of its
/// state; the channel lives as long as its longest-lived handle.
///
/// A channel of capacity 0 is a *rendezvous*: [`send`] returns only once a
/// receiver has taken the value. A channel of capacity N buffers up to N
/// values, so a send completes immediately while the buffer has room.
///
/// Channels are never closed and never null: sending and receiving stay
/// legal for the entire lifetime of the last handle. Producers that want
/// to unwind their consumers send a sentinel value instead.
///
/// [`send`]: Channel::send
///
/// # Examples
///
/// ```
/// use std::thread;
/// use csp_channel::Channel;
///
/// let c = Channel::new();
///
/// let c2 = c.clone();
/// let t = thread::spawn(move || {
///     // Blocks until the main thread receives.
///     c2.send(7);
/// });
///
/// assert_eq!(c.recv(), 7);
/// t.join().unwrap();
/// ```
pub struct Channel<T> {
    pub(crate) core: Arc<Core<T>>,
}

/// A receive-only view onto a channel.
///
/// Obtained from a [`Channel`] via [`receiver`] or a `From` conversion.
/// The direction restriction is a compile-time capability: a `Receiver`
/// exposes only the receive operations and cannot be converted back into
/// a bidirectional handle.
///
/// [`receiver`]: Channel::receiver
pub struct Receiver<T> {
    pub(crate) core: Arc<Core<T>>,
}

/// A send-only view onto a channel.
///
/// Obtained from a [`Channel`] via [`sender`] or a `From` conversion.
///
/// [`sender`]: Channel::sender
pub struct Sender<T> {
    pub(crate) core: Arc<Core<T>>,
}

impl<T> Channel<T> {
    /// Creates a rendezvous channel (capacity 0).
    ///
    /// A send on this channel does not return until a receiver has taken
    /// the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use csp_channel::Channel;
    ///
    /// let c = Channel::<String>::new();
    /// assert_eq!(c.capacity(), 0);
    /// ```
    pub fn new() -> Channel<T> {
        Channel::with_capacity(0)
    }

    /// Creates a channel that buffers up to `capacity` values.
    ///
    /// # Panics
    ///
    /// Panics if the capacity equals `usize::MAX`.
    ///
    /// # Examples
    ///
    /// ```
    /// use csp_channel::Channel;
    ///
    /// let c = Channel::with_capacity(3);
    ///
    /// // These complete without a receiver in sight.
    /// c.send('A');
    /// c.send('B');
    /// c.send('C');
    ///
    /// assert_eq!(c.recv(), 'A');
    /// ```
    pub fn with_capacity(capacity: usize) -> Channel<T> {
        Channel {
            core: Arc::new(Core::new(capacity)),
        }
    }

    /// Returns the channel's capacity.
    pub fn capacity(&self) -> usize {
        self.core.capacity()
    }

    /// Returns a send-only view onto this channel.
    pub fn sender(&self) -> Sender<T> {
        Sender {
            core: self.core.clone(),
        }
    }

    /// Returns a receive-only view onto this channel.
    pub fn receiver(&self) -> Receiver<T> {
        Receiver {
            core: self.core.clone(),
        }
    }

    /// Sends a value into the channel.
    ///
    /// Blocks while the buffer is full or another sender is awaiting its
    /// receiver; on a rendezvous channel it blocks until the value has
    /// been received.
    pub fn send(&self, value: T) {
        self.core.send(value);
    }

    /// Receives a value, blocking until one is available.
    ///
    /// Values sent through any handle onto this channel arrive in send
    /// order.
    pub fn recv(&self) -> T {
        self.core.recv()
    }

    /// Receives a value into a caller-provided slot.
    ///
    /// # Examples
    ///
    /// ```
    /// use csp_channel::Channel;
    ///
    /// let c = Channel::with_capacity(1);
    /// c.send("ping".to_string());
    ///
    /// let mut slot = String::new();
    /// c.recv_into(&mut slot);
    /// assert_eq!(slot, "ping");
    /// ```
    pub fn recv_into(&self, slot: &mut T) {
        *slot = self.core.recv();
    }

    /// Receives a value, transferring it into a heap allocation.
    pub fn recv_boxed(&self) -> Box<T> {
        Box::new(self.core.recv())
    }
}

impl<T> Receiver<T> {
    /// Returns the channel's capacity.
    pub fn capacity(&self) -> usize {
        self.core.capacity()
    }

    /// Receives a value, blocking until one is available.
    pub fn recv(&self) -> T {
        self.core.recv()
    }

    /// Receives a value into a caller-provided slot.
    pub fn recv_into(&self, slot: &mut T) {
        *slot = self.core.recv();
    }

    /// Receives a value, transferring it into a heap allocation.
    pub fn recv_boxed(&self) -> Box<T> {
        Box::new(self.core.recv())
    }
}

impl<T> Sender<T> {
    /// Returns the channel's capacity.
    pub fn capacity(&self) -> usize {
        self.core.capacity()
    }

    /// Sends a value into the channel.
    ///
    /// Blocks while the buffer is full or another sender is awaiting its
    /// receiver; on a rendezvous channel it blocks until the value has
    /// been received.
    pub fn send(&self, value: T) {
        self.core.send(value);
    }
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Channel<T> {
        Channel {
            core: self.core.clone(),
        }
    }
}

impl<T> Clone for Receiver<T> {
    fn clone(&self) -> Receiver<T> {
        Receiver {
            core: self.core.clone(),
        }
    }
}

impl<T> Clone for Sender<T> {
    fn clone(&self) -> Sender<T> {
        Sender {
            core: self.core.clone(),
        }
    }
}

impl<T> Default for Channel<T> {
    fn default() -> Channel<T> {
        Channel::new()
    }
}

impl<T> From<Channel<T>> for Receiver<T> {
    fn from(c: Channel<T>) -> Receiver<T> {
        Receiver { core: c.core }
    }
}

impl<T> From<&Channel<T>> for Receiver<T> {
    fn from(c: &Channel<T>) -> Receiver<T> {
        c.receiver()
    }
}

impl<T> From<&Receiver<T>> for Receiver<T> {
    fn from(r: &Receiver<T>) -> Receiver<T> {
        r.clone()
    }
}

impl<T> From<Channel<T>> for Sender<T> {
    fn from(c: Channel<T>) -> Sender<T> {
        Sender { core: c.core }
    }
}

impl<T> From<&Channel<T>> for Sender<T> {
    fn from(c: &Channel<T>) -> Sender<T> {
        c.sender()
    }
}

impl<T> From<&Sender<T>> for Sender<T> {
    fn from(s: &Sender<T>) -> Sender<T> {
        s.clone()
    }
}

/// Handles compare equal iff they refer to the same channel.
impl<T> PartialEq for Channel<T> {
    fn eq(&self, other: &Channel<T>) -> bool {
        Arc::ptr_eq(&self.core, &other.core)
    }
}

impl<T> Eq for Channel<T> {}

impl<T> PartialEq for Receiver<T> {
    fn eq(&self, other: &Receiver<T>) -> bool {
        Arc::ptr_eq(&self.core, &other.core)
    }
}

impl<T> Eq for Receiver<T> {}

impl<T> PartialEq for Sender<T> {
    fn eq(&self, other: &Sender<T>) -> bool {
        Arc::ptr_eq(&self.core, &other.core)
    }
}

impl<T> Eq for Sender<T> {}

impl<T> PartialEq<Receiver<T>> for Channel<T> {
    fn eq(&self, other: &Receiver<T>) -> bool {
        Arc::ptr_eq(&self.core, &other.core)
    }
}

impl<T> PartialEq<Channel<T>> for Receiver<T> {
    fn eq(&self, other: &Channel<T>) -> bool {
        Arc::ptr_eq(&self.core, &other.core)
    }
}

impl<T> PartialEq<Sender<T>> for Channel<T> {
    fn eq(&self, other: &Sender<T>) -> bool {
        Arc::ptr_eq(&self.core, &other.core)
    }
}

impl<T> PartialEq<Channel<T>> for Sender<T> {
    fn eq(&self, other: &Channel<T>) -> bool {
        Arc::ptr_eq(&self.core, &other.core)
    }
}

impl<T> fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad("Channel { .. }")
    }
}

impl<T> fmt::Debug for Receiver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad("Receiver { .. }")
    }
}

impl<T> fmt::Debug for Sender<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad("Sender { .. }")
    }
}
