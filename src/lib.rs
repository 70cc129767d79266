//! Go-style channels and select for communicating between threads.
//!
//! This crate provides typed, first-class communication channels in the
//! channel-and-select model of the Go language. A [`Channel`] transports
//! values of a fixed element type between preemptively scheduled threads;
//! a [`Select`] waits until any one of a set of pending send and receive
//! cases can proceed and fires exactly one of them.
//!
//! # Channels
//!
//! A channel of capacity 0 is a *rendezvous*: a send completes only once a
//! receiver has taken the value. A channel of capacity N buffers up to N
//! values. Values arrive in send order.
//!
//! Channels are first-class values: handles are cheap to clone, compare
//! equal when they refer to the same channel, and may themselves be sent
//! through other channels. Unlike Go, a channel is never nil and never
//! closed, which keeps every operation total; producers that want to shut
//! their consumers down send a sentinel value instead.
//!
//! Direction-restricted views are available as [`Sender`] and
//! [`Receiver`]. The restriction is a capability encoded in the type: a
//! bidirectional handle converts into either view, never back.
//!
//! ```
//! use std::thread;
//! use csp_channel::Channel;
//!
//! let c = Channel::new();
//!
//! let c2 = c.clone();
//! let t = thread::spawn(move || {
//!     c2.send("ping");
//! });
//!
//! assert_eq!(c.recv(), "ping");
//! t.join().unwrap();
//! ```
//!
//! # Select
//!
//! [`select`] builds a multi-case operation over any mix of channels and
//! element types:
//!
//! ```
//! use csp_channel::{select, Channel};
//!
//! let names = Channel::with_capacity(1);
//! let counts = Channel::<u64>::with_capacity(1);
//! names.send("hello".to_string());
//!
//! select()
//!     .recv(&names, |name| assert_eq!(name, "hello"))
//!     .recv(&counts, |_| unreachable!())
//!     .wait();
//! ```
//!
//! The terminators are [`wait`](Select::wait) (block until a case fires),
//! [`wait_timeout`](Select::wait_timeout) (block up to a duration) and
//! [`try_once`](Select::try_once) (never block).

#![warn(missing_docs, missing_debug_implementations)]

mod channel;
mod core;
mod err;
mod guard;
mod select;
mod signal;
mod utils;
mod waker;

pub use crate::channel::{Channel, Receiver, Sender};
pub use crate::err::{SelectTimeoutError, TrySelectError};
pub use crate::guard::ThreadGuard;
pub use crate::select::{select, Select};
