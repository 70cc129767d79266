use std::error;
use std::fmt;

/// An error returned from the [`try_once`] method.
///
/// Failed because none of the cases in the select were ready.
///
/// [`try_once`]: crate::Select::try_once
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct TrySelectError;

/// An error returned from the [`wait_timeout`] method.
///
/// Failed because none of the cases in the select became ready before the
/// timeout.
///
/// [`wait_timeout`]: crate::Select::wait_timeout
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct SelectTimeoutError;

impl fmt::Display for TrySelectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "all cases in select would block".fmt(f)
    }
}

impl error::Error for TrySelectError {}

impl fmt::Display for SelectTimeoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        "timed out waiting on select".fmt(f)
    }
}

impl error::Error for SelectTimeoutError {}
