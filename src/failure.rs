//! The failure payload carried by a settled cell.
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

type BoxedCause = Arc<dyn StdError + Send + Sync + 'static>;

/// Why a result could not be produced.
///
/// A `FailureRecord` is opaque to the cell: it is stored once and handed to
/// the consumer unmodified. Cloning is cheap; clones share the same cause.
///
/// # Examples
///
/// ```
/// use result_cell::FailureRecord;
/// use std::io;
///
/// let failure = FailureRecord::new(io::Error::new(io::ErrorKind::Other, "disk on fire"));
/// assert_eq!(failure.to_string(), "disk on fire");
/// assert!(failure.downcast_ref::<io::Error>().is_some());
/// assert!(!failure.is_broken_promise());
/// ```
#[derive(Clone)]
pub struct FailureRecord {
    kind: Kind,
}

#[derive(Clone)]
enum Kind {
    BrokenPromise,
    Cause(BoxedCause),
}

#[derive(Debug, Error)]
#[error("{0}")]
struct Message(String);

impl FailureRecord {
    /// Captures an arbitrary error as the failure cause.
    pub fn new<E>(cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            kind: Kind::Cause(Arc::new(cause)),
        }
    }

    /// A failure carrying only a message.
    pub fn msg(message: impl fmt::Display) -> Self {
        Self::new(Message(message.to_string()))
    }

    /// The failure synthesized when a source is dropped without settling
    /// while its sink is still out.
    pub fn broken_promise() -> Self {
        Self {
            kind: Kind::BrokenPromise,
        }
    }

    pub fn is_broken_promise(&self) -> bool {
        matches!(self.kind, Kind::BrokenPromise)
    }

    /// The captured cause, if this is a producer-supplied failure.
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match &self.kind {
            Kind::BrokenPromise => None,
            Kind::Cause(cause) => Some(&**cause),
        }
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.cause()?.downcast_ref::<E>()
    }
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::BrokenPromise => f.write_str("broken promise"),
            Kind::Cause(cause) => fmt::Display::fmt(cause, f),
        }
    }
}

impl fmt::Debug for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Kind::BrokenPromise => f.write_str("FailureRecord(BrokenPromise)"),
            Kind::Cause(cause) => f.debug_tuple("FailureRecord").field(cause).finish(),
        }
    }
}

impl StdError for FailureRecord {
    // The message wrapper is an implementation detail, not a cause.
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.kind {
            Kind::Cause(cause) if !cause.is::<Message>() => Some(&**cause),
            _ => None,
        }
    }
}
