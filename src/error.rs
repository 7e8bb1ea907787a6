use thiserror::Error;

use crate::FailureRecord;

/// A second settlement was attempted on a cell that is already ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("result cell already settled")]
pub struct AlreadySettled;

/// Errors reported by [`ResultSource`](crate::ResultSource).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("promise already satisfied")]
    AlreadySatisfied,
    #[error("promise has no associated state")]
    NoState,
}

impl From<AlreadySettled> for SourceError {
    fn from(_: AlreadySettled) -> Self {
        SourceError::AlreadySatisfied
    }
}

/// Errors reported by [`ResultSink`](crate::ResultSink), and by
/// [`ResultSource::get_sink`](crate::ResultSource::get_sink).
#[derive(Debug, Clone, Error)]
pub enum SinkError {
    #[error("sink already retrieved")]
    AlreadyRetrieved,
    #[error("sink has no associated state")]
    NoState,
    /// The producer settled the cell with a failure (or abandoned it).
    #[error(transparent)]
    Failed(FailureRecord),
}

impl SinkError {
    /// The settled failure, if this error carries one.
    pub fn failure(&self) -> Option<&FailureRecord> {
        match self {
            SinkError::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// Returns `true` if the producer dropped its source without settling.
    pub fn is_broken_promise(&self) -> bool {
        self.failure().is_some_and(FailureRecord::is_broken_promise)
    }
}

impl From<FailureRecord> for SinkError {
    fn from(failure: FailureRecord) -> Self {
        SinkError::Failed(failure)
    }
}
