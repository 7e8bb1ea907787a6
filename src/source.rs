use std::fmt;
use std::sync::Arc;

use crate::cell::ResultCell;
use crate::{FailureRecord, ResultSink, SinkError, SourceError};

/// The producing half of a result cell.
///
/// A `ResultSource` is move-only: handing it to another thread hands over
/// the right to settle the cell. If it is dropped (or [closed]) before
/// settling while its sink is out, the sink receives a
/// [broken promise](FailureRecord::broken_promise) instead of blocking
/// forever.
///
/// # Examples
///
/// ```
/// use result_cell::ResultSource;
/// use std::thread;
///
/// let mut source = ResultSource::<String>::new();
/// let sink = source.get_sink().unwrap();
/// let producer = thread::spawn(move || {
///     source.set_value("🍓".into()).unwrap();
/// });
/// assert_eq!(sink.get().unwrap(), "🍓");
/// producer.join().expect("The producer thread has panicked");
/// ```
///
/// [closed]: ResultSource::close
pub struct ResultSource<T> {
    cell: Option<Arc<ResultCell<T>>>,
    sink_retrieved: bool,
}

impl<T> ResultSource<T> {
    /// A fresh source over a pending cell.
    pub fn new() -> Self {
        Self {
            cell: Some(Arc::new(ResultCell::new())),
            sink_retrieved: false,
        }
    }

    /// A fresh source whose sink is handed out immediately.
    pub(crate) fn with_sink() -> (Self, ResultSink<T>) {
        let cell = Arc::new(ResultCell::new());
        let sink = ResultSink::new(cell.clone());
        let source = Self {
            cell: Some(cell),
            sink_retrieved: true,
        };
        (source, sink)
    }

    /// Retrieves the paired sink. Succeeds at most once.
    pub fn get_sink(&mut self) -> Result<ResultSink<T>, SinkError> {
        let cell = self.cell.as_ref().ok_or(SinkError::NoState)?;
        if self.sink_retrieved {
            return Err(SinkError::AlreadyRetrieved);
        }
        self.sink_retrieved = true;
        tracing::trace!("sink retrieved");
        Ok(ResultSink::new(cell.clone()))
    }

    pub fn set_value(&mut self, value: T) -> Result<(), SourceError> {
        self.cell()?.settle_value(value)?;
        Ok(())
    }

    pub fn set_failure(&mut self, failure: FailureRecord) -> Result<(), SourceError> {
        self.cell()?.settle_failure(failure)?;
        Ok(())
    }

    /// Returns `true` once the cell holds an outcome. A closed source
    /// reports `false`.
    pub fn is_settled(&self) -> bool {
        self.cell.as_ref().is_some_and(|cell| cell.is_ready())
    }

    /// Returns `true` until the source is closed.
    pub fn has_state(&self) -> bool {
        self.cell.is_some()
    }

    /// Detaches this source from its cell.
    ///
    /// If the cell is still pending and the sink was retrieved, the cell is
    /// settled with a broken promise first. Calling `close` again is a
    /// no-op; dropping the source calls it.
    pub fn close(&mut self) {
        let Some(cell) = self.cell.take() else {
            return;
        };
        if !self.sink_retrieved || cell.is_ready() {
            return;
        }
        // the sink may have been dropped already; nobody to tell then.
        tracing::debug!("source dropped before settling; breaking promise");
        let _ = cell.settle_failure(FailureRecord::broken_promise());
    }

    fn cell(&self) -> Result<&ResultCell<T>, SourceError> {
        self.cell.as_deref().ok_or(SourceError::NoState)
    }
}

impl<T> Default for ResultSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for ResultSource<T> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<T> fmt::Debug for ResultSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSource")
            .field("cell", &self.cell)
            .field("sink_retrieved", &self.sink_retrieved)
            .finish()
    }
}
