use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cell::ResultCell;
use crate::SinkError;

/// Outcome of a timed wait on a [`ResultSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitStatus {
    Ready,
    Timeout,
}

/// The consuming half of a result cell.
///
/// [`get`](ResultSink::get) takes `self`: the outcome is moved out of the
/// cell exactly once, and a sink cannot be read twice. The observers
/// ([`is_ready`](ResultSink::is_ready), [`wait`](ResultSink::wait) and the
/// timed waits) leave the outcome in place.
///
/// # Examples
///
/// ```
/// use result_cell::FailureRecord;
/// use std::thread;
///
/// let (mut source, sink) = result_cell::create::<i32>();
/// let producer = thread::spawn(move || {
///     source.set_failure(FailureRecord::msg("💥")).unwrap();
/// });
/// sink.wait().unwrap();
/// assert!(sink.is_ready());
/// let err = sink.get().unwrap_err();
/// assert_eq!(err.to_string(), "💥");
/// producer.join().expect("The producer thread has panicked");
/// ```
pub struct ResultSink<T> {
    cell: Option<Arc<ResultCell<T>>>,
}

impl<T> ResultSink<T> {
    pub(crate) fn new(cell: Arc<ResultCell<T>>) -> Self {
        Self { cell: Some(cell) }
    }

    /// Blocks until the cell is settled and returns its outcome.
    ///
    /// A sink without state fails immediately with [`SinkError::NoState`];
    /// a settled failure comes back as [`SinkError::Failed`].
    pub fn get(self) -> Result<T, SinkError> {
        let cell = self.cell.ok_or(SinkError::NoState)?;
        Ok(cell.read_blocking()?)
    }

    /// Non-blocking readiness check. A sink without state is simply not
    /// ready.
    pub fn is_ready(&self) -> bool {
        self.cell.as_ref().is_some_and(|cell| cell.is_ready())
    }

    /// Blocks until the cell is settled, without taking the outcome.
    pub fn wait(&self) -> Result<(), SinkError> {
        self.cell()?.wait_blocking();
        Ok(())
    }

    pub fn wait_timeout(&self, timeout: Duration) -> Result<WaitStatus, SinkError> {
        let cell = self.cell()?;
        // an unrepresentable deadline is as good as no deadline
        match Instant::now().checked_add(timeout) {
            Some(deadline) => Ok(Self::status(cell.wait_deadline(deadline))),
            None => {
                cell.wait_blocking();
                Ok(WaitStatus::Ready)
            }
        }
    }

    pub fn wait_deadline(&self, deadline: Instant) -> Result<WaitStatus, SinkError> {
        Ok(Self::status(self.cell()?.wait_deadline(deadline)))
    }

    /// Returns `true` while this sink is attached to a cell.
    pub fn valid(&self) -> bool {
        self.cell.is_some()
    }

    fn status(ready: bool) -> WaitStatus {
        if ready {
            WaitStatus::Ready
        } else {
            WaitStatus::Timeout
        }
    }

    fn cell(&self) -> Result<&ResultCell<T>, SinkError> {
        self.cell.as_deref().ok_or(SinkError::NoState)
    }
}

impl<T> Default for ResultSink<T> {
    /// A sink with no associated state.
    fn default() -> Self {
        Self { cell: None }
    }
}

impl<T> fmt::Debug for ResultSink<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSink").field("cell", &self.cell).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FailureRecord, ResultSource};
    use std::thread;

    #[test]
    fn default_sink_fails_fast() {
        let sink = ResultSink::<u8>::default();
        assert!(!sink.valid());
        assert!(!sink.is_ready());
        assert!(matches!(sink.wait(), Err(SinkError::NoState)));
        assert!(matches!(
            sink.wait_timeout(Duration::from_millis(1)),
            Err(SinkError::NoState)
        ));
        assert!(matches!(
            sink.wait_deadline(Instant::now()),
            Err(SinkError::NoState)
        ));
        assert!(matches!(sink.get(), Err(SinkError::NoState)));
    }

    #[test]
    fn ready_value_is_returned_without_blocking() {
        let mut source = ResultSource::new();
        let sink = source.get_sink().unwrap();
        source.set_value(42).unwrap();
        assert!(sink.valid());
        assert!(sink.is_ready());
        assert_eq!(sink.wait_timeout(Duration::ZERO).unwrap(), WaitStatus::Ready);
        assert_eq!(sink.get().unwrap(), 42);
    }

    #[test]
    fn timed_wait_leaves_the_sink_usable() {
        let mut source = ResultSource::new();
        let sink = source.get_sink().unwrap();
        assert_eq!(
            sink.wait_timeout(Duration::from_millis(10)).unwrap(),
            WaitStatus::Timeout
        );
        assert!(sink.valid());
        assert!(!sink.is_ready());

        let producer = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            source.set_value("late").unwrap();
        });
        assert_eq!(
            sink.wait_timeout(Duration::from_secs(10)).unwrap(),
            WaitStatus::Ready
        );
        assert_eq!(sink.get().unwrap(), "late");
        producer.join().expect("The producer thread has panicked");
    }

    #[test]
    fn huge_timeout_still_returns() {
        let mut source = ResultSource::new();
        let sink = source.get_sink().unwrap();
        source.set_value(()).unwrap();
        assert_eq!(sink.wait_timeout(Duration::MAX).unwrap(), WaitStatus::Ready);
        assert!(sink.get().is_ok());
    }

    #[test]
    fn wait_sees_failure_without_consuming_it() {
        let mut source = ResultSource::<u8>::new();
        let sink = source.get_sink().unwrap();
        source.set_failure(FailureRecord::msg("boom")).unwrap();
        sink.wait().unwrap();
        sink.wait().unwrap();
        let err = sink.get().unwrap_err();
        assert_eq!(err.failure().map(ToString::to_string).as_deref(), Some("boom"));
    }
}
