//! The shared core behind a source/sink pair.
use std::fmt;
use std::time::Instant;

use parking_lot::{Condvar, Mutex};

use crate::{AlreadySettled, FailureRecord};

/// One outcome, written at most once, observed by at most one consumer.
///
/// `ready` is `outcome.is_some()` until the consumer takes the outcome out;
/// it never goes back to `false`.
pub(crate) struct ResultCell<T> {
    state: Mutex<State<T>>,
    settled: Condvar,
}

struct State<T> {
    outcome: Option<Result<T, FailureRecord>>,
    ready: bool,
}

impl<T> ResultCell<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(State {
                outcome: None,
                ready: false,
            }),
            settled: Condvar::new(),
        }
    }

    pub(crate) fn settle_value(&self, value: T) -> Result<(), AlreadySettled> {
        self.settle(Ok(value))
    }

    pub(crate) fn settle_failure(&self, failure: FailureRecord) -> Result<(), AlreadySettled> {
        self.settle(Err(failure))
    }

    fn settle(&self, outcome: Result<T, FailureRecord>) -> Result<(), AlreadySettled> {
        let mut state = self.state.lock();
        if state.ready {
            tracing::debug!(
                failure = outcome.is_err(),
                "rejected settlement of an already settled cell"
            );
            return Err(AlreadySettled);
        }
        tracing::trace!(failure = outcome.is_err(), "settling cell");
        state.outcome = Some(outcome);
        state.ready = true;
        // at most one waiter
        self.settled.notify_all();
        Ok(())
    }

    /// Blocks until settled and takes the outcome out of the cell.
    ///
    /// Must be called at most once per cell; the sink enforces this by
    /// consuming itself.
    pub(crate) fn read_blocking(&self) -> Result<T, FailureRecord> {
        let mut state = self.state.lock();
        while !state.ready {
            self.settled.wait(&mut state);
        }
        match state.outcome.take() {
            Some(outcome) => outcome,
            None => unreachable!("result cell outcome was already taken"),
        }
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.state.lock().ready
    }

    pub(crate) fn wait_blocking(&self) {
        let mut state = self.state.lock();
        while !state.ready {
            self.settled.wait(&mut state);
        }
    }

    /// Blocks until settled or until `deadline` passes. Returns whether the
    /// cell is ready.
    pub(crate) fn wait_deadline(&self, deadline: Instant) -> bool {
        let mut state = self.state.lock();
        while !state.ready {
            if self.settled.wait_until(&mut state, deadline).timed_out() {
                tracing::trace!(ready = state.ready, "timed wait on result cell expired");
                return state.ready;
            }
        }
        true
    }
}

impl<T> fmt::Debug for ResultCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("ResultCell");
        match self.state.try_lock() {
            Some(state) => d.field("ready", &state.ready),
            None => d.field("ready", &format_args!("<locked>")),
        };
        d.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn settles_once() {
        let cell = ResultCell::new();
        assert!(!cell.is_ready());
        assert_eq!(cell.settle_value(1), Ok(()));
        assert!(cell.is_ready());
        assert_eq!(cell.settle_value(2), Err(AlreadySettled));
        assert_eq!(cell.settle_failure(FailureRecord::msg("late")), Err(AlreadySettled));
        assert_eq!(cell.read_blocking().ok(), Some(1));
    }

    #[test]
    fn failure_settles_once() {
        let cell = ResultCell::<u8>::new();
        assert_eq!(cell.settle_failure(FailureRecord::msg("boom")), Ok(()));
        assert_eq!(cell.settle_value(3), Err(AlreadySettled));
        let failure = cell.read_blocking().expect_err("cell holds a failure");
        assert_eq!(failure.to_string(), "boom");
    }

    #[test]
    fn stays_ready_after_the_outcome_is_taken() {
        let cell = ResultCell::new();
        cell.settle_value("x").unwrap();
        assert_eq!(cell.read_blocking().ok(), Some("x"));
        assert!(cell.is_ready());
        assert_eq!(cell.settle_value("y"), Err(AlreadySettled));
        cell.wait_blocking();
    }

    #[test]
    fn read_blocks_until_settled() {
        let cell = Arc::new(ResultCell::new());
        let producer = {
            let cell = cell.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                cell.settle_value(7).unwrap();
            })
        };
        assert_eq!(cell.read_blocking().ok(), Some(7));
        producer.join().expect("The producer thread has panicked");
    }

    #[test]
    fn wait_deadline_times_out_without_settling() {
        let cell = ResultCell::<()>::new();
        let deadline = Instant::now() + Duration::from_millis(10);
        assert!(!cell.wait_deadline(deadline));
        assert!(!cell.is_ready());
        cell.settle_value(()).unwrap();
        assert!(cell.wait_deadline(Instant::now()));
    }

    #[test]
    fn debug_does_not_need_debug_payload() {
        struct Opaque;
        let cell = ResultCell::<Opaque>::new();
        assert_eq!(format!("{cell:?}"), "ResultCell { ready: false }");
    }
}
