//! A one-shot result cell.
//!
//! One producer ([`ResultSource`]) delivers exactly one outcome, a value or a
//! [`FailureRecord`], to one consumer ([`ResultSink`]) on another thread. The
//! consumer can block for the outcome, wait without taking it, or poll.
//!
//! If the producer goes away without settling, the consumer is woken with a
//! broken promise rather than left blocked.
//!
//! # Examples
//!
//! ```
//! use std::thread;
//! use std::time::Duration;
//!
//! let (mut source, sink) = result_cell::create::<i32>();
//! let producer = thread::spawn(move || {
//!     thread::sleep(Duration::from_millis(50));
//!     source.set_value(42).unwrap();
//! });
//! assert_eq!(sink.get().unwrap(), 42);
//! producer.join().expect("The producer thread has panicked");
//! ```
mod cell;
mod error;
mod failure;
mod sink;
mod source;

pub use crate::error::{AlreadySettled, SinkError, SourceError};
pub use crate::failure::FailureRecord;
pub use crate::sink::{ResultSink, WaitStatus};
pub use crate::source::ResultSource;

/// Creates a pending cell and returns its source together with the already
/// retrieved sink.
pub fn create<T>() -> (ResultSource<T>, ResultSink<T>) {
    ResultSource::with_sink()
}
