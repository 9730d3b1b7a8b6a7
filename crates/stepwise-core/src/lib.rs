//! # stepwise-core
//!
//! Cancellable, progress-reporting sequential processor.
//!
//! A run takes an ordered sequence of numbers, consumes one element at a
//! time with a fixed pause between elements, reports the completed
//! percentage after each one, and can be cancelled cooperatively from
//! another thread through its [`ProcessHandle`].

pub mod constants;
pub mod error;
pub mod handle;
pub mod input;
pub mod observer;
pub mod observers;
pub mod options;
pub mod processor;
pub mod progress;
pub mod sink;
pub mod state;

// Re-exports
pub use constants::{exit_codes, DEFAULT_DELAY, DEFAULT_DELAY_MS};
pub use error::{ObserverError, ProcessError, SinkError};
pub use handle::ProcessHandle;
pub use input::InputSequence;
pub use observer::{ProgressObserver, ProgressSubject};
pub use options::ProcessOptions;
pub use processor::{RunSummary, SequentialProcessor};
pub use progress::{CancellationToken, ProgressUpdate};
pub use state::RunState;

/// Validate `input` as a sequence and start processing it with `options`.
///
/// `on_progress` receives the completed percentage after each element.
/// The returned handle can cancel the run while it is in flight.
///
/// # Example
/// ```
/// use serde_json::json;
/// use stepwise_core::{process, ProcessError, ProcessOptions};
///
/// let handle = process(json!([1, 2, 3]), ProcessOptions::immediate(), |_| Ok(())).unwrap();
/// assert_eq!(handle.wait().unwrap().processed, 3);
///
/// let err = process(json!("nope"), ProcessOptions::immediate(), |_| Ok(())).err().unwrap();
/// assert!(matches!(err, ProcessError::InvalidInput(_)));
/// ```
pub fn process<F>(
    input: serde_json::Value,
    options: ProcessOptions,
    on_progress: F,
) -> Result<ProcessHandle, ProcessError>
where
    F: Fn(f64) -> Result<(), ObserverError> + Send + Sync + 'static,
{
    SequentialProcessor::new(options)
        .on_progress(on_progress)
        .process_value(input)
}
