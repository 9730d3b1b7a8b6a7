//! The sequential processor.
//!
//! A run walks the sequence in order. Each step checks the cancellation
//! token, validates the element, hands it to the sink, reports progress,
//! then sleeps before the next element. The sleep is the only suspension
//! point and is never interrupted; a cancellation requested during it is
//! observed at the top of the next step.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, info, info_span, warn};

use crate::error::{ObserverError, ProcessError};
use crate::handle::ProcessHandle;
use crate::input::InputSequence;
use crate::observer::{ProgressObserver, ProgressSubject};
use crate::observers::{FnObserver, ProgressEvents};
use crate::options::ProcessOptions;
use crate::progress::{CancellationToken, ProgressUpdate};
use crate::sink::{ElementSink, TracingSink};
use crate::state::{RunState, StateCell};

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of elements processed.
    pub processed: usize,
    /// Length of the input sequence.
    pub total: usize,
    /// Wall time spent in the run.
    pub elapsed: Duration,
}

impl RunSummary {
    /// Summary of a run over an empty sequence.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            processed: 0,
            total: 0,
            elapsed: Duration::ZERO,
        }
    }
}

/// Processes one sequence per run, strictly in order, with a pause between
/// elements.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use stepwise_core::{InputSequence, ProcessOptions, SequentialProcessor};
/// use stepwise_core::observers::RecordingObserver;
/// use stepwise_core::progress::CancellationToken;
///
/// let recorder = Arc::new(RecordingObserver::new());
/// let processor = SequentialProcessor::new(ProcessOptions::immediate())
///     .with_observer(recorder.clone());
///
/// let input = InputSequence::from(vec![1.0, 2.0]);
/// let summary = processor.run(&input, &CancellationToken::new()).unwrap();
/// assert_eq!(summary.processed, 2);
/// assert_eq!(recorder.percents(), vec![50.0, 100.0]);
/// ```
pub struct SequentialProcessor {
    options: ProcessOptions,
    subject: ProgressSubject,
    sink: Arc<dyn ElementSink>,
}

impl SequentialProcessor {
    /// Create a processor with no observers and the tracing sink.
    #[must_use]
    pub fn new(options: ProcessOptions) -> Self {
        Self {
            options,
            subject: ProgressSubject::new(),
            sink: Arc::new(TracingSink),
        }
    }

    /// The options this processor runs with.
    #[must_use]
    pub fn options(&self) -> &ProcessOptions {
        &self.options
    }

    /// Register a progress observer.
    #[must_use]
    pub fn with_observer(self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.subject.register(observer);
        self
    }

    /// Register a callback receiving the completed percentage after each element.
    ///
    /// Returning an error fails the run with that error.
    #[must_use]
    pub fn on_progress<F>(self, callback: F) -> Self
    where
        F: Fn(f64) -> Result<(), ObserverError> + Send + Sync + 'static,
    {
        self.with_observer(Arc::new(FnObserver::new(callback)))
    }

    /// Replace the element sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn ElementSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Attach a progress stream.
    ///
    /// The stream ends once the processor is dropped, which for
    /// [`spawn`](Self::spawn) happens when the run settles.
    #[must_use]
    pub fn with_events(self) -> (Self, ProgressEvents) {
        let (observer, events) = ProgressEvents::channel();
        (self.with_observer(Arc::new(observer)), events)
    }

    /// Validate a dynamic value as a sequence and start processing it.
    ///
    /// Fails immediately with [`ProcessError::InvalidInput`] when the value
    /// is not a sequence; nothing is consumed or reported in that case.
    pub fn process_value(self, value: Value) -> Result<ProcessHandle, ProcessError> {
        let input = InputSequence::from_value(value)?;
        self.spawn(input)
    }

    /// Start processing on a worker thread and return its handle immediately.
    ///
    /// An empty sequence completes at once without starting a worker.
    pub fn spawn(self, input: InputSequence) -> Result<ProcessHandle, ProcessError> {
        if input.is_empty() {
            debug!("Empty input, nothing to process");
            return Ok(ProcessHandle::completed());
        }

        let cancel = CancellationToken::new();
        let state = StateCell::default();

        let worker_cancel = cancel.clone();
        let worker_state = state.clone();
        let worker = thread::Builder::new()
            .name("stepwise-run".into())
            .spawn(move || self.run_tracked(&input, &worker_cancel, &worker_state))?;

        Ok(ProcessHandle::new(cancel, state, worker))
    }

    /// Run to completion on the calling thread.
    ///
    /// The caller owns the token and may cancel it from another thread or
    /// from inside an observer.
    pub fn run(
        &self,
        input: &InputSequence,
        cancel: &CancellationToken,
    ) -> Result<RunSummary, ProcessError> {
        self.run_tracked(input, cancel, &StateCell::default())
    }

    fn run_tracked(
        &self,
        input: &InputSequence,
        cancel: &CancellationToken,
        state: &StateCell,
    ) -> Result<RunSummary, ProcessError> {
        let span = info_span!(
            "run",
            total = input.len(),
            observers = self.subject.count(),
            delay_ms = u64::try_from(self.options.delay.as_millis()).unwrap_or(u64::MAX)
        );
        let _guard = span.enter();

        state.start();
        let start = Instant::now();
        let result = self.iterate(input, cancel, start);

        match &result {
            Ok(summary) => {
                state.finish(RunState::Completed);
                info!(
                    processed = summary.processed,
                    elapsed_ms = u64::try_from(summary.elapsed.as_millis()).unwrap_or(u64::MAX),
                    "Run completed"
                );
            }
            Err(ProcessError::Cancelled) => {
                state.finish(RunState::Aborted);
                warn!("Run cancelled");
            }
            Err(e) => {
                state.finish(RunState::Failed);
                warn!(error = %e, "Run failed");
            }
        }
        result
    }

    fn iterate(
        &self,
        input: &InputSequence,
        cancel: &CancellationToken,
        start: Instant,
    ) -> Result<RunSummary, ProcessError> {
        let total = input.len();

        for index in 0..total {
            cancel.check_cancelled()?;

            let value = input
                .number_at(index)
                .ok_or(ProcessError::InvalidElement { index })?;

            self.sink.consume(index, value).map_err(ProcessError::Sink)?;

            let update = ProgressUpdate::new(index, total, value);
            debug!(index, percent = update.percent, "Element consumed");
            self.subject
                .notify(&update)
                .map_err(ProcessError::Observer)?;

            if !update.is_final() && !self.options.delay.is_zero() {
                thread::sleep(self.options.delay);
            }
        }

        Ok(RunSummary {
            processed: total,
            total,
            elapsed: start.elapsed(),
        })
    }
}

impl Default for SequentialProcessor {
    fn default() -> Self {
        Self::new(ProcessOptions::default())
    }
}
