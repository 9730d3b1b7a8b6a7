//! Error types for sequential processing.

/// Error returned by a progress observer. Propagated verbatim.
pub type ObserverError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error returned by an element sink. Propagated verbatim.
pub type SinkError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Terminal outcome of a failed run.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// The supplied input is not a sequence.
    #[error("input must be a sequence: {0}")]
    InvalidInput(String),

    /// A non-numeric element was reached.
    #[error("element at index {index} is not a number")]
    InvalidElement {
        /// Position of the offending element.
        index: usize,
    },

    /// The run observed a cancellation request at a loop-top checkpoint.
    #[error("processing cancelled")]
    Cancelled,

    /// A progress observer failed.
    #[error(transparent)]
    Observer(ObserverError),

    /// The element sink failed.
    #[error(transparent)]
    Sink(SinkError),

    /// The worker thread could not be started.
    #[error("failed to start processing worker: {0}")]
    Spawn(#[from] std::io::Error),

    /// The worker thread panicked before settling the run.
    #[error("processing worker panicked")]
    WorkerPanicked,
}

impl ProcessError {
    /// Whether this outcome is a cancellation rather than a failure.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Whether this error was caused by the caller's input.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::InvalidElement { .. })
    }
}
