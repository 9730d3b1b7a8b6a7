//! Handle to an in-flight run.

use std::thread::JoinHandle;

use tracing::debug;

use crate::error::ProcessError;
use crate::processor::RunSummary;
use crate::progress::CancellationToken;
use crate::state::{RunState, StateCell};

/// Handle returned as soon as a run starts.
///
/// Dropping a handle whose run has not settled requests cancellation; the
/// run then stops at its next checkpoint.
#[derive(Debug)]
pub struct ProcessHandle {
    cancel: CancellationToken,
    state: StateCell,
    worker: Option<JoinHandle<Result<RunSummary, ProcessError>>>,
}

impl ProcessHandle {
    pub(crate) fn new(
        cancel: CancellationToken,
        state: StateCell,
        worker: JoinHandle<Result<RunSummary, ProcessError>>,
    ) -> Self {
        Self {
            cancel,
            state,
            worker: Some(worker),
        }
    }

    /// Handle for a run that had nothing to do.
    pub(crate) fn completed() -> Self {
        Self {
            cancel: CancellationToken::new(),
            state: StateCell::new(RunState::Completed),
            worker: None,
        }
    }

    /// Request cancellation.
    ///
    /// Idempotent and safe at any time. An in-progress delay is not cut
    /// short; the run stops when it next reaches a checkpoint. Has no effect
    /// once the run has settled.
    pub fn cancel(&self) {
        if self.state.get().is_terminal() {
            return;
        }
        debug!("Cancellation requested");
        self.cancel.cancel();
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// A token sharing this run's cancellation flag.
    ///
    /// Useful to cancel from another thread while this handle is waited on.
    #[must_use]
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.state.get()
    }

    /// Whether the run has settled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state.get().is_terminal()
    }

    /// Block until the run settles and return its outcome.
    pub fn wait(mut self) -> Result<RunSummary, ProcessError> {
        match self.worker.take() {
            Some(worker) => worker.join().unwrap_or_else(|_| {
                self.state.finish(RunState::Failed);
                Err(ProcessError::WorkerPanicked)
            }),
            None => Ok(RunSummary::empty()),
        }
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        if self.worker.is_some() && !self.state.get().is_terminal() {
            self.cancel.cancel();
        }
    }
}
