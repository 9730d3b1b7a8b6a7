//! Progress tracking types and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::constants::PROGRESS_COMPLETE;
use crate::error::ProcessError;

/// Progress update emitted after an element has been consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// Position of the element that just completed.
    pub index: usize,
    /// Length of the sequence.
    pub total: usize,
    /// The element's value.
    pub value: f64,
    /// Completed share of the run, in `(0, 100]`.
    pub percent: f64,
}

impl ProgressUpdate {
    /// Create an update for element `index` out of `total`.
    #[must_use]
    pub fn new(index: usize, total: usize, value: f64) -> Self {
        Self {
            index,
            total,
            value,
            percent: percent_complete(index, total),
        }
    }

    /// Whether this update reports the last element.
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.index + 1 == self.total
    }
}

/// Percentage complete after element `index` out of `total` has finished.
///
/// The last element always maps to exactly `100.0`.
///
/// ```
/// use stepwise_core::progress::percent_complete;
///
/// assert_eq!(percent_complete(1, 4), 50.0);
/// assert_eq!(percent_complete(2, 3), 100.0);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percent_complete(index: usize, total: usize) -> f64 {
    if total == 0 || index + 1 >= total {
        return PROGRESS_COMPLETE;
    }
    (index + 1) as f64 / total as f64 * PROGRESS_COMPLETE
}

/// Cooperative cancellation token using an atomic flag.
///
/// Clones share the same flag. Once cancelled it stays cancelled.
///
/// # Example
/// ```
/// use stepwise_core::progress::CancellationToken;
///
/// let token = CancellationToken::new();
/// assert!(!token.is_cancelled());
///
/// token.cancel();
/// assert!(token.is_cancelled());
/// assert!(token.check_cancelled().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new cancellation token.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check if cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check for cancellation, returning an error if cancelled.
    ///
    /// This is the loop-top checkpoint of a run.
    pub fn check_cancelled(&self) -> Result<(), ProcessError> {
        if self.is_cancelled() {
            Err(ProcessError::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
