//! Observer pattern for progress reporting.
//!
//! Observers are invoked synchronously on the processing thread after each
//! element. They must not block; an observer that fails ends the run with
//! its own error.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::ObserverError;
use crate::progress::ProgressUpdate;

/// Observer trait for receiving progress updates.
pub trait ProgressObserver: Send + Sync {
    /// Receive a progress update.
    fn on_progress(&self, update: &ProgressUpdate) -> Result<(), ObserverError>;
}

impl<O: ProgressObserver + ?Sized> ProgressObserver for Arc<O> {
    fn on_progress(&self, update: &ProgressUpdate) -> Result<(), ObserverError> {
        (**self).on_progress(update)
    }
}

/// Subject that manages a collection of observers.
pub struct ProgressSubject {
    observers: RwLock<Vec<Arc<dyn ProgressObserver>>>,
}

impl ProgressSubject {
    /// Create a new subject with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Register an observer.
    pub fn register(&self, observer: Arc<dyn ProgressObserver>) {
        self.observers.write().push(observer);
    }

    /// Notify observers in registration order.
    ///
    /// Stops at the first observer that fails and returns its error;
    /// observers registered after it are not called for this update.
    pub fn notify(&self, update: &ProgressUpdate) -> Result<(), ObserverError> {
        let observers = self.observers.read();
        for observer in observers.iter() {
            observer.on_progress(update)?;
        }
        Ok(())
    }

    /// Get the number of registered observers.
    #[must_use]
    pub fn count(&self) -> usize {
        self.observers.read().len()
    }
}

impl Default for ProgressSubject {
    fn default() -> Self {
        Self::new()
    }
}
