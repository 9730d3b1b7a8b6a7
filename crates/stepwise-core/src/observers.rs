//! Concrete observer implementations.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use parking_lot::Mutex;
use tracing::info;

use crate::error::ObserverError;
use crate::observer::ProgressObserver;
use crate::progress::ProgressUpdate;

/// Observer backed by a closure receiving the completed percentage.
///
/// ```
/// use stepwise_core::observer::ProgressObserver;
/// use stepwise_core::observers::FnObserver;
/// use stepwise_core::progress::ProgressUpdate;
///
/// let observer = FnObserver::new(|percent| {
///     assert_eq!(percent, 100.0);
///     Ok(())
/// });
/// observer.on_progress(&ProgressUpdate::new(0, 1, 42.0)).unwrap();
/// ```
pub struct FnObserver<F> {
    callback: F,
}

impl<F> FnObserver<F>
where
    F: Fn(f64) -> Result<(), ObserverError> + Send + Sync,
{
    /// Wrap a progress callback.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressObserver for FnObserver<F>
where
    F: Fn(f64) -> Result<(), ObserverError> + Send + Sync,
{
    fn on_progress(&self, update: &ProgressUpdate) -> Result<(), ObserverError> {
        (self.callback)(update.percent)
    }
}

/// Observer that forwards updates through a channel without blocking.
///
/// A full or disconnected channel drops the update; it never fails the run.
pub struct ChannelObserver {
    sender: Sender<ProgressUpdate>,
}

impl ChannelObserver {
    /// Create a new channel observer.
    #[must_use]
    pub fn new(sender: Sender<ProgressUpdate>) -> Self {
        Self { sender }
    }
}

impl ProgressObserver for ChannelObserver {
    fn on_progress(&self, update: &ProgressUpdate) -> Result<(), ObserverError> {
        let _ = self.sender.try_send(update.clone());
        Ok(())
    }
}

/// Finite, non-restartable stream of progress updates for one run.
///
/// Iteration blocks until the next update arrives and ends once the run has
/// settled and every update has been drained.
pub struct ProgressEvents {
    receiver: Receiver<ProgressUpdate>,
}

impl ProgressEvents {
    /// Create a connected observer/stream pair.
    #[must_use]
    pub fn channel() -> (ChannelObserver, Self) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (ChannelObserver::new(tx), Self { receiver: rx })
    }

    /// Take the next update if one is already queued.
    ///
    /// Returns `None` both when nothing is queued yet and when the run is over.
    pub fn try_next(&self) -> Option<ProgressUpdate> {
        match self.receiver.try_recv() {
            Ok(update) => Some(update),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

impl Iterator for ProgressEvents {
    type Item = ProgressUpdate;

    fn next(&mut self) -> Option<Self::Item> {
        self.receiver.recv().ok()
    }
}

/// Observer that logs progress updates with temporal throttling.
///
/// The final update of a run is always logged.
pub struct LoggingObserver {
    min_interval: Duration,
    last_logged: Mutex<Option<Instant>>,
}

impl LoggingObserver {
    /// Create a new logging observer with the given minimum interval.
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_logged: Mutex::new(None),
        }
    }
}

impl ProgressObserver for LoggingObserver {
    fn on_progress(&self, update: &ProgressUpdate) -> Result<(), ObserverError> {
        let now = Instant::now();
        let mut last = self.last_logged.lock();

        if update.is_final() {
            info!(total = update.total, "Processing complete");
        } else {
            if let Some(prev) = *last {
                if now.duration_since(prev) < self.min_interval {
                    return Ok(());
                }
            }
            info!(
                index = update.index,
                total = update.total,
                progress = format!("{:.1}%", update.percent),
                "Progress update"
            );
        }
        *last = Some(now);
        Ok(())
    }
}

/// Observer that records every update it receives.
#[derive(Default)]
pub struct RecordingObserver {
    updates: Mutex<Vec<ProgressUpdate>>,
}

impl RecordingObserver {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Percentages received so far, in order.
    #[must_use]
    pub fn percents(&self) -> Vec<f64> {
        self.updates.lock().iter().map(|u| u.percent).collect()
    }

    /// All updates received so far, in order.
    #[must_use]
    pub fn updates(&self) -> Vec<ProgressUpdate> {
        self.updates.lock().clone()
    }

    /// Number of updates received.
    #[must_use]
    pub fn len(&self) -> usize {
        self.updates.lock().len()
    }

    /// Whether no update has been received.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updates.lock().is_empty()
    }
}

impl ProgressObserver for RecordingObserver {
    fn on_progress(&self, update: &ProgressUpdate) -> Result<(), ObserverError> {
        self.updates.lock().push(update.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fn_observer_receives_percent() {
        let seen = Mutex::new(Vec::new());
        let observer = FnObserver::new(|p| {
            seen.lock().push(p);
            Ok(())
        });
        observer.on_progress(&ProgressUpdate::new(0, 4, 9.0)).unwrap();
        observer.on_progress(&ProgressUpdate::new(1, 4, 9.0)).unwrap();
        assert_eq!(*seen.lock(), vec![25.0, 50.0]);
    }

    #[test]
    fn fn_observer_error_is_returned() {
        let observer = FnObserver::new(|_| Err("boom".into()));
        let err = observer
            .on_progress(&ProgressUpdate::new(0, 1, 1.0))
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn channel_observer_sends() {
        let (tx, rx) = crossbeam_channel::bounded(10);
        let observer = ChannelObserver::new(tx);
        observer.on_progress(&ProgressUpdate::new(0, 2, 5.0)).unwrap();

        let received = rx.try_recv().unwrap();
        assert_eq!(received.value, 5.0);
        assert_eq!(received.percent, 50.0);
    }

    #[test]
    fn channel_observer_full_channel_does_not_fail() {
        let (tx, _rx) = crossbeam_channel::bounded(1);
        let observer = ChannelObserver::new(tx);
        observer.on_progress(&ProgressUpdate::new(0, 3, 1.0)).unwrap();
        assert!(observer.on_progress(&ProgressUpdate::new(1, 3, 2.0)).is_ok());
    }

    #[test]
    fn channel_observer_disconnected_does_not_fail() {
        let (tx, rx) = crossbeam_channel::unbounded();
        drop(rx);
        let observer = ChannelObserver::new(tx);
        assert!(observer.on_progress(&ProgressUpdate::new(0, 1, 1.0)).is_ok());
    }

    #[test]
    fn progress_events_end_when_observer_dropped() {
        let (observer, events) = ProgressEvents::channel();
        observer.on_progress(&ProgressUpdate::new(0, 2, 1.0)).unwrap();
        observer.on_progress(&ProgressUpdate::new(1, 2, 2.0)).unwrap();
        drop(observer);

        let percents: Vec<f64> = events.map(|u| u.percent).collect();
        assert_eq!(percents, vec![50.0, 100.0]);
    }

    #[test]
    fn progress_events_try_next() {
        let (observer, events) = ProgressEvents::channel();
        assert!(events.try_next().is_none());
        observer.on_progress(&ProgressUpdate::new(0, 1, 3.0)).unwrap();
        assert_eq!(events.try_next().map(|u| u.value), Some(3.0));
        assert!(events.try_next().is_none());
    }

    #[test]
    fn logging_observer_throttles_without_failing() {
        let observer = LoggingObserver::new(Duration::from_secs(60));
        for i in 0..5 {
            assert!(observer.on_progress(&ProgressUpdate::new(i, 5, 1.0)).is_ok());
        }
    }

    #[test]
    fn recording_observer_records_in_order() {
        let observer = RecordingObserver::new();
        assert!(observer.is_empty());
        observer.on_progress(&ProgressUpdate::new(0, 2, 10.0)).unwrap();
        observer.on_progress(&ProgressUpdate::new(1, 2, 20.0)).unwrap();
        assert_eq!(observer.len(), 2);
        assert_eq!(observer.percents(), vec![50.0, 100.0]);
        assert_eq!(observer.updates()[1].value, 20.0);
    }
}
