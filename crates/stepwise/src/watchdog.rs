//! Deadline watchdog: cancels a run that outlives its timeout.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{after, bounded, select, Sender};
use tracing::warn;

use stepwise_core::CancellationToken;

/// Background timer that requests cancellation when a deadline passes.
///
/// Disarmed when dropped.
pub struct Watchdog {
    disarm: Option<Sender<()>>,
    fired: Arc<AtomicBool>,
}

impl Watchdog {
    /// Start a watchdog that cancels `cancel` after `timeout`.
    #[must_use]
    pub fn arm(cancel: CancellationToken, timeout: Duration) -> Self {
        let (disarm_tx, disarm_rx) = bounded::<()>(0);
        let fired = Arc::new(AtomicBool::new(false));
        let fired_flag = fired.clone();

        thread::spawn(move || {
            select! {
                recv(disarm_rx) -> _ => {}
                recv(after(timeout)) -> _ => {
                    let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
                    warn!(timeout_ms, "Timeout reached, cancelling run");
                    fired_flag.store(true, Ordering::Release);
                    cancel.cancel();
                }
            }
        });

        Self {
            disarm: Some(disarm_tx),
            fired,
        }
    }

    /// A watchdog that never fires.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            disarm: None,
            fired: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether the deadline passed and cancellation was requested.
    #[must_use]
    pub fn fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// Stop the timer. Has no effect if it already fired.
    pub fn disarm(&mut self) {
        // Dropping the sender disconnects the channel and wakes the timer thread.
        self.disarm.take();
    }
}

impl Drop for Watchdog {
    fn drop(&mut self) {
        self.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_after_timeout() {
        let token = CancellationToken::new();
        let watchdog = Watchdog::arm(token.clone(), Duration::from_millis(10));
        thread::sleep(Duration::from_millis(200));
        assert!(watchdog.fired());
        assert!(token.is_cancelled());
    }

    #[test]
    fn disarmed_watchdog_does_not_fire() {
        let token = CancellationToken::new();
        let mut watchdog = Watchdog::arm(token.clone(), Duration::from_millis(100));
        watchdog.disarm();
        thread::sleep(Duration::from_millis(200));
        assert!(!watchdog.fired());
        assert!(!token.is_cancelled());
    }

    #[test]
    fn disabled_watchdog_never_fires() {
        let watchdog = Watchdog::disabled();
        assert!(!watchdog.fired());
    }
}
