//! Defaults and exit codes shared by the processor and its drivers.

use std::time::Duration;

/// Default pause between two consecutive elements, in milliseconds.
pub const DEFAULT_DELAY_MS: u64 = 1000;

/// Default pause between two consecutive elements.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(DEFAULT_DELAY_MS);

/// Percentage reported for the last element of a run.
pub const PROGRESS_COMPLETE: f64 = 100.0;

/// Process exit codes used by the `stepwise` binary.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error (failing observer or sink, worker panic).
    pub const ERROR_GENERIC: i32 = 1;
    /// The run was cancelled by the timeout watchdog.
    pub const ERROR_TIMEOUT: i32 = 2;
    /// The input was not a sequence or contained a non-numeric element.
    pub const ERROR_INVALID_INPUT: i32 = 4;
    /// The run was cancelled (Ctrl+C or explicit request).
    pub const ERROR_CANCELED: i32 = 130;
}
