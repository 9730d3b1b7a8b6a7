//! Error handling and exit codes.

use stepwise_core::constants::exit_codes;
use stepwise_core::ProcessError;

/// Map a run error to the process exit code.
///
/// `timed_out` distinguishes a cancellation issued by the timeout watchdog
/// from one requested by the user.
pub fn exit_code(err: &ProcessError, timed_out: bool) -> i32 {
    match err {
        ProcessError::Cancelled if timed_out => exit_codes::ERROR_TIMEOUT,
        ProcessError::Cancelled => exit_codes::ERROR_CANCELED,
        e if e.is_invalid_input() => exit_codes::ERROR_INVALID_INPUT,
        _ => exit_codes::ERROR_GENERIC,
    }
}
