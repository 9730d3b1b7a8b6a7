//! CLI output formatting.

use std::time::Duration;

use serde::Serialize;

use stepwise_core::{ProcessError, RunState, RunSummary};

/// Machine-readable description of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Terminal state.
    pub status: RunState,
    /// Elements that completed, including their progress report.
    pub processed: usize,
    /// Length of the input.
    pub total: usize,
    /// Wall time of the run in milliseconds.
    pub elapsed_ms: u64,
    /// Error message when the run did not complete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Index of the offending element for invalid-element failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_index: Option<usize>,
    /// Percentages reported, in order.
    pub progress: Vec<f64>,
}

impl RunReport {
    /// Build a report from a run outcome and the progress observed during it.
    #[must_use]
    pub fn from_outcome(
        outcome: &Result<RunSummary, ProcessError>,
        total: usize,
        progress: Vec<f64>,
        elapsed: Duration,
    ) -> Self {
        let (status, error, failed_index) = match outcome {
            Ok(_) => (RunState::Completed, None, None),
            Err(ProcessError::Cancelled) => {
                (RunState::Aborted, Some(ProcessError::Cancelled.to_string()), None)
            }
            Err(e @ ProcessError::InvalidElement { index }) => {
                (RunState::Failed, Some(e.to_string()), Some(*index))
            }
            Err(e) => (RunState::Failed, Some(e.to_string()), None),
        };
        let processed = match outcome {
            Ok(summary) => summary.processed,
            Err(_) => progress.len(),
        };
        Self {
            status,
            processed,
            total,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            error,
            failed_index,
            progress,
        }
    }

    /// Report for input rejected before any element was looked at.
    #[must_use]
    pub fn rejected(err: &ProcessError) -> Self {
        Self {
            status: RunState::Failed,
            processed: 0,
            total: 0,
            elapsed_ms: 0,
            error: Some(err.to_string()),
            failed_index: None,
            progress: Vec::new(),
        }
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Format a duration for display.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.001 {
        format!("{:.2}µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.3}s")
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{mins}m{remaining:.1}s")
    }
}

/// Format a completed percentage with two decimals.
#[must_use]
pub fn format_percent(percent: f64) -> String {
    format!("{percent:.2}%")
}
