//! CLI result presenter.

use std::time::Duration;

use stepwise_core::RunState;

use crate::output::{format_duration, RunReport};
use crate::ui::{print_cancelled, print_error, print_success};

/// Trait for presenting run results to the user.
pub trait ResultPresenter: Send + Sync {
    /// Present a finished run.
    fn present_report(&self, report: &RunReport) -> Result<(), serde_json::Error>;

    /// Present an error that prevented the run from starting.
    fn present_error(&self, error: &str);
}

/// CLI result presenter.
pub struct CLIResultPresenter {
    quiet: bool,
    json: bool,
}

impl CLIResultPresenter {
    #[must_use]
    pub fn new(quiet: bool, json: bool) -> Self {
        Self { quiet, json }
    }

    /// Human-readable one-line summary of a report.
    #[must_use]
    pub fn describe(report: &RunReport) -> String {
        let elapsed = format_duration(Duration::from_millis(report.elapsed_ms));
        match report.status {
            RunState::Completed => {
                format!("Processed {} elements in {elapsed}", report.processed)
            }
            RunState::Aborted => format!(
                "Cancelled after {} of {} elements ({elapsed})",
                report.processed, report.total
            ),
            _ => format!(
                "Failed after {} of {} elements: {}",
                report.processed,
                report.total,
                report.error.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}

impl ResultPresenter for CLIResultPresenter {
    fn present_report(&self, report: &RunReport) -> Result<(), serde_json::Error> {
        if self.json {
            println!("{}", report.to_json()?);
            return Ok(());
        }

        let line = Self::describe(report);
        match report.status {
            RunState::Completed => {
                if !self.quiet {
                    print_success(&line);
                }
            }
            RunState::Aborted => print_cancelled(&line),
            _ => print_error(&line),
        }
        Ok(())
    }

    fn present_error(&self, error: &str) {
        print_error(error);
    }
}
