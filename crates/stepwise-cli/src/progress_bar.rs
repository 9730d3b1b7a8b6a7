//! Terminal progress bar driven by progress updates.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use stepwise_core::{ObserverError, ProgressObserver, ProgressUpdate};

use crate::output::format_percent;

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}";

/// Observer that renders an `indicatif` progress bar.
pub struct ProgressBarObserver {
    bar: ProgressBar,
}

impl ProgressBarObserver {
    /// Visible bar for a sequence of `total` elements.
    #[must_use]
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::with_template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        Self { bar }
    }

    /// Bar that tracks progress without drawing anything.
    #[must_use]
    pub fn hidden(total: usize) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(total as u64);
        Self { bar }
    }

    /// Number of elements reported so far.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Leave the bar where it stopped, for runs that did not complete.
    pub fn abandon(&self) {
        if !self.bar.is_finished() {
            debug!(position = self.bar.position(), "Progress bar abandoned");
            self.bar.abandon();
        }
    }
}

impl ProgressObserver for ProgressBarObserver {
    fn on_progress(&self, update: &ProgressUpdate) -> Result<(), ObserverError> {
        self.bar.set_position(update.index as u64 + 1);
        self.bar.set_message(format_percent(update.percent));
        if update.is_final() {
            self.bar.finish();
        }
        Ok(())
    }
}
