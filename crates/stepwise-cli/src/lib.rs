//! # stepwise-cli
//!
//! CLI output, progress display, and shell completion.

pub mod completion;
pub mod output;
pub mod presenter;
pub mod progress_bar;
pub mod ui;

pub use output::RunReport;
pub use presenter::{CLIResultPresenter, ResultPresenter};
pub use progress_bar::ProgressBarObserver;
