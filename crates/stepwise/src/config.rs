//! Application configuration from CLI flags and environment.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use stepwise_core::DEFAULT_DELAY_MS;

/// Input processed when neither `--input` nor `--file` is given.
pub const DEFAULT_INPUT: &str = "[1, 2, 3, 4, 5]";

/// stepwise: process a numeric sequence one element at a time, with a pause
/// between elements, progress reporting and cancellation.
#[derive(Parser, Debug)]
#[command(name = "stepwise", version, about)]
pub struct AppConfig {
    /// JSON array of numbers to process.
    #[arg(short, long, env = "STEPWISE_INPUT", conflicts_with = "file")]
    pub input: Option<String>,

    /// Read the JSON array from a file ("-" reads standard input).
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Pause between two elements, in milliseconds.
    #[arg(short, long, default_value_t = DEFAULT_DELAY_MS, env = "STEPWISE_DELAY_MS")]
    pub delay_ms: u64,

    /// Cancel the run once this much time has passed (e.g. "5s", "500ms", "1m").
    #[arg(long, value_parser = parse_duration, env = "STEPWISE_TIMEOUT")]
    pub timeout: Option<Duration>,

    /// Request cancellation after this many progress reports.
    #[arg(long)]
    pub cancel_after: Option<usize>,

    /// Write each processed value to standard output.
    #[arg(long)]
    pub print_values: bool,

    /// Print the outcome as JSON.
    #[arg(long)]
    pub json: bool,

    /// Quiet mode (no progress bar, nothing printed on success).
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output (log each element).
    #[arg(short, long)]
    pub verbose: bool,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Whether the progress bar should be drawn.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }
}

/// Parse a duration string like "5m", "1h", "30s", "250ms".
///
/// A bare number is read as seconds.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let invalid = || format!("invalid duration '{s}' (expected e.g. 500ms, 5s, 2m, 1h)");
    let number = |digits: &str| digits.trim().parse::<u64>().map_err(|_| invalid());

    if let Some(ms) = s.strip_suffix("ms") {
        Ok(Duration::from_millis(number(ms)?))
    } else if let Some(secs) = s.strip_suffix('s') {
        Ok(Duration::from_secs(number(secs)?))
    } else if let Some(mins) = s.strip_suffix('m') {
        Ok(Duration::from_secs(number(mins)?.saturating_mul(60)))
    } else if let Some(hours) = s.strip_suffix('h') {
        Ok(Duration::from_secs(number(hours)?.saturating_mul(3600)))
    } else {
        Ok(Duration::from_secs(number(s)?))
    }
}
