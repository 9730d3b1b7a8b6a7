//! Application entry point and dispatch.

use std::io::{self, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::debug;

use stepwise_cli::completion::generate_completion;
use stepwise_cli::{CLIResultPresenter, ProgressBarObserver, ResultPresenter, RunReport};
use stepwise_core::constants::exit_codes;
use stepwise_core::observers::{LoggingObserver, RecordingObserver};
use stepwise_core::sink::WriterSink;
use stepwise_core::{
    CancellationToken, InputSequence, ProcessError, ProcessOptions, SequentialProcessor,
};

use crate::config::{AppConfig, DEFAULT_INPUT};
use crate::errors::exit_code;
use crate::watchdog::Watchdog;

/// Minimum spacing between progress log lines under `--verbose`.
const PROGRESS_LOG_INTERVAL: Duration = Duration::from_millis(500);

/// Run the application and return the process exit code.
pub fn run(config: &AppConfig) -> Result<i32> {
    // Handle shell completion
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        generate_completion(&mut cmd, shell, &mut io::stdout());
        return Ok(exit_codes::SUCCESS);
    }

    let presenter = CLIResultPresenter::new(config.quiet, config.json);

    let text = read_input(config)?;
    let input = match InputSequence::parse(&text) {
        Ok(input) => input,
        Err(e) => return present_rejection(config, &e, &presenter),
    };

    let cancel = CancellationToken::new();
    ctrlc_handler(cancel.clone());

    run_sequence(config, &input, &cancel, &presenter)
}

/// Report input that could not be processed at all.
///
/// JSON mode still emits a report on stdout so consumers always get one.
fn present_rejection(
    config: &AppConfig,
    err: &ProcessError,
    presenter: &dyn ResultPresenter,
) -> Result<i32> {
    if config.json {
        presenter
            .present_report(&RunReport::rejected(err))
            .context("failed to render run report")?;
    } else {
        presenter.present_error(&err.to_string());
    }
    Ok(exit_code(err, false))
}

fn run_sequence(
    config: &AppConfig,
    input: &InputSequence,
    cancel: &CancellationToken,
    presenter: &dyn ResultPresenter,
) -> Result<i32> {
    let total = input.len();
    let recorder = Arc::new(RecordingObserver::new());
    let bar = Arc::new(if config.show_progress() {
        ProgressBarObserver::new(total)
    } else {
        ProgressBarObserver::hidden(total)
    });

    let mut processor = SequentialProcessor::new(ProcessOptions::with_delay_ms(config.delay_ms))
        .with_observer(recorder.clone())
        .with_observer(bar.clone());

    if config.verbose {
        let logger = LoggingObserver::new(PROGRESS_LOG_INTERVAL);
        processor = processor.with_observer(Arc::new(logger));
    }

    if config.print_values {
        processor = processor.with_sink(Arc::new(WriterSink::new(io::stdout())));
    }

    if config.cancel_after == Some(0) {
        debug!("Cancel-after limit is zero, cancelling before the first element");
        cancel.cancel();
    } else if let Some(limit) = config.cancel_after {
        let reported = AtomicUsize::new(0);
        let trigger = cancel.clone();
        processor = processor.on_progress(move |_| {
            if reported.fetch_add(1, Ordering::Relaxed) + 1 >= limit {
                debug!(limit, "Cancel-after limit reached");
                trigger.cancel();
            }
            Ok(())
        });
    }

    let mut watchdog = match config.timeout {
        Some(timeout) => Watchdog::arm(cancel.clone(), timeout),
        None => Watchdog::disabled(),
    };

    let start = Instant::now();
    let outcome = processor.run(input, cancel);
    let elapsed = start.elapsed();
    watchdog.disarm();

    if outcome.is_err() {
        bar.abandon();
    }

    let report = RunReport::from_outcome(&outcome, total, recorder.percents(), elapsed);
    presenter
        .present_report(&report)
        .context("failed to render run report")?;

    Ok(match &outcome {
        Ok(_) => exit_codes::SUCCESS,
        Err(e) => exit_code(e, watchdog.fired()),
    })
}

/// Read the JSON input from `--file`, `--input`, or the built-in default.
fn read_input(config: &AppConfig) -> Result<String> {
    match (&config.file, &config.input) {
        (Some(path), _) if path.as_os_str() == "-" => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read input from stdin")?;
            Ok(text)
        }
        (Some(path), _) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display())),
        (None, Some(inline)) => Ok(inline.clone()),
        (None, None) => Ok(DEFAULT_INPUT.to_string()),
    }
}

fn ctrlc_handler(cancel: CancellationToken) {
    ctrlc::set_handler(move || {
        cancel.cancel();
    })
    .expect("Error setting Ctrl+C handler");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use clap::Parser;
    use stepwise_core::RunState;

    #[derive(Default)]
    struct CapturingPresenter {
        reports: Mutex<Vec<RunReport>>,
        errors: Mutex<Vec<String>>,
    }

    impl ResultPresenter for CapturingPresenter {
        fn present_report(&self, report: &RunReport) -> Result<(), serde_json::Error> {
            self.reports.lock().unwrap().push(report.clone());
            Ok(())
        }

        fn present_error(&self, error: &str) {
            self.errors.lock().unwrap().push(error.to_string());
        }
    }

    fn config(args: &[&str]) -> AppConfig {
        AppConfig::try_parse_from(std::iter::once("stepwise").chain(args.iter().copied())).unwrap()
    }

    fn run_captured(args: &[&str], json: &str) -> (i32, RunReport) {
        let config = config(args);
        let presenter = CapturingPresenter::default();
        let input = InputSequence::parse(json).unwrap();
        let code = run_sequence(&config, &input, &CancellationToken::new(), &presenter).unwrap();
        let report = presenter.reports.lock().unwrap().pop().unwrap();
        (code, report)
    }

    #[test]
    fn completes_sequence() {
        let (code, report) = run_captured(&["--delay-ms", "0", "-q"], "[1, 2, 3]");
        assert_eq!(code, exit_codes::SUCCESS);
        assert_eq!(report.status, RunState::Completed);
        assert_eq!(report.processed, 3);
    }

    #[test]
    fn cancel_after_limit() {
        let (code, report) =
            run_captured(&["--delay-ms", "0", "-q", "--cancel-after", "2"], "[1, 2, 3, 4]");
        assert_eq!(code, exit_codes::ERROR_CANCELED);
        assert_eq!(report.status, RunState::Aborted);
        assert_eq!(report.progress, vec![25.0, 50.0]);
    }

    #[test]
    fn cancel_after_zero_processes_nothing() {
        let (code, report) =
            run_captured(&["--delay-ms", "0", "-q", "--cancel-after", "0"], "[1, 2, 3, 4]");
        assert_eq!(code, exit_codes::ERROR_CANCELED);
        assert_eq!(report.status, RunState::Aborted);
        assert_eq!(report.processed, 0);
        assert!(report.progress.is_empty());
    }

    #[test]
    fn verbose_run_completes() {
        let (code, report) = run_captured(&["--delay-ms", "0", "-q", "-v"], "[1, 2]");
        assert_eq!(code, exit_codes::SUCCESS);
        assert_eq!(report.progress, vec![50.0, 100.0]);
    }

    #[test]
    fn rejection_is_reported_as_json() {
        let presenter = CapturingPresenter::default();
        let err = InputSequence::parse("{}").unwrap_err();
        let code = present_rejection(&config(&["--json"]), &err, &presenter).unwrap();

        assert_eq!(code, exit_codes::ERROR_INVALID_INPUT);
        assert!(presenter.errors.lock().unwrap().is_empty());
        let report = presenter.reports.lock().unwrap().pop().unwrap();
        assert_eq!(report.status, RunState::Failed);
        assert_eq!(report.processed, 0);
        assert!(report.error.unwrap().contains("input must be a sequence"));
    }

    #[test]
    fn rejection_is_reported_as_error_line() {
        let presenter = CapturingPresenter::default();
        let err = InputSequence::parse("[1,").unwrap_err();
        let code = present_rejection(&config(&[]), &err, &presenter).unwrap();

        assert_eq!(code, exit_codes::ERROR_INVALID_INPUT);
        assert!(presenter.reports.lock().unwrap().is_empty());
        assert!(presenter.errors.lock().unwrap()[0].contains("malformed JSON"));
    }

    #[test]
    fn timeout_maps_to_timeout_code() {
        let (code, report) = run_captured(
            &["--delay-ms", "100", "-q", "--timeout", "150ms"],
            "[1, 2, 3, 4, 5]",
        );
        assert_eq!(code, exit_codes::ERROR_TIMEOUT);
        assert_eq!(report.status, RunState::Aborted);
        assert!(report.processed < 5);
    }

    #[test]
    fn invalid_element_maps_to_input_code() {
        let (code, report) = run_captured(&["--delay-ms", "0", "-q"], r#"[1, "x", 3]"#);
        assert_eq!(code, exit_codes::ERROR_INVALID_INPUT);
        assert_eq!(report.failed_index, Some(1));
    }

    #[test]
    fn read_input_default_and_inline() {
        assert_eq!(read_input(&config(&[])).unwrap(), DEFAULT_INPUT);
        assert_eq!(read_input(&config(&["--input", "[9]"])).unwrap(), "[9]");
    }

    #[test]
    fn read_input_missing_file() {
        let err = read_input(&config(&["--file", "/nonexistent/stepwise.json"])).unwrap_err();
        assert!(err.to_string().contains("failed to read input file"));
    }
}
