//! stepwise: process a numeric sequence step by step.

use std::process::ExitCode;

use anyhow::Result;
use stepwise_lib::{app, config};

fn main() -> Result<ExitCode> {
    let config = config::AppConfig::parse();

    // Initialize tracing
    let default_level = if config.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .init();

    let code = app::run(&config)?;
    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
