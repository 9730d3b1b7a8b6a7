//! stepwise library: application logic for the sequential processing CLI.

pub mod app;
pub mod config;
pub mod errors;
pub mod watchdog;
