//! CLI Adapter
//!
//! Command-line interface for the spreadlab backtester.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{BacktestCmd, CliApp, Command, FetchCmd, LoadCmd, DEFAULT_CONFIG_PATH};
