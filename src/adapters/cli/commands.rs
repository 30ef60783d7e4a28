//! CLI Command Definitions
//!
//! Argument structures for all spreadlab commands.
//! Uses clap derive macros for argument parsing.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::{AlignmentMode, SignalMode};

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/spreadlab.toml";

/// Spreadlab - Pair Trading Backtester
#[derive(Parser, Debug)]
#[command(
    name = "spreadlab",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Pair trading backtester for daily stock prices",
    long_about = "Spreadlab downloads and stores daily price history, then backtests \
                  mean reversion on the price ratio or hedge-adjusted spread of two \
                  symbols using rolling z-score entry and exit thresholds."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (defaults are used when it does not exist)
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download daily history for symbols and store it
    Fetch(FetchCmd),

    /// Show stored history for symbols
    Load(LoadCmd),

    /// List stored symbols
    List,

    /// Run a pair trading backtest on stored data
    Backtest(BacktestCmd),
}

/// Download and store daily history
#[derive(Parser, Debug)]
pub struct FetchCmd {
    /// Comma-separated symbols (e.g. "KO,PEP")
    #[arg(value_name = "SYMBOLS")]
    pub symbols: String,
}

/// Show stored history
#[derive(Parser, Debug)]
pub struct LoadCmd {
    /// Comma-separated symbols (e.g. "KO,PEP")
    #[arg(value_name = "SYMBOLS")]
    pub symbols: String,

    /// Number of most recent bars to print per symbol
    #[arg(short, long, value_name = "N", default_value = "5")]
    pub tail: usize,
}

/// Run a backtest
#[derive(Parser, Debug)]
pub struct BacktestCmd {
    /// First symbol of the pair
    #[arg(short = 'a', long = "a", value_name = "SYMBOL")]
    pub stock_a: String,

    /// Second symbol of the pair
    #[arg(short = 'b', long = "b", value_name = "SYMBOL")]
    pub stock_b: String,

    /// First date of the backtest (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: NaiveDate,

    /// Last date of the backtest (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: NaiveDate,

    /// Signal to trade: ratio or spread
    #[arg(short, long, value_name = "MODE", default_value = "ratio")]
    pub mode: SignalMode,

    /// Entry z-score threshold (overrides config)
    #[arg(long, value_name = "Z")]
    pub entry_z: Option<f64>,

    /// Exit z-score threshold (overrides config)
    #[arg(long, value_name = "Z")]
    pub exit_z: Option<f64>,

    /// Rolling window / lookback in bars (overrides config)
    #[arg(short, long, value_name = "BARS")]
    pub window: Option<usize>,

    /// Series alignment: positional or by_date (overrides config)
    #[arg(long, value_name = "MODE")]
    pub align: Option<AlignmentMode>,

    /// Print the signal series as well as the trades
    #[arg(long)]
    pub show_signals: bool,

    /// Write the full result as JSON
    #[arg(long, value_name = "FILE")]
    pub export_json: Option<PathBuf>,

    /// Write the trade list as CSV
    #[arg(long, value_name = "FILE")]
    pub export_csv: Option<PathBuf>,
}
