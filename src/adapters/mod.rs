//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits:
//! - Yahoo: daily chart API client (QuoteProvider)
//! - Storage: in-memory and JSON file price stores (PriceStore)
//! - Export: JSON and CSV writers for backtest results
//! - CLI: Command-line interface definitions

pub mod cli;
pub mod export;
pub mod storage;
pub mod yahoo;

pub use cli::CliApp;
pub use export::{export_json, export_trades_csv, ExportError};
pub use storage::{InMemoryPriceStore, JsonFilePriceStore};
pub use yahoo::{YahooChartClient, YahooConfig};
