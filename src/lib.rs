//! Spreadlab - Pair Trading Backtester Library
//!
//! Backtests mean reversion between two stocks on daily closes, trading either
//! the price ratio or a rolling hedge-adjusted spread.
//!
//! # Modules
//!
//! - `domain`: Core data types (Bar, AlignedPair, SignalPoint, ClosedTrade, BacktestSummary)
//! - `strategy`: Pure backtest core (rolling z-score, hedge ratio, signal builder, simulator)
//! - `ports`: Trait abstractions (QuoteProvider, PriceStore)
//! - `adapters`: External implementations (Yahoo chart API, JSON file store, export, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Ingestion and backtest use cases

pub mod domain;
pub mod ports;
pub mod strategy;
pub mod adapters;
pub mod config;
pub mod application;

pub use domain::{Bar, BacktestResult, BacktestSummary, ClosedTrade, SignalMode, SignalPoint};
pub use strategy::{run_ratio_backtest, run_spread_backtest, BacktestParams};
