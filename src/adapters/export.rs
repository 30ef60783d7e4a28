//! Result Export
//!
//! Writes a backtest result as pretty JSON, or its trade list as CSV.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::domain::{BacktestResult, ClosedTrade};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write export file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// CSV column names, in `TradeRow` field order
const TRADE_CSV_HEADER: [&str; 10] = [
    "entry_date",
    "exit_date",
    "trade_type",
    "holding_period_days",
    "profit",
    "max_drawdown",
    "exit_reason",
    "entry_hedge_ratio",
    "exit_hedge_ratio",
    "hedge_ratio_change_pct",
];

/// Flat CSV row for one closed trade; hedge columns are blank in ratio mode
#[derive(Debug, Serialize)]
struct TradeRow {
    entry_date: String,
    exit_date: String,
    trade_type: String,
    holding_period_days: i64,
    profit: f64,
    max_drawdown: f64,
    exit_reason: String,
    entry_hedge_ratio: Option<f64>,
    exit_hedge_ratio: Option<f64>,
    hedge_ratio_change_pct: Option<f64>,
}

impl From<&ClosedTrade> for TradeRow {
    fn from(trade: &ClosedTrade) -> Self {
        Self {
            entry_date: trade.entry_date.to_string(),
            exit_date: trade.exit_date.to_string(),
            trade_type: trade.trade_type.to_string(),
            holding_period_days: trade.holding_period_days,
            profit: trade.profit,
            max_drawdown: trade.max_drawdown,
            exit_reason: trade.exit_reason.to_string(),
            entry_hedge_ratio: trade.hedge.map(|h| h.entry_hedge_ratio),
            exit_hedge_ratio: trade.hedge.map(|h| h.exit_hedge_ratio),
            hedge_ratio_change_pct: trade.hedge.map(|h| h.hedge_ratio_change_pct),
        }
    }
}

/// Write the full result (signal series, trades, summary) as pretty JSON
pub fn write_json<W: Write>(writer: W, result: &BacktestResult) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, result)?;
    Ok(())
}

/// Write a header row and one CSV row per trade.
///
/// The header is written even when there are no trades.
pub fn write_trades_csv<W: Write>(writer: W, trades: &[ClosedTrade]) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(TRADE_CSV_HEADER)?;
    for trade in trades {
        csv_writer.serialize(TradeRow::from(trade))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Export the result as JSON to `path`
pub fn export_json(path: &Path, result: &BacktestResult) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_json(file, result)?;
    tracing::info!("Wrote backtest result to {}", path.display());
    Ok(())
}

/// Export the trade list as CSV to `path`
pub fn export_trades_csv(path: &Path, trades: &[ClosedTrade]) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_trades_csv(file, trades)?;
    tracing::info!("Wrote {} trades to {}", trades.len(), path.display());
    Ok(())
}
