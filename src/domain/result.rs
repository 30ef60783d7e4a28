use serde::{Deserialize, Serialize};

use super::signal::{SignalMode, SignalPoint};
use super::summary::BacktestSummary;
use super::trade::ClosedTrade;

/// Output of one backtest run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    pub mode: SignalMode,
    pub signal_series: Vec<SignalPoint>,
    pub trades: Vec<ClosedTrade>,
    pub summary: BacktestSummary,
}

impl BacktestResult {
    /// Assemble a result, deriving the summary from `trades`
    pub fn new(mode: SignalMode, signal_series: Vec<SignalPoint>, trades: Vec<ClosedTrade>) -> Self {
        let summary = BacktestSummary::from_trades(&trades);
        Self {
            mode,
            signal_series,
            trades,
            summary,
        }
    }

    /// Result for inputs with no overlapping bars
    pub fn empty(mode: SignalMode) -> Self {
        Self::new(mode, Vec::new(), Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.signal_series.is_empty()
    }
}
