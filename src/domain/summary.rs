use serde::{Deserialize, Serialize};
use std::fmt;

use super::trade::ClosedTrade;

/// Aggregate statistics over a trade list
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BacktestSummary {
    pub total_trades: usize,
    pub profitable_trades: usize,
    pub win_rate_pct: f64,
    pub total_profit: f64,
    pub avg_profit_per_trade: f64,
}

impl BacktestSummary {
    /// Reduce trades to summary figures. An empty list yields all zeros.
    pub fn from_trades(trades: &[ClosedTrade]) -> Self {
        let total_trades = trades.len();
        if total_trades == 0 {
            return Self::default();
        }

        let profitable_trades = trades.iter().filter(|t| t.is_profitable()).count();
        let total_profit: f64 = trades.iter().map(|t| t.profit).sum();

        Self {
            total_trades,
            profitable_trades,
            win_rate_pct: profitable_trades as f64 / total_trades as f64 * 100.0,
            total_profit,
            avg_profit_per_trade: total_profit / total_trades as f64,
        }
    }

    /// Trades that lost money or broke even
    pub fn losing_trades(&self) -> usize {
        self.total_trades - self.profitable_trades
    }
}

impl fmt::Display for BacktestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} trades, {} profitable, {} losing, win rate {:.1}%, avg profit {:.2}",
            self.total_trades,
            self.profitable_trades,
            self.losing_trades(),
            self.win_rate_pct,
            self.avg_profit_per_trade
        )
    }
}
