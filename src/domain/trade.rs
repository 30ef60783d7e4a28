use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a pair position
///
/// `Long` buys the signal (long A, short B), `Short` sells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeType {
    Long,
    Short,
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeType::Long => write!(f, "LONG"),
            TradeType::Short => write!(f, "SHORT"),
        }
    }
}

/// Why a position was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// Z-score crossed back through the exit threshold
    MeanReversion,
    /// Holding period reached the time stop
    TimeStop,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::MeanReversion => write!(f, "mean reversion"),
            ExitReason::TimeStop => write!(f, "time stop"),
        }
    }
}

/// Position that has been entered but not yet closed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenTrade {
    pub entry_date: NaiveDate,
    pub trade_type: TradeType,
    pub entry_index: usize,
    pub entry_signal: f64,
    pub entry_hedge_ratio: Option<f64>,
}

impl OpenTrade {
    /// Whole calendar days between entry and `date`
    pub fn holding_days(&self, date: NaiveDate) -> i64 {
        (date - self.entry_date).num_days()
    }

    /// Unrealized P&L in signal units at `signal`
    pub fn unrealized(&self, signal: f64) -> f64 {
        match self.trade_type {
            TradeType::Long => signal - self.entry_signal,
            TradeType::Short => self.entry_signal - signal,
        }
    }
}

/// Hedge ratio drift over a spread trade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HedgeDrift {
    pub entry_hedge_ratio: f64,
    pub exit_hedge_ratio: f64,
    pub hedge_ratio_change_pct: f64,
}

impl HedgeDrift {
    pub fn new(entry_hedge_ratio: f64, exit_hedge_ratio: f64) -> Self {
        let hedge_ratio_change_pct = if entry_hedge_ratio == 0.0 {
            0.0
        } else {
            (exit_hedge_ratio - entry_hedge_ratio) / entry_hedge_ratio * 100.0
        };

        Self {
            entry_hedge_ratio,
            exit_hedge_ratio,
            hedge_ratio_change_pct,
        }
    }
}

/// Realized trade, immutable once recorded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub trade_type: TradeType,
    pub holding_period_days: i64,
    /// Percent of entry ratio in ratio mode, spread units in spread mode
    pub profit: f64,
    /// Worst adverse excursion, same units as `profit`, never negative
    pub max_drawdown: f64,
    pub exit_reason: ExitReason,
    #[serde(flatten)]
    pub hedge: Option<HedgeDrift>,
}

impl ClosedTrade {
    pub fn is_profitable(&self) -> bool {
        self.profit > 0.0
    }
}

impl fmt::Display for ClosedTrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {} ({}d, {}): profit {:.2}, max drawdown {:.2}",
            self.trade_type,
            self.entry_date,
            self.exit_date,
            self.holding_period_days,
            self.exit_reason,
            self.profit,
            self.max_drawdown
        )
    }
}
