//! Backtest Parameters
//!
//! Per-run configuration for the pair backtests.
//! Defaults mirror the classic 2.5 / 1.5 sigma entry/exit bands on a 50-bar window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::AlignmentMode;

/// Rolling window for both z-scores and the spread hedge ratio
pub const DEFAULT_WINDOW: usize = 50;
/// Positions are force-closed once held this many calendar days
pub const DEFAULT_MAX_HOLDING_DAYS: i64 = 15;
pub const DEFAULT_ENTRY_Z: f64 = 2.5;
pub const DEFAULT_EXIT_Z: f64 = 1.5;
/// Recommended spread lookback, roughly two weeks to one trading year
pub const RECOMMENDED_LOOKBACK: (usize, usize) = (10, 252);

/// Parameters for a single backtest run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestParams {
    /// First date included (inclusive)
    pub from_date: NaiveDate,
    /// Last date included (inclusive)
    pub to_date: NaiveDate,
    /// |z| at which a position is opened
    pub entry_z: f64,
    /// |z| at which a position is closed on reversion
    pub exit_z: f64,
    /// Rolling window. In spread mode this is also the hedge ratio lookback.
    pub window: usize,
    /// Time stop in calendar days
    pub max_holding_days: i64,
    /// How the two series are matched
    pub alignment: AlignmentMode,
}

impl BacktestParams {
    /// Parameters for `[from_date, to_date]` with default thresholds
    pub fn new(from_date: NaiveDate, to_date: NaiveDate) -> Self {
        Self {
            from_date,
            to_date,
            entry_z: DEFAULT_ENTRY_Z,
            exit_z: DEFAULT_EXIT_Z,
            window: DEFAULT_WINDOW,
            max_holding_days: DEFAULT_MAX_HOLDING_DAYS,
            alignment: AlignmentMode::default(),
        }
    }

    /// Set entry and exit thresholds
    pub fn with_thresholds(mut self, entry_z: f64, exit_z: f64) -> Self {
        self.entry_z = entry_z;
        self.exit_z = exit_z;
        self
    }

    /// Set the rolling window / lookback period
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn with_max_holding_days(mut self, days: i64) -> Self {
        self.max_holding_days = days;
        self
    }

    pub fn with_alignment(mut self, alignment: AlignmentMode) -> Self {
        self.alignment = alignment;
        self
    }

    /// Validate parameters before a run.
    ///
    /// The engine itself accepts anything; this is for user-facing entry points.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.from_date > self.to_date {
            return Err(ParamsError::InvalidDateRange(self.from_date, self.to_date));
        }
        if self.window == 0 {
            return Err(ParamsError::InvalidWindow(self.window));
        }
        if !self.entry_z.is_finite() || self.entry_z <= 0.0 {
            return Err(ParamsError::InvalidEntryZ(self.entry_z));
        }
        if !self.exit_z.is_finite() || self.exit_z < 0.0 {
            return Err(ParamsError::InvalidExitZ(self.exit_z));
        }
        if self.max_holding_days <= 0 {
            return Err(ParamsError::InvalidHoldingPeriod(self.max_holding_days));
        }

        if self.exit_z >= self.entry_z {
            tracing::warn!(
                "exit_z {} >= entry_z {}: positions may close on the bar after entry",
                self.exit_z,
                self.entry_z
            );
        }

        Ok(())
    }

    /// True when the window lies in the recommended spread lookback range
    pub fn lookback_in_recommended_range(&self) -> bool {
        let (min, max) = RECOMMENDED_LOOKBACK;
        (min..=max).contains(&self.window)
    }
}

/// Parameter validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamsError {
    #[error("Invalid date range: {0} is after {1}")]
    InvalidDateRange(NaiveDate, NaiveDate),
    #[error("Invalid window: {0} (minimum 1)")]
    InvalidWindow(usize),
    #[error("Invalid entry z-score: {0} (must be > 0)")]
    InvalidEntryZ(f64),
    #[error("Invalid exit z-score: {0} (must be >= 0)")]
    InvalidExitZ(f64),
    #[error("Invalid max holding period: {0} days (must be > 0)")]
    InvalidHoldingPeriod(i64),
}
