use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which relationship between the two legs is traded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalMode {
    /// `close_a / close_b`, profit in percent of the entry ratio
    Ratio,
    /// `close_a - beta * close_b`, profit in spread units
    Spread,
}

impl fmt::Display for SignalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalMode::Ratio => write!(f, "ratio"),
            SignalMode::Spread => write!(f, "spread"),
        }
    }
}

impl std::str::FromStr for SignalMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ratio" => Ok(SignalMode::Ratio),
            "spread" => Ok(SignalMode::Spread),
            other => Err(format!("unknown signal mode: {}", other)),
        }
    }
}

/// One row of the signal series, produced per aligned index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignalPoint {
    pub date: NaiveDate,
    pub stock_a_close: f64,
    pub stock_b_close: f64,
    /// Ratio or spread, depending on the mode
    pub signal_value: f64,
    pub z_score: f64,
    /// Rolling hedge ratio, spread mode only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hedge_ratio: Option<f64>,
}

impl SignalPoint {
    /// Hedge ratio, or 1.0 when the point carries none
    pub fn hedge_ratio_or_neutral(&self) -> f64 {
        self.hedge_ratio.unwrap_or(1.0)
    }
}
