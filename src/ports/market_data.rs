//! Quote Provider Port
//!
//! Remote source of daily price history. Providers return the raw parallel
//! arrays they receive; conversion to bars happens once, here, at the boundary.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Bar;

/// Quote provider error type
#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Malformed payload for {symbol}: {reason}")]
    MalformedPayload { symbol: String, reason: String },

    #[error("No data returned for {0}")]
    NoData(String),
}

/// Raw daily quote arrays as returned by a provider.
///
/// Index `i` of each OHLC array belongs to `timestamps[i]` (unix seconds).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawQuoteSeries {
    pub symbol: String,
    pub timestamps: Vec<i64>,
    pub open: Vec<Option<f64>>,
    pub high: Vec<Option<f64>>,
    pub low: Vec<Option<f64>>,
    pub close: Vec<Option<f64>>,
}

impl RawQuoteSeries {
    /// Convert to date-ordered bars.
    ///
    /// Missing open/high/low become 0.0, rows without a close are dropped,
    /// and duplicate dates keep the last row.
    pub fn into_bars(self) -> Result<Vec<Bar>, QuoteError> {
        let len = self.timestamps.len();
        let lengths = [self.open.len(), self.high.len(), self.low.len(), self.close.len()];
        if lengths.iter().any(|&l| l != len) {
            return Err(QuoteError::MalformedPayload {
                symbol: self.symbol,
                reason: format!(
                    "array length mismatch: {} timestamps vs open/high/low/close {:?}",
                    len, lengths
                ),
            });
        }

        let mut bars = Vec::with_capacity(len);
        for (i, &timestamp) in self.timestamps.iter().enumerate() {
            let Some(close) = self.close[i] else {
                continue;
            };
            let bar = Bar::from_timestamp(
                timestamp,
                self.open[i].unwrap_or(0.0),
                self.high[i].unwrap_or(0.0),
                self.low[i].unwrap_or(0.0),
                close,
            )
            .ok_or_else(|| QuoteError::MalformedPayload {
                symbol: self.symbol.clone(),
                reason: format!("timestamp out of range: {}", timestamp),
            })?;
            bars.push(bar);
        }

        bars.sort_by_key(|bar| bar.date);
        // Keep the last row for each date
        bars.reverse();
        bars.dedup_by_key(|bar| bar.date);
        bars.reverse();

        Ok(bars)
    }
}

/// Remote daily price history source
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Fetch the full daily history the provider offers for `symbol`
    async fn fetch_daily(&self, symbol: &str) -> Result<RawQuoteSeries, QuoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const DAY: i64 = 86_400;
    // 2024-01-02T14:30:00Z
    const BASE: i64 = 1_704_205_800;

    fn raw(closes: Vec<Option<f64>>) -> RawQuoteSeries {
        let n = closes.len();
        RawQuoteSeries {
            symbol: "AAPL".to_string(),
            timestamps: (0..n as i64).map(|i| BASE + i * DAY).collect(),
            open: vec![Some(1.0); n],
            high: vec![Some(2.0); n],
            low: vec![None; n],
            close: closes,
        }
    }

    #[test]
    fn test_into_bars_converts_dates_and_missing_fields() {
        let bars = raw(vec![Some(10.0), Some(11.0)]).into_bars().unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[1].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
        assert_eq!(bars[0].low, 0.0);
        assert_eq!(bars[1].close, 11.0);
    }

    #[test]
    fn test_rows_without_close_are_dropped() {
        let bars = raw(vec![Some(10.0), None, Some(12.0)]).into_bars().unwrap();
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![10.0, 12.0]);
    }

    #[test]
    fn test_length_mismatch_is_malformed() {
        let mut series = raw(vec![Some(10.0), Some(11.0)]);
        series.high.pop();
        assert!(matches!(
            series.into_bars(),
            Err(QuoteError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn test_unsorted_and_duplicate_dates() {
        let mut series = raw(vec![Some(10.0), Some(11.0), Some(12.0)]);
        series.timestamps = vec![BASE + 2 * DAY, BASE, BASE + 2 * DAY + 60];

        let bars = series.into_bars().unwrap();
        assert_eq!(bars.len(), 2);
        assert!(bars[0].date < bars[1].date);
        assert_eq!(bars[0].close, 11.0);
        // Later row for the same day wins
        assert_eq!(bars[1].close, 12.0);
    }

    #[test]
    fn test_empty_series_gives_no_bars() {
        assert!(RawQuoteSeries::default().into_bars().unwrap().is_empty());
    }
}
