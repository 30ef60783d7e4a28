use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One daily OHLC bar for a single symbol
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Bar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
        }
    }

    /// Bar carrying only a close, with open/high/low set to the same value
    pub fn from_close(date: NaiveDate, close: f64) -> Self {
        Self::new(date, close, close, close, close)
    }

    /// Build a bar from a unix timestamp in seconds, using its UTC calendar date
    pub fn from_timestamp(timestamp: i64, open: f64, high: f64, low: f64, close: f64) -> Option<Self> {
        let date = DateTime::from_timestamp(timestamp, 0)?.date_naive();
        Some(Self::new(date, open, high, low, close))
    }

    /// True when the bar's date lies in the inclusive `[from, to]` range
    pub fn in_range(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.date >= from && self.date <= to
    }
}

impl fmt::Display for Bar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} O:{:.2} H:{:.2} L:{:.2} C:{:.2}",
            self.date, self.open, self.high, self.low, self.close
        )
    }
}

/// Keep only bars inside the inclusive date range, preserving order
pub fn filter_by_date(bars: &[Bar], from: NaiveDate, to: NaiveDate) -> Vec<Bar> {
    bars.iter().filter(|b| b.in_range(from, to)).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_from_timestamp_uses_utc_date() {
        // 2024-01-02T23:30:00Z
        let bar = Bar::from_timestamp(1_704_238_200, 1.0, 2.0, 0.5, 1.5).unwrap();
        assert_eq!(bar.date, day(2));
        assert_eq!(bar.close, 1.5);
    }

    #[test]
    fn test_in_range_is_inclusive() {
        let bar = Bar::from_close(day(5), 10.0);
        assert!(bar.in_range(day(5), day(5)));
        assert!(bar.in_range(day(1), day(10)));
        assert!(!bar.in_range(day(6), day(10)));
    }

    #[test]
    fn test_filter_by_date_preserves_order() {
        let bars: Vec<Bar> = (1..=10).map(|d| Bar::from_close(day(d), d as f64)).collect();
        let filtered = filter_by_date(&bars, day(3), day(6));
        let closes: Vec<f64> = filtered.iter().map(|b| b.close).collect();
        assert_eq!(closes, vec![3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_serde_uses_iso_dates() {
        let bar = Bar::new(day(3), 1.0, 2.0, 0.5, 1.5);
        let json = serde_json::to_string(&bar).unwrap();
        assert!(json.contains("\"2024-01-03\""));
        let back: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bar);
    }

    #[test]
    fn test_display_bar() {
        let bar = Bar::new(day(3), 1.0, 2.0, 0.5, 1.5);
        assert_eq!(format!("{}", bar), "2024-01-03 O:1.00 H:2.00 L:0.50 C:1.50");
    }
}
