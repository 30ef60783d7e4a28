//! Aligned Pair
//!
//! Two bar sequences brought onto a common index before signal building.
//!
//! Positional alignment filters both series to the date range and truncates to
//! the shorter length. Index `i` is then the i-th bar of each series, which is
//! only the same calendar day when neither symbol has gaps. `ByDate` joins on
//! matching dates instead and drops days missing from either side.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::bar::{filter_by_date, Bar};

/// How two date-filtered series are matched index by index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentMode {
    /// Truncate both to `min(len_a, len_b)` and pair by position
    #[default]
    Positional,
    /// Inner join on calendar date
    ByDate,
}

impl std::str::FromStr for AlignmentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positional" => Ok(AlignmentMode::Positional),
            "by_date" | "by-date" | "date" => Ok(AlignmentMode::ByDate),
            other => Err(format!("unknown alignment mode: {}", other)),
        }
    }
}

/// Pair of bar sequences of equal length
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedPair {
    a: Vec<Bar>,
    b: Vec<Bar>,
}

impl AlignedPair {
    /// Filter both series to `[from, to]` and align them with `mode`
    pub fn align(
        prices_a: &[Bar],
        prices_b: &[Bar],
        from: NaiveDate,
        to: NaiveDate,
        mode: AlignmentMode,
    ) -> Self {
        let a = filter_by_date(prices_a, from, to);
        let b = filter_by_date(prices_b, from, to);

        match mode {
            AlignmentMode::Positional => Self::positional(a, b),
            AlignmentMode::ByDate => Self::by_date(a, b),
        }
    }

    fn positional(mut a: Vec<Bar>, mut b: Vec<Bar>) -> Self {
        let min_len = a.len().min(b.len());
        a.truncate(min_len);
        b.truncate(min_len);
        Self { a, b }
    }

    fn by_date(a: Vec<Bar>, b: Vec<Bar>) -> Self {
        let b_by_date: HashMap<NaiveDate, Bar> = b.into_iter().map(|bar| (bar.date, bar)).collect();

        let (a, b): (Vec<Bar>, Vec<Bar>) = a
            .into_iter()
            .filter_map(|bar_a| b_by_date.get(&bar_a.date).map(|bar_b| (bar_a, *bar_b)))
            .unzip();

        Self { a, b }
    }

    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    pub fn a(&self) -> &[Bar] {
        &self.a
    }

    pub fn b(&self) -> &[Bar] {
        &self.b
    }

    /// Close prices of leg A
    pub fn closes_a(&self) -> Vec<f64> {
        self.a.iter().map(|bar| bar.close).collect()
    }

    /// Close prices of leg B
    pub fn closes_b(&self) -> Vec<f64> {
        self.b.iter().map(|bar| bar.close).collect()
    }
}
