//! Signal Builder
//!
//! Turns an aligned pair into a signal series:
//! - Ratio mode: `close_a / close_b`, z-scored over the rolling window
//! - Spread mode: `close_a - beta * close_b` with a per-bar rolling OLS beta,
//!   z-scored over the same lookback the beta was estimated on
//!
//! Non-finite z-scores (for example from a zero close on leg B) are stored as 0.

use crate::domain::{AlignedPair, SignalMode, SignalPoint};

use super::hedge_ratio::hedge_ratio;
use super::zscore::rolling_z_score;

/// Build the signal series for `pair` in the given mode
pub fn build_signal_series(pair: &AlignedPair, mode: SignalMode, window: usize) -> Vec<SignalPoint> {
    match mode {
        SignalMode::Ratio => ratio_series(pair, window),
        SignalMode::Spread => spread_series(pair, window),
    }
}

/// Price ratio series with rolling z-scores
pub fn ratio_series(pair: &AlignedPair, window: usize) -> Vec<SignalPoint> {
    let ratios: Vec<f64> = pair
        .a()
        .iter()
        .zip(pair.b())
        .map(|(a, b)| a.close / b.close)
        .collect();

    assemble(pair, &ratios, None, window)
}

/// Hedge-adjusted spread series with rolling z-scores.
///
/// `lookback` drives both the hedge ratio regression and the z-score window.
pub fn spread_series(pair: &AlignedPair, lookback: usize) -> Vec<SignalPoint> {
    let closes_a = pair.closes_a();
    let closes_b = pair.closes_b();

    let hedge_ratios: Vec<f64> = (0..pair.len())
        .map(|i| hedge_ratio(&closes_a, &closes_b, i, lookback))
        .collect();

    let spreads: Vec<f64> = closes_a
        .iter()
        .zip(&closes_b)
        .zip(&hedge_ratios)
        .map(|((a, b), beta)| a - beta * b)
        .collect();

    assemble(pair, &spreads, Some(&hedge_ratios), lookback)
}

fn assemble(
    pair: &AlignedPair,
    signal: &[f64],
    hedge_ratios: Option<&[f64]>,
    window: usize,
) -> Vec<SignalPoint> {
    let z_scores = rolling_z_score(signal, window);

    pair.a()
        .iter()
        .zip(pair.b())
        .enumerate()
        .map(|(i, (a, b))| {
            let z_score = z_scores.get(i).copied().filter(|z| z.is_finite()).unwrap_or(0.0);

            SignalPoint {
                date: a.date,
                stock_a_close: a.close,
                stock_b_close: b.close,
                signal_value: signal[i],
                z_score,
                hedge_ratio: hedge_ratios.map(|h| h[i]),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AlignmentMode, Bar};
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};

    fn bars(closes: &[f64]) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::from_close(start + Duration::days(i as i64), c))
            .collect()
    }

    fn pair(a: &[f64], b: &[f64]) -> AlignedPair {
        AlignedPair::align(
            &bars(a),
            &bars(b),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            AlignmentMode::Positional,
        )
    }

    #[test]
    fn test_constant_ratio_has_zero_zscores() {
        let pair = pair(&[100.0, 102.0, 104.0, 106.0, 108.0], &[50.0, 51.0, 52.0, 53.0, 54.0]);
        let series = ratio_series(&pair, 3);

        assert_eq!(series.len(), 5);
        for point in &series {
            assert_relative_eq!(point.signal_value, 2.0);
            assert_eq!(point.z_score, 0.0);
            assert_eq!(point.hedge_ratio, None);
        }
    }

    #[test]
    fn test_ratio_points_carry_closes_and_dates() {
        let pair = pair(&[10.0, 12.0, 9.0], &[5.0, 4.0, 3.0]);
        let series = ratio_series(&pair, 50);

        assert_eq!(series[1].stock_a_close, 12.0);
        assert_eq!(series[1].stock_b_close, 4.0);
        assert_relative_eq!(series[1].signal_value, 3.0);
        assert_eq!(series[2].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }

    #[test]
    fn test_spread_of_exact_hedge_is_flat() {
        // A = 2B exactly, so from index 1 on beta = 2 and the spread is 0
        let b: Vec<f64> = (0..30).map(|i| 50.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let a: Vec<f64> = b.iter().map(|x| 2.0 * x).collect();
        let series = spread_series(&pair(&a, &b), 10);

        // Index 0 has one sample: neutral ratio
        assert_eq!(series[0].hedge_ratio, Some(1.0));
        for point in &series[1..] {
            assert_relative_eq!(point.hedge_ratio.unwrap(), 2.0, epsilon = 1e-6);
            assert!(point.signal_value.abs() < 1e-6);
        }
    }

    #[test]
    fn test_spread_uses_hedge_ratio_per_bar() {
        let a = [10.0, 12.0, 15.0, 13.0];
        let b = [5.0, 6.0, 7.0, 6.5];
        let series = spread_series(&pair(&a, &b), 3);

        for (i, point) in series.iter().enumerate() {
            let beta = hedge_ratio(&a, &b, i, 3);
            assert_relative_eq!(point.hedge_ratio.unwrap(), beta);
            assert_relative_eq!(point.signal_value, a[i] - beta * b[i], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zero_close_does_not_poison_zscores() {
        let pair = pair(&[10.0, 11.0, 12.0, 13.0], &[5.0, 0.0, 6.0, 6.5]);
        let series = ratio_series(&pair, 3);

        assert!(series[1].signal_value.is_infinite());
        for point in &series {
            assert!(point.z_score.is_finite());
        }
    }

    #[test]
    fn test_empty_pair_builds_empty_series() {
        let pair = AlignedPair::default();
        assert!(build_signal_series(&pair, SignalMode::Ratio, 50).is_empty());
        assert!(build_signal_series(&pair, SignalMode::Spread, 50).is_empty());
    }
}
