//! Backtest Engine
//!
//! Entry points that run the full pipeline on two bar series:
//! align -> build signal -> simulate -> summarize.
//!
//! Both runs are pure functions of their inputs and always return a result;
//! inputs with no overlapping bars in range give an empty one.

use crate::domain::{AlignedPair, Bar, BacktestResult, SignalMode};

use super::params::BacktestParams;
use super::signal_builder::build_signal_series;
use super::simulator::TradeSimulator;

/// Price ratio backtest, `params.window` is the z-score window
pub fn run_ratio_backtest(prices_a: &[Bar], prices_b: &[Bar], params: &BacktestParams) -> BacktestResult {
    run_backtest(SignalMode::Ratio, prices_a, prices_b, params)
}

/// Hedge-adjusted spread backtest.
///
/// `params.window` is the lookback for both the hedge ratio and the z-score.
pub fn run_spread_backtest(prices_a: &[Bar], prices_b: &[Bar], params: &BacktestParams) -> BacktestResult {
    run_backtest(SignalMode::Spread, prices_a, prices_b, params)
}

/// Run a backtest in the given mode
pub fn run_backtest(
    mode: SignalMode,
    prices_a: &[Bar],
    prices_b: &[Bar],
    params: &BacktestParams,
) -> BacktestResult {
    let pair = AlignedPair::align(
        prices_a,
        prices_b,
        params.from_date,
        params.to_date,
        params.alignment,
    );

    if pair.is_empty() {
        tracing::debug!(
            "No aligned bars between {} and {}, returning empty {} result",
            params.from_date,
            params.to_date,
            mode
        );
        return BacktestResult::empty(mode);
    }

    let signal_series = build_signal_series(&pair, mode, params.window);
    let trades = TradeSimulator::from_params(mode, params).run(&signal_series);
    let result = BacktestResult::new(mode, signal_series, trades);

    tracing::debug!(
        "{} backtest over {} bars: {}",
        mode,
        pair.len(),
        result.summary
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AlignmentMode;
    use chrono::{Duration, NaiveDate};

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::from_close(start() + Duration::days(i as i64), c))
            .collect()
    }

    fn params() -> BacktestParams {
        BacktestParams::new(start(), start() + Duration::days(365))
    }

    #[test]
    fn test_constant_ratio_produces_no_trades() {
        let a = bars(&[100.0, 102.0, 104.0, 106.0, 108.0]);
        let b = bars(&[50.0, 51.0, 52.0, 53.0, 54.0]);
        let p = params().with_window(3).with_thresholds(1.0, 0.3);

        let result = run_ratio_backtest(&a, &b, &p);
        assert_eq!(result.signal_series.len(), 5);
        assert!(result.signal_series.iter().all(|s| s.z_score == 0.0));
        assert!(result.trades.is_empty());
        assert_eq!(result.summary.total_trades, 0);
        assert_eq!(result.mode, SignalMode::Ratio);
    }

    #[test]
    fn test_empty_inputs_give_empty_result() {
        let result = run_spread_backtest(&[], &bars(&[1.0, 2.0]), &params());
        assert!(result.is_empty());
        assert!(result.trades.is_empty());
        assert_eq!(result.summary.win_rate_pct, 0.0);
        assert_eq!(result.mode, SignalMode::Spread);
    }

    #[test]
    fn test_out_of_range_dates_give_empty_result() {
        let a = bars(&[1.0, 2.0, 3.0]);
        let p = BacktestParams::new(start() + Duration::days(100), start() + Duration::days(200));
        assert!(run_ratio_backtest(&a, &a, &p).is_empty());
    }

    #[test]
    fn test_spread_points_carry_hedge_ratio() {
        let a = bars(&[10.0, 11.0, 13.0, 12.0, 14.0]);
        let b = bars(&[5.0, 5.4, 6.1, 6.0, 6.8]);
        let result = run_spread_backtest(&a, &b, &params().with_window(3));
        assert!(result.signal_series.iter().all(|p| p.hedge_ratio.is_some()));

        let result = run_ratio_backtest(&a, &b, &params().with_window(3));
        assert!(result.signal_series.iter().all(|p| p.hedge_ratio.is_none()));
    }

    #[test]
    fn test_alignment_mode_is_honoured() {
        let a = bars(&[10.0, 11.0, 12.0, 13.0]);
        let mut b = bars(&[5.0, 5.5, 6.0, 6.5]);
        b.remove(1);

        let positional = run_ratio_backtest(&a, &b, &params());
        let joined = run_ratio_backtest(&a, &b, &params().with_alignment(AlignmentMode::ByDate));
        assert_eq!(positional.signal_series.len(), 3);
        assert_eq!(joined.signal_series.len(), 3);
        // Positional pairs A's day 1 with B's day 2, the join skips A's day 1
        assert_eq!(positional.signal_series[1].stock_a_close, 11.0);
        assert_eq!(joined.signal_series[1].stock_a_close, 12.0);
        assert_eq!(joined.signal_series[1].stock_b_close, 6.0);
    }
}
