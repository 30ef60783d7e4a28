//! Trade Simulator
//!
//! Single-position state machine driven by z-score threshold crossings.
//!
//! Entry rules (only while flat):
//! - LONG when z crosses down through `-entry_z` (prev > -entry_z, curr <= -entry_z)
//! - SHORT when z crosses up through `entry_z` (prev < entry_z, curr >= entry_z)
//!
//! Exit rules (only while in position, first match closes):
//! - LONG when z crosses up through `-exit_z`
//! - SHORT when z crosses down through `exit_z`
//! - Any position held `max_holding_days` calendar days or more
//!
//! A bar that closes a position never opens a new one; re-entry can happen on
//! the following bar.

use crate::domain::{
    ClosedTrade, ExitReason, HedgeDrift, OpenTrade, SignalMode, SignalPoint, TradeType,
};

use super::params::{BacktestParams, DEFAULT_MAX_HOLDING_DAYS};

/// Simulator state between bars
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PositionState {
    #[default]
    Flat,
    InPosition(OpenTrade),
}

impl PositionState {
    pub fn is_flat(&self) -> bool {
        matches!(self, PositionState::Flat)
    }

    pub fn open_trade(&self) -> Option<&OpenTrade> {
        match self {
            PositionState::Flat => None,
            PositionState::InPosition(trade) => Some(trade),
        }
    }
}

/// Z-score crossing simulator
#[derive(Debug, Clone)]
pub struct TradeSimulator {
    entry_z: f64,
    exit_z: f64,
    max_holding_days: i64,
    mode: SignalMode,
}

impl TradeSimulator {
    pub fn new(mode: SignalMode, entry_z: f64, exit_z: f64) -> Self {
        Self {
            entry_z,
            exit_z,
            max_holding_days: DEFAULT_MAX_HOLDING_DAYS,
            mode,
        }
    }

    pub fn from_params(mode: SignalMode, params: &BacktestParams) -> Self {
        Self::new(mode, params.entry_z, params.exit_z).with_max_holding_days(params.max_holding_days)
    }

    pub fn with_max_holding_days(mut self, days: i64) -> Self {
        self.max_holding_days = days;
        self
    }

    /// Run over the whole series and return closed trades in order.
    ///
    /// A position still open at the end of the series is not reported.
    pub fn run(&self, series: &[SignalPoint]) -> Vec<ClosedTrade> {
        let mut state = PositionState::Flat;
        let mut trades = Vec::new();

        for index in 1..series.len() {
            let (next, closed) = self.step(state, series, index);
            if let Some(trade) = closed {
                tracing::debug!("Closed {}", trade);
                trades.push(trade);
            }
            state = next;
        }

        if let PositionState::InPosition(open) = state {
            tracing::debug!(
                "{} opened {} still open at end of series",
                open.trade_type,
                open.entry_date
            );
        }

        trades
    }

    /// Advance the state machine by one bar.
    ///
    /// Index 0 has no previous bar to cross from, and an index past the end
    /// has no bar at all; both leave `state` unchanged.
    pub fn step(
        &self,
        state: PositionState,
        series: &[SignalPoint],
        index: usize,
    ) -> (PositionState, Option<ClosedTrade>) {
        if index == 0 || index >= series.len() {
            return (state, None);
        }

        let prev_z = series[index - 1].z_score;
        let current = &series[index];
        let curr_z = current.z_score;

        match state {
            PositionState::Flat => match self.entry_signal(prev_z, curr_z) {
                Some(trade_type) => {
                    let open = OpenTrade {
                        entry_date: current.date,
                        trade_type,
                        entry_index: index,
                        entry_signal: current.signal_value,
                        entry_hedge_ratio: current.hedge_ratio,
                    };
                    tracing::trace!("Entered {} at {} (z {:.3})", trade_type, current.date, curr_z);
                    (PositionState::InPosition(open), None)
                }
                None => (PositionState::Flat, None),
            },
            PositionState::InPosition(open) => {
                match self.exit_reason(&open, prev_z, curr_z, current) {
                    Some(reason) => {
                        let trade = self.close(&open, series, index, reason);
                        (PositionState::Flat, Some(trade))
                    }
                    None => (state, None),
                }
            }
        }
    }

    fn entry_signal(&self, prev_z: f64, curr_z: f64) -> Option<TradeType> {
        if prev_z > -self.entry_z && curr_z <= -self.entry_z {
            Some(TradeType::Long)
        } else if prev_z < self.entry_z && curr_z >= self.entry_z {
            Some(TradeType::Short)
        } else {
            None
        }
    }

    fn exit_reason(
        &self,
        open: &OpenTrade,
        prev_z: f64,
        curr_z: f64,
        current: &SignalPoint,
    ) -> Option<ExitReason> {
        let reverted = match open.trade_type {
            TradeType::Long => prev_z < -self.exit_z && curr_z >= -self.exit_z,
            TradeType::Short => prev_z > self.exit_z && curr_z <= self.exit_z,
        };

        if reverted {
            Some(ExitReason::MeanReversion)
        } else if open.holding_days(current.date) >= self.max_holding_days {
            Some(ExitReason::TimeStop)
        } else {
            None
        }
    }

    fn close(
        &self,
        open: &OpenTrade,
        series: &[SignalPoint],
        exit_index: usize,
        exit_reason: ExitReason,
    ) -> ClosedTrade {
        let exit = &series[exit_index];

        // Worst adverse excursion over entry..=exit; the entry bar contributes 0
        let worst = series[open.entry_index..=exit_index]
            .iter()
            .map(|p| -open.unrealized(p.signal_value))
            .filter(|loss| *loss > 0.0)
            .fold(0.0, f64::max);
        let raw_profit = open.unrealized(exit.signal_value);

        let (profit, max_drawdown, hedge) = match self.mode {
            SignalMode::Ratio => (
                percent_of(raw_profit, open.entry_signal),
                percent_of(worst, open.entry_signal),
                None,
            ),
            SignalMode::Spread => (
                raw_profit,
                worst,
                Some(HedgeDrift::new(
                    open.entry_hedge_ratio.unwrap_or(1.0),
                    exit.hedge_ratio_or_neutral(),
                )),
            ),
        };

        ClosedTrade {
            entry_date: open.entry_date,
            exit_date: exit.date,
            trade_type: open.trade_type,
            holding_period_days: open.holding_days(exit.date),
            profit,
            max_drawdown,
            exit_reason,
            hedge,
        }
    }
}

fn percent_of(value: f64, base: f64) -> f64 {
    if base == 0.0 {
        0.0
    } else {
        value / base * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, NaiveDate};

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    /// Daily points with the given z-scores and signal values
    fn series(z_scores: &[f64], signals: &[f64]) -> Vec<SignalPoint> {
        z_scores
            .iter()
            .zip(signals)
            .enumerate()
            .map(|(i, (&z, &s))| SignalPoint {
                date: start() + Duration::days(i as i64),
                stock_a_close: 0.0,
                stock_b_close: 0.0,
                signal_value: s,
                z_score: z,
                hedge_ratio: None,
            })
            .collect()
    }

    fn ratio_sim(entry_z: f64, exit_z: f64) -> TradeSimulator {
        TradeSimulator::new(SignalMode::Ratio, entry_z, exit_z)
    }

    #[test]
    fn test_short_entry_and_reversion_exit() {
        let points = series(&[0.0, 2.1, 2.3, 0.9, 0.2], &[2.0, 2.2, 2.3, 2.1, 2.0]);
        let trades = ratio_sim(2.0, 1.0).run(&points);

        assert_eq!(trades.len(), 1);
        let trade = &trades[0];
        assert_eq!(trade.trade_type, TradeType::Short);
        assert_eq!(trade.entry_date, start() + Duration::days(1));
        assert_eq!(trade.exit_date, start() + Duration::days(3));
        assert_eq!(trade.holding_period_days, 2);
        assert_eq!(trade.exit_reason, ExitReason::MeanReversion);
        // Short from 2.2 to 2.1: +0.1 / 2.2
        assert_relative_eq!(trade.profit, 0.1 / 2.2 * 100.0, epsilon = 1e-9);
        // Worst point was 2.3, 0.1 against entry
        assert_relative_eq!(trade.max_drawdown, 0.1 / 2.2 * 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_long_entry_and_reversion_exit() {
        let points = series(&[0.0, -2.6, -3.0, -1.0, 0.0], &[2.0, 1.8, 1.7, 1.95, 2.0]);
        let trades = ratio_sim(2.5, 1.5).run(&points);

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].trade_type, TradeType::Long);
        assert_eq!(trades[0].holding_period_days, 2);
        assert_relative_eq!(trades[0].profit, 0.15 / 1.8 * 100.0, epsilon = 1e-9);
        assert_relative_eq!(trades[0].max_drawdown, 0.1 / 1.8 * 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_no_entry_without_crossing() {
        // Starts beyond the threshold: no downward crossing happens
        let points = series(&[-3.0, -3.0, -2.8, -2.9], &[1.0; 4]);
        assert!(ratio_sim(2.5, 1.5).run(&points).is_empty());
    }

    #[test]
    fn test_index_zero_is_never_an_entry() {
        let points = series(&[-3.0], &[1.0]);
        assert!(ratio_sim(2.5, 1.5).run(&points).is_empty());
        assert!(ratio_sim(2.5, 1.5).run(&[]).is_empty());
    }

    #[test]
    fn test_step_outside_series_keeps_state() {
        let points = series(&[0.0, -2.6, -2.7], &[1.0; 3]);
        let sim = ratio_sim(2.5, 1.5);

        let (state, closed) = sim.step(PositionState::Flat, &points, 0);
        assert!(state.is_flat());
        assert!(closed.is_none());

        let (state, closed) = sim.step(PositionState::Flat, &[], 0);
        assert!(state.is_flat());
        assert!(closed.is_none());

        // Long opened at 1 survives a step past the end untouched
        let (open, _) = sim.step(PositionState::Flat, &points, 1);
        assert!(!open.is_flat());
        let (state, closed) = sim.step(open, &points, 3);
        assert_eq!(state, open);
        assert!(closed.is_none());
    }

    #[test]
    fn test_time_stop_closes_at_fifteen_days() {
        let mut z = vec![0.0, -3.0];
        z.extend(std::iter::repeat(-3.0).take(30));
        let signals = vec![1.0; z.len()];
        let points = series(&z, &signals);

        let trades = ratio_sim(2.5, 1.5).run(&points);
        assert_eq!(trades.len(), 1);
        let trade = &trades[0];
        assert_eq!(trade.exit_reason, ExitReason::TimeStop);
        assert_eq!(trade.holding_period_days, 15);
        assert_eq!(trade.exit_date, trade.entry_date + Duration::days(15));
    }

    #[test]
    fn test_time_stop_with_calendar_gaps() {
        // Weekly bars: first index at or past 15 days is 21 days after entry
        let mut points = series(&[0.0, 3.0, 3.0, 3.0, 3.0], &[1.0; 5]);
        for (i, p) in points.iter_mut().enumerate() {
            p.date = start() + Duration::days(7 * i as i64);
        }

        let trades = ratio_sim(2.5, 1.5).run(&points);
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].holding_period_days, 21);
        assert_eq!(trades[0].exit_reason, ExitReason::TimeStop);
    }

    #[test]
    fn test_custom_holding_limit() {
        let points = series(&[0.0, 3.0, 3.0, 3.0, 3.0, 3.0], &[1.0; 6]);
        let trades = ratio_sim(2.5, 1.5).with_max_holding_days(3).run(&points);
        assert_eq!(trades[0].holding_period_days, 3);
    }

    #[test]
    fn test_crossing_while_in_position_is_ignored() {
        // Long opens at 1; index 3 crosses -2.5 again without reverting
        let points = series(&[0.0, -3.0, -2.0, -3.0], &[1.0; 4]);
        let sim = ratio_sim(2.5, 1.5);

        let mut state = PositionState::Flat;
        for i in 1..points.len() {
            let (next, closed) = sim.step(state, &points, i);
            assert!(closed.is_none());
            state = next;
        }

        let open = state.open_trade().unwrap();
        assert_eq!(open.trade_type, TradeType::Long);
        assert_eq!(open.entry_index, 1);
    }

    #[test]
    fn test_reentry_after_close() {
        // Short at 1, exit at 2, short again at 4
        let points = series(&[0.0, 2.5, 0.5, 0.0, 2.6, 0.1], &[1.0; 6]);
        let trades = ratio_sim(2.0, 1.0).run(&points);
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[1].entry_date, start() + Duration::days(4));
    }

    #[test]
    fn test_exit_bar_does_not_reenter() {
        // Index 2 exits the long; it is also a short crossing but stays flat
        let points = series(&[0.0, -3.0, 3.0, 3.0], &[1.0; 4]);
        let trades = ratio_sim(2.5, 1.5).run(&points);
        assert_eq!(trades.len(), 1);
    }

    #[test]
    fn test_open_position_at_end_is_not_reported() {
        let points = series(&[0.0, 3.0, 3.0], &[1.0; 3]);
        assert!(ratio_sim(2.5, 1.5).run(&points).is_empty());
    }

    #[test]
    fn test_spread_mode_reports_absolute_profit_and_hedge_drift() {
        let mut points = series(&[0.0, -2.6, -3.0, -1.0], &[0.0, -4.0, -5.0, 1.0]);
        points[1].hedge_ratio = Some(2.0);
        points[3].hedge_ratio = Some(2.2);

        let trades = TradeSimulator::new(SignalMode::Spread, 2.5, 1.5).run(&points);
        assert_eq!(trades.len(), 1);
        let trade = &trades[0];
        assert_relative_eq!(trade.profit, 5.0);
        assert_relative_eq!(trade.max_drawdown, 1.0);

        let hedge = trade.hedge.unwrap();
        assert_eq!(hedge.entry_hedge_ratio, 2.0);
        assert_eq!(hedge.exit_hedge_ratio, 2.2);
        assert_relative_eq!(hedge.hedge_ratio_change_pct, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_drawdown_is_never_negative() {
        // Trade moves only in our favour
        let points = series(&[0.0, 2.5, 0.5], &[10.0, 10.0, 9.0]);
        let trades = ratio_sim(2.0, 1.0).run(&points);
        assert_eq!(trades[0].max_drawdown, 0.0);
        assert!(trades[0].profit > 0.0);
    }

    #[test]
    fn test_reversion_exit_preferred_over_time_stop() {
        let mut z = vec![0.0, 3.0];
        z.extend(std::iter::repeat(3.0).take(14));
        z.push(0.5); // index 16, held 15 days, also a reversion
        let signals = vec![1.0; z.len()];
        let trades = ratio_sim(2.5, 1.5).run(&series(&z, &signals));

        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].holding_period_days, 15);
        assert_eq!(trades[0].exit_reason, ExitReason::MeanReversion);
    }

    #[test]
    fn test_step_state_helpers() {
        assert!(PositionState::default().is_flat());
        assert!(PositionState::Flat.open_trade().is_none());
    }
}
