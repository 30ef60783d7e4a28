//! Strategy Layer - Pair Trading Signals and Simulation
//!
//! Pure, synchronous backtesting core:
//! - Rolling z-score over a trailing, start-clamped window
//! - Rolling OLS hedge ratio for the spread variant
//! - Ratio and spread signal series built from an aligned pair
//! - Single-position z-score crossing simulator with a time stop
//!
//! Entry points:
//! - `run_ratio_backtest`: trades `close_a / close_b`
//! - `run_spread_backtest`: trades `close_a - beta * close_b`

pub mod params;
pub mod zscore;
pub mod hedge_ratio;
pub mod signal_builder;
pub mod simulator;
pub mod engine;

pub use params::{BacktestParams, ParamsError, DEFAULT_WINDOW, DEFAULT_MAX_HOLDING_DAYS};
pub use zscore::{rolling_z_score, rolling_z_score_detailed, ZScoreResult};
pub use hedge_ratio::{estimate_hedge_ratio, hedge_ratio, HedgeEstimate, NEUTRAL_HEDGE_RATIO};
pub use signal_builder::{build_signal_series, ratio_series, spread_series};
pub use simulator::{PositionState, TradeSimulator};
pub use engine::{run_backtest, run_ratio_backtest, run_spread_backtest};
