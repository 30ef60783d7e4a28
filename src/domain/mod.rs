//! Domain Layer - Core types for the pair trading backtester
//!
//! Pure data types with no I/O. Bars come in from the ports layer,
//! signal points, trades and results go out to the adapters.
//!
//! - `bar`: Daily OHLC bar and date filtering
//! - `pair`: Aligning two bar series onto a common index
//! - `signal`: Signal modes and per-bar signal points
//! - `trade`: Open and closed pair trades
//! - `summary`: Win rate and profit aggregation
//! - `result`: Complete backtest output

pub mod bar;
pub mod pair;
pub mod signal;
pub mod trade;
pub mod summary;
pub mod result;

pub use bar::{Bar, filter_by_date};
pub use pair::{AlignedPair, AlignmentMode};
pub use signal::{SignalMode, SignalPoint};
pub use trade::{ClosedTrade, ExitReason, HedgeDrift, OpenTrade, TradeType};
pub use summary::BacktestSummary;
pub use result::BacktestResult;
