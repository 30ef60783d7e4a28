//! Backtest Service
//!
//! Loads a pair from the price store, checks the inputs, and runs the
//! selected backtest mode.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::{BacktestResult, SignalMode};
use crate::ports::price_store::{PriceStore, StoreError};
use crate::strategy::{run_backtest, BacktestParams, ParamsError};

#[derive(Debug, Error)]
pub enum BacktestError {
    #[error("Select both stocks before running a backtest")]
    EmptySelection,
    #[error("No stored price data for {0}, fetch it first")]
    MissingPriceData(String),
    #[error("Invalid parameters: {0}")]
    InvalidParams(#[from] ParamsError),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// One backtest run request
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestRequest {
    pub stock_a: String,
    pub stock_b: String,
    pub mode: SignalMode,
    pub params: BacktestParams,
}

impl BacktestRequest {
    pub fn new(
        stock_a: impl Into<String>,
        stock_b: impl Into<String>,
        mode: SignalMode,
        params: BacktestParams,
    ) -> Self {
        Self {
            stock_a: stock_a.into(),
            stock_b: stock_b.into(),
            mode,
            params,
        }
    }
}

/// Runs backtests against stored price history
pub struct BacktestService {
    store: Arc<dyn PriceStore>,
}

impl BacktestService {
    pub fn new(store: Arc<dyn PriceStore>) -> Self {
        Self { store }
    }

    pub async fn run(&self, request: &BacktestRequest) -> Result<BacktestResult, BacktestError> {
        let stock_a = request.stock_a.trim();
        let stock_b = request.stock_b.trim();
        if stock_a.is_empty() || stock_b.is_empty() {
            return Err(BacktestError::EmptySelection);
        }

        let prices_a = self.store.get(stock_a).await?;
        if prices_a.is_empty() {
            return Err(BacktestError::MissingPriceData(stock_a.to_ascii_uppercase()));
        }
        let prices_b = self.store.get(stock_b).await?;
        if prices_b.is_empty() {
            return Err(BacktestError::MissingPriceData(stock_b.to_ascii_uppercase()));
        }

        let params = &request.params;
        params.validate()?;
        if request.mode == SignalMode::Spread && !params.lookback_in_recommended_range() {
            tracing::warn!(
                "Spread lookback {} is outside the recommended 10-252 range",
                params.window
            );
        }

        tracing::info!(
            "Running {} backtest {}/{} from {} to {} (entry {}, exit {}, window {})",
            request.mode,
            stock_a,
            stock_b,
            params.from_date,
            params.to_date,
            params.entry_z,
            params.exit_z,
            params.window
        );

        let result = run_backtest(request.mode, &prices_a, &prices_b, params);

        if result.is_empty() {
            tracing::warn!(
                "No overlapping bars for {}/{} between {} and {}",
                stock_a,
                stock_b,
                params.from_date,
                params.to_date
            );
        }
        tracing::info!("Backtest complete: {}", result.summary);

        Ok(result)
    }
}
