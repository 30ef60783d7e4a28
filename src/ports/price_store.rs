//! Price Store Port
//!
//! Key-value storage of daily bar history, keyed by uppercase symbol.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::Bar;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize {symbol}: {reason}")]
    Serialization { symbol: String, reason: String },

    #[error("Stored data for {symbol} is corrupted: {reason}")]
    Corrupted { symbol: String, reason: String },
}

/// Uppercase and trim a symbol for use as a storage key
pub fn normalize_symbol(symbol: &str) -> Result<String, StoreError> {
    let key = symbol.trim().to_ascii_uppercase();
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=' | '_'));

    if valid {
        Ok(key)
    } else {
        Err(StoreError::InvalidSymbol(symbol.to_string()))
    }
}

/// Storage of per-symbol bar sequences
#[async_trait]
pub trait PriceStore: Send + Sync {
    /// Bars for `symbol` in date order, empty when nothing is stored
    async fn get(&self, symbol: &str) -> Result<Vec<Bar>, StoreError>;

    /// Replace the stored bars for `symbol`
    async fn put(&self, symbol: &str, bars: &[Bar]) -> Result<(), StoreError>;

    /// All stored symbols, sorted
    async fn symbols(&self) -> Result<Vec<String>, StoreError>;
}
