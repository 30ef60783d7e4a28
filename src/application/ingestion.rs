//! Price Ingestion
//!
//! Fetches daily history for a list of symbols and stores it, one symbol at a
//! time. A failing symbol is logged and reported, the rest still go through.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::domain::Bar;
use crate::ports::market_data::QuoteProvider;
use crate::ports::price_store::{PriceStore, StoreError};

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("No symbols given")]
    NoSymbols,
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Split a comma-separated list into uppercase symbols.
///
/// Entries are trimmed, empty entries dropped, and duplicates removed keeping
/// first occurrence order.
pub fn parse_symbol_list(input: &str) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    for entry in input.split(',') {
        let symbol = entry.trim().to_ascii_uppercase();
        if !symbol.is_empty() && !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }
    symbols
}

/// Outcome of a fetch batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestionReport {
    /// Symbols stored, with their bar counts
    pub succeeded: Vec<(String, usize)>,
    /// Symbols that failed, with the reason
    pub failed: Vec<(String, String)>,
}

impl IngestionReport {
    pub fn success_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    /// True when every symbol in the batch failed
    pub fn all_failed(&self) -> bool {
        self.succeeded.is_empty() && !self.failed.is_empty()
    }
}

impl fmt::Display for IngestionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.all_failed() {
            return write!(f, "Failed to fetch data for all symbols");
        }
        let n = self.success_count();
        write!(f, "Fetched data for {} symbol{}", n, if n == 1 { "" } else { "s" })?;
        if !self.failed.is_empty() {
            write!(f, " ({} failed)", self.failure_count())?;
        }
        Ok(())
    }
}

/// Stored history for one symbol
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSeries {
    pub symbol: String,
    pub bars: Vec<Bar>,
}

impl LoadedSeries {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Fetch-and-store use case
pub struct IngestionService {
    provider: Arc<dyn QuoteProvider>,
    store: Arc<dyn PriceStore>,
}

impl IngestionService {
    pub fn new(provider: Arc<dyn QuoteProvider>, store: Arc<dyn PriceStore>) -> Self {
        Self { provider, store }
    }

    /// Fetch and store every symbol in `symbols` (comma-separated)
    pub async fn fetch_symbols(&self, symbols: &str) -> Result<IngestionReport, IngestionError> {
        let symbols = parse_symbol_list(symbols);
        if symbols.is_empty() {
            return Err(IngestionError::NoSymbols);
        }

        let mut report = IngestionReport::default();
        for symbol in symbols {
            match self.fetch_one(&symbol).await {
                Ok(count) => {
                    tracing::info!("Stored {} bars for {}", count, symbol);
                    report.succeeded.push((symbol, count));
                }
                Err(reason) => {
                    tracing::warn!("Failed to fetch {}: {}", symbol, reason);
                    report.failed.push((symbol, reason));
                }
            }
        }

        tracing::info!("{}", report);
        Ok(report)
    }

    async fn fetch_one(&self, symbol: &str) -> Result<usize, String> {
        let raw = self
            .provider
            .fetch_daily(symbol)
            .await
            .map_err(|e| e.to_string())?;
        let bars = raw.into_bars().map_err(|e| e.to_string())?;
        self.store
            .put(symbol, &bars)
            .await
            .map_err(|e| e.to_string())?;
        Ok(bars.len())
    }

    /// Stored history for every symbol in `symbols` (comma-separated)
    pub async fn load_symbols(&self, symbols: &str) -> Result<Vec<LoadedSeries>, IngestionError> {
        load_symbols(self.store.as_ref(), symbols).await
    }
}

/// Read stored history for each symbol; unknown symbols come back empty
pub async fn load_symbols(
    store: &dyn PriceStore,
    symbols: &str,
) -> Result<Vec<LoadedSeries>, IngestionError> {
    let symbols = parse_symbol_list(symbols);
    if symbols.is_empty() {
        return Err(IngestionError::NoSymbols);
    }

    let mut loaded = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let bars = store.get(&symbol).await?;
        loaded.push(LoadedSeries { symbol, bars });
    }

    let found = loaded.iter().filter(|s| !s.is_empty()).count();
    tracing::info!("Loaded data for {} of {} symbols", found, loaded.len());
    Ok(loaded)
}
