//! In-memory price store

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::Bar;
use crate::ports::price_store::{normalize_symbol, PriceStore, StoreError};

#[derive(Debug, Default)]
pub struct InMemoryPriceStore {
    series: RwLock<HashMap<String, Vec<Bar>>>,
}

impl InMemoryPriceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the given series, keyed by normalized symbol
    pub fn with_series<I, S>(series: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = (S, Vec<Bar>)>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        for (symbol, bars) in series {
            map.insert(normalize_symbol(symbol.as_ref())?, bars);
        }
        Ok(Self {
            series: RwLock::new(map),
        })
    }
}

#[async_trait]
impl PriceStore for InMemoryPriceStore {
    async fn get(&self, symbol: &str) -> Result<Vec<Bar>, StoreError> {
        let key = normalize_symbol(symbol)?;
        let series = self.series.read().await;
        Ok(series.get(&key).cloned().unwrap_or_default())
    }

    async fn put(&self, symbol: &str, bars: &[Bar]) -> Result<(), StoreError> {
        let key = normalize_symbol(symbol)?;
        self.series.write().await.insert(key, bars.to_vec());
        Ok(())
    }

    async fn symbols(&self) -> Result<Vec<String>, StoreError> {
        let mut symbols: Vec<String> = self.series.read().await.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}
