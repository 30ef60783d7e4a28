//! JSON file price store
//!
//! Each symbol lives in `<data_dir>/<SYMBOL>.json` as `{"symbol": .., "data": [..]}`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::domain::Bar;
use crate::ports::price_store::{normalize_symbol, PriceStore, StoreError};

const FILE_EXTENSION: &str = "json";

/// On-disk document for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSeries {
    pub symbol: String,
    pub data: Vec<Bar>,
}

#[derive(Debug, Clone)]
pub struct JsonFilePriceStore {
    data_dir: PathBuf,
}

impl JsonFilePriceStore {
    /// Store rooted at `data_dir`; the directory is created on first write
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.{}", key, FILE_EXTENSION))
    }
}

#[async_trait]
impl PriceStore for JsonFilePriceStore {
    async fn get(&self, symbol: &str) -> Result<Vec<Bar>, StoreError> {
        let key = normalize_symbol(symbol)?;
        let path = self.path_for(&key);

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let stored: StoredSeries =
            serde_json::from_str(&content).map_err(|e| StoreError::Corrupted {
                symbol: key.clone(),
                reason: e.to_string(),
            })?;

        tracing::debug!("Loaded {} bars for {} from {}", stored.data.len(), key, path.display());
        Ok(stored.data)
    }

    async fn put(&self, symbol: &str, bars: &[Bar]) -> Result<(), StoreError> {
        let key = normalize_symbol(symbol)?;
        fs::create_dir_all(&self.data_dir).await?;

        let document = StoredSeries {
            symbol: key.clone(),
            data: bars.to_vec(),
        };
        let content =
            serde_json::to_string_pretty(&document).map_err(|e| StoreError::Serialization {
                symbol: key.clone(),
                reason: e.to_string(),
            })?;

        let path = self.path_for(&key);
        fs::write(&path, content).await?;

        tracing::info!("Stored {} bars for {} at {}", bars.len(), key, path.display());
        Ok(())
    }

    async fn symbols(&self) -> Result<Vec<String>, StoreError> {
        let mut entries = match fs::read_dir(&self.data_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut symbols = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if let Ok(key) = normalize_symbol(stem) {
                    symbols.push(key);
                }
            }
        }

        symbols.sort();
        symbols.dedup();
        Ok(symbols)
    }
}
