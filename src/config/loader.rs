//! Configuration Loader
//!
//! Loads and validates configuration from TOML files matching spreadlab.toml structure.
//! Every section is optional and falls back to its defaults.

use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::domain::AlignmentMode;
use crate::strategy::params::{
    BacktestParams, DEFAULT_ENTRY_Z, DEFAULT_EXIT_Z, DEFAULT_MAX_HOLDING_DAYS, DEFAULT_WINDOW,
};

/// Environment variable overriding `storage.data_dir`
pub const DATA_DIR_ENV: &str = "SPREADLAB_DATA_DIR";
/// Environment variable overriding `provider.api_url`
pub const QUOTE_URL_ENV: &str = "SPREADLAB_QUOTE_URL";

/// Main configuration structure matching spreadlab.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageSection,
    pub provider: ProviderSection,
    pub backtest: BacktestSection,
    pub logging: LoggingSection,
}

/// Price storage configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Directory holding one JSON file per symbol (`~` is expanded)
    pub data_dir: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            data_dir: "~/.spreadlab/prices".to_string(),
        }
    }
}

impl StorageSection {
    /// Data directory with environment override and `~` expansion.
    /// Checks SPREADLAB_DATA_DIR env var first, falls back to config value
    pub fn resolved_data_dir(&self) -> PathBuf {
        let raw = std::env::var(DATA_DIR_ENV).unwrap_or_else(|_| self.data_dir.clone());
        PathBuf::from(shellexpand::tilde(&raw).into_owned())
    }
}

/// Quote provider configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderSection {
    /// Chart endpoint base URL
    pub api_url: String,
    /// History range requested per symbol ("1y", "5y", "max")
    pub range: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Attempts per request on rate limits and server errors
    pub max_retries: u32,
}

/// Upper bound on `provider.max_retries`
pub const MAX_PROVIDER_RETRIES: u32 = 10;

impl Default for ProviderSection {
    fn default() -> Self {
        Self {
            api_url: "https://query1.finance.yahoo.com/v8/finance/chart".to_string(),
            range: "5y".to_string(),
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

impl ProviderSection {
    /// API URL with environment override.
    /// Checks SPREADLAB_QUOTE_URL env var first, falls back to config value
    pub fn resolved_api_url(&self) -> String {
        std::env::var(QUOTE_URL_ENV).unwrap_or_else(|_| self.api_url.clone())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Default backtest parameters section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BacktestSection {
    pub entry_z: f64,
    pub exit_z: f64,
    /// Rolling z-score window, also the spread hedge ratio lookback
    pub window: usize,
    /// Time stop in calendar days
    pub max_holding_days: i64,
    /// "positional" or "by_date"
    pub alignment: AlignmentMode,
}

impl Default for BacktestSection {
    fn default() -> Self {
        Self {
            entry_z: DEFAULT_ENTRY_Z,
            exit_z: DEFAULT_EXIT_Z,
            window: DEFAULT_WINDOW,
            max_holding_days: DEFAULT_MAX_HOLDING_DAYS,
            alignment: AlignmentMode::default(),
        }
    }
}

impl BacktestSection {
    /// Backtest parameters for a date range using these defaults
    pub fn params(&self, from_date: NaiveDate, to_date: NaiveDate) -> BacktestParams {
        BacktestParams::new(from_date, to_date)
            .with_thresholds(self.entry_z, self.exit_z)
            .with_window(self.window)
            .with_max_holding_days(self.max_holding_days)
            .with_alignment(self.alignment)
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration, falling back to defaults when the file does not exist
pub fn load_config_or_default<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    load_config(path)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.data_dir.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "data_dir cannot be empty".to_string(),
            ));
        }

        if self.provider.api_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "api_url cannot be empty".to_string(),
            ));
        }

        if self.provider.range.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "range cannot be empty".to_string(),
            ));
        }

        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be > 0".to_string(),
            ));
        }

        if self.provider.max_retries == 0 || self.provider.max_retries > MAX_PROVIDER_RETRIES {
            return Err(ConfigError::ValidationError(format!(
                "max_retries must be between 1 and {}, got {}",
                MAX_PROVIDER_RETRIES, self.provider.max_retries
            )));
        }

        if self.backtest.entry_z <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "entry_z must be > 0, got {}",
                self.backtest.entry_z
            )));
        }

        if self.backtest.exit_z < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "exit_z must be >= 0, got {}",
                self.backtest.exit_z
            )));
        }

        if self.backtest.window == 0 {
            return Err(ConfigError::ValidationError(format!(
                "window must be > 0, got {}",
                self.backtest.window
            )));
        }

        if self.backtest.max_holding_days <= 0 {
            return Err(ConfigError::ValidationError(format!(
                "max_holding_days must be > 0, got {}",
                self.backtest.max_holding_days
            )));
        }

        Ok(())
    }
}
