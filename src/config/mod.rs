//! Configuration Module
//!
//! Loads and validates configuration from TOML files.

pub mod loader;

pub use loader::{
    BacktestSection, Config, ConfigError, LoggingSection, ProviderSection, StorageSection,
    load_config, load_config_or_default,
};
