//! Ports Layer - Trait definitions for external dependencies
//!
//! This module defines the interfaces (ports) that adapters must implement.
//! Following hexagonal architecture, these traits abstract:
//! - Daily quote history from a remote provider
//! - Per-symbol price storage

pub mod market_data;
pub mod price_store;

pub use market_data::{QuoteError, QuoteProvider, RawQuoteSeries};
pub use price_store::{normalize_symbol, PriceStore, StoreError};
