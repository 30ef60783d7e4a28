//! Yahoo Finance Adapter
//!
//! Implementation of the QuoteProvider port for the Yahoo chart API.

mod client;
mod types;

pub use client::{YahooChartClient, YahooConfig};
pub use types::ChartResponse;
