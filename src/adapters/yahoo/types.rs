//! Yahoo chart API types

use serde::Deserialize;

use crate::ports::market_data::{QuoteError, RawQuoteSeries};

/// Top-level chart response
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chart {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
    #[serde(default)]
    pub error: Option<ChartError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub meta: Option<ChartMeta>,
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    pub indicators: Indicators,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub exchange_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteArrays>,
}

/// Parallel OHLC arrays; Yahoo emits `null` for missing values
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteArrays {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Option<Vec<Option<f64>>>,
}

impl ChartResponse {
    /// Extract the first result's timestamps and first quote block
    pub fn into_raw_series(self, symbol: &str) -> Result<RawQuoteSeries, QuoteError> {
        let malformed = |reason: &str| QuoteError::MalformedPayload {
            symbol: symbol.to_string(),
            reason: reason.to_string(),
        };

        if let Some(error) = self.chart.error {
            return Err(QuoteError::MalformedPayload {
                symbol: symbol.to_string(),
                reason: format!("{}: {}", error.code, error.description),
            });
        }

        let result = self
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| QuoteError::NoData(symbol.to_string()))?;

        let timestamps = result
            .timestamp
            .ok_or_else(|| malformed("missing timestamp array"))?;
        let quote = result
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| malformed("missing indicators.quote[0]"))?;
        let close = quote.close.ok_or_else(|| malformed("missing close array"))?;

        Ok(RawQuoteSeries {
            symbol: symbol.to_string(),
            timestamps,
            open: quote.open,
            high: quote.high,
            low: quote.low,
            close,
        })
    }
}
