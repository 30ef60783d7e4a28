//! Yahoo Chart Client
//!
//! HTTP client for the Yahoo Finance v8 chart endpoint.
//! Fetches daily OHLC history for one symbol per request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::ports::market_data::{QuoteError, QuoteProvider, RawQuoteSeries};
use super::types::ChartResponse;

const USER_AGENT: &str = concat!("spreadlab/", env!("CARGO_PKG_VERSION"));

/// Longest single wait after a 429
const MAX_RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(60);

/// Wait before retrying after a 429 on `attempt` (0-based): 2s, 4s, 8s, capped
fn rate_limit_backoff(attempt: u32) -> Duration {
    let secs = 2u64.saturating_pow(attempt.saturating_add(1));
    Duration::from_secs(secs).min(MAX_RATE_LIMIT_BACKOFF)
}

/// Yahoo chart client configuration
#[derive(Debug, Clone)]
pub struct YahooConfig {
    /// Chart endpoint base URL, the symbol is appended as a path segment
    pub api_base_url: String,
    /// History range, e.g. "1y", "5y", "max"
    pub range: String,
    /// Request timeout
    pub timeout: Duration,
    /// Number of attempts per request
    pub max_retries: u32,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://query1.finance.yahoo.com/v8/finance/chart".to_string(),
            range: "5y".to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 3,
        }
    }
}

/// Daily quote provider backed by the Yahoo chart API
#[derive(Debug, Clone)]
pub struct YahooChartClient {
    config: YahooConfig,
    http: Client,
}

impl YahooChartClient {
    /// Create a client with the default configuration
    pub fn new() -> Result<Self, QuoteError> {
        Self::with_config(YahooConfig::default())
    }

    /// Create a client with a custom configuration
    pub fn with_config(config: YahooConfig) -> Result<Self, QuoteError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { config, http })
    }

    /// Chart URL for a symbol
    pub fn chart_url(&self, symbol: &str) -> String {
        format!(
            "{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            symbol
        )
    }

    pub fn config(&self) -> &YahooConfig {
        &self.config
    }

    /// Execute request with retry logic and rate limit handling
    async fn execute_with_retry<F, Fut>(&self, request_fn: F) -> Result<reqwest::Response, QuoteError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<reqwest::Response, QuoteError>>,
    {
        let attempts = self.config.max_retries.max(1);
        let mut last_error = None;

        for attempt in 0..attempts {
            match request_fn().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        let backoff = rate_limit_backoff(attempt);
                        tracing::warn!(
                            "Rate limited (429), backing off for {:?} (attempt {}/{})",
                            backoff,
                            attempt + 1,
                            attempts
                        );
                        last_error = Some(QuoteError::RateLimited);
                        tokio::time::sleep(backoff).await;
                        continue;
                    }

                    if status.is_server_error() {
                        last_error = Some(QuoteError::Api {
                            status: status.as_u16(),
                            body: format!("Server error: {}", status),
                        });
                        tokio::time::sleep(Duration::from_millis(500 * (attempt as u64).saturating_add(1))).await;
                        continue;
                    }

                    return Ok(response);
                }
                Err(e) => {
                    last_error = Some(e);
                    tokio::time::sleep(Duration::from_millis(500 * (attempt as u64).saturating_add(1))).await;
                }
            }
        }

        Err(last_error.unwrap_or(QuoteError::RateLimited))
    }

    /// Check status and deserialize the chart payload
    async fn handle_response(&self, symbol: &str, response: reqwest::Response) -> Result<ChartResponse, QuoteError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(QuoteError::RateLimited);
        }

        // Unknown symbols come back as 404 with a chart.error body
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            let body = response.text().await.unwrap_or_default();
            return Err(QuoteError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| QuoteError::MalformedPayload {
                symbol: symbol.to_string(),
                reason: format!("Failed to parse response: {}", e),
            })
    }
}

#[async_trait]
impl QuoteProvider for YahooChartClient {
    async fn fetch_daily(&self, symbol: &str) -> Result<RawQuoteSeries, QuoteError> {
        let url = self.chart_url(symbol);
        let req = self
            .http
            .get(&url)
            .query(&[("range", self.config.range.as_str()), ("interval", "1d")]);

        tracing::debug!("Fetching {} daily history from {}", symbol, url);

        let response = self
            .execute_with_retry(|| async {
                req.try_clone()
                    .ok_or_else(|| QuoteError::Api {
                        status: 0,
                        body: "Failed to clone request".into(),
                    })?
                    .send()
                    .await
                    .map_err(QuoteError::from)
            })
            .await?;

        let chart = self.handle_response(symbol, response).await?;
        let raw = chart.into_raw_series(symbol)?;

        tracing::debug!("Received {} rows for {}", raw.timestamps.len(), symbol);
        Ok(raw)
    }
}
