//! Rate provider abstraction
//!
//! A provider answers one question: how many units of `to` does one unit of
//! `from` buy right now. Implementations make exactly one outbound call per
//! request and never retry; the sync job simply tries again next cycle.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::ProviderConfig;
use crate::services::{exchange_rate_api::ExchangeRateApiClient, freecurrency_api::FreeCurrencyApiClient};

/// Upper bound for one provider round trip, connect included.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to rate provider failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("rate provider returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("rate provider response has no rate for {currency}")]
    MissingRate { currency: String },

    #[error("rate provider returned unusable rate {rate} for {from}/{to}")]
    InvalidRate { from: String, to: String, rate: f64 },
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Latest rate for one unit of `from` expressed in `to`.
    async fn fetch_rate(&self, from: &str, to: &str) -> Result<f64, ProviderError>;
}

/// Provider selected by configuration.
pub fn build_rate_provider(config: &ProviderConfig) -> Result<Arc<dyn RateProvider>, ProviderError> {
    let provider: Arc<dyn RateProvider> = match config {
        ProviderConfig::FreeCurrencyApi { api_key, base_url } => {
            Arc::new(FreeCurrencyApiClient::new(api_key.clone(), base_url.clone())?)
        }
        ProviderConfig::ExchangeRateApi { base_url } => {
            Arc::new(ExchangeRateApiClient::new(base_url.clone())?)
        }
    };
    Ok(provider)
}

/// HTTP client shared by the provider implementations. Every request is
/// bounded by `timeout`; an expired request surfaces as `ProviderError::Request`.
pub(crate) fn http_client(timeout: Duration) -> Result<Client, ProviderError> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Rejects rates that cannot be stored as a current exchange rate.
pub(crate) fn ensure_usable_rate(from: &str, to: &str, rate: f64) -> Result<f64, ProviderError> {
    if rate.is_finite() && rate >= 0.0 {
        Ok(rate)
    } else {
        Err(ProviderError::InvalidRate {
            from: from.to_string(),
            to: to.to_string(),
            rate,
        })
    }
}

/// Turns a non-success response into `ProviderError::Status`, keeping the body
/// for the log line.
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Status { status, body })
}
