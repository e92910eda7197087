use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::services::rate_provider::{
    check_status, ensure_usable_rate, http_client, ProviderError, RateProvider, REQUEST_TIMEOUT,
};

/// Client for a generic `/convert?from=..&to=..` rate endpoint.
#[derive(Clone)]
pub struct ExchangeRateApiClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    result: Option<f64>,
}

impl ExchangeRateApiClient {
    pub fn new(base_url: String) -> Result<Self, ProviderError> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: String, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApiClient {
    fn name(&self) -> &str {
        "exchange_rate_api"
    }

    async fn fetch_rate(&self, from: &str, to: &str) -> Result<f64, ProviderError> {
        let url = format!("{}/convert", self.base_url);

        tracing::debug!("Fetching {}/{} from {}", from, to, url);

        let response = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .query(&[("from", from), ("to", to)])
            .send()
            .await?;

        let data: ConvertResponse = check_status(response).await?.json().await?;

        let rate = data.result.ok_or_else(|| ProviderError::MissingRate {
            currency: to.to_string(),
        })?;

        ensure_usable_rate(from, to, rate)
    }
}
