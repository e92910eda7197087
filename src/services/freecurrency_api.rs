use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::services::rate_provider::{
    check_status, ensure_usable_rate, http_client, ProviderError, RateProvider, REQUEST_TIMEOUT,
};

pub const DEFAULT_BASE_URL: &str = "https://api.freecurrencyapi.com";

/// Client for freecurrencyapi.com `/v1/latest`.
#[derive(Clone)]
pub struct FreeCurrencyApiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct LatestResponse {
    data: HashMap<String, f64>,
}

impl FreeCurrencyApiClient {
    pub fn new(api_key: String, base_url: String) -> Result<Self, ProviderError> {
        Self::with_timeout(api_key, base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: http_client(timeout)?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RateProvider for FreeCurrencyApiClient {
    fn name(&self) -> &str {
        "freecurrencyapi"
    }

    async fn fetch_rate(&self, from: &str, to: &str) -> Result<f64, ProviderError> {
        let url = format!("{}/v1/latest", self.base_url);

        tracing::debug!("Fetching {}/{} from FreeCurrencyAPI", from, to);

        let response = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .header("apikey", &self.api_key)
            .query(&[("base_currency", from), ("currencies", to)])
            .send()
            .await?;

        let data: LatestResponse = check_status(response).await?.json().await?;

        let rate = data
            .data
            .get(to)
            .copied()
            .ok_or_else(|| ProviderError::MissingRate {
                currency: to.to_string(),
            })?;

        ensure_usable_rate(from, to, rate)
    }
}
