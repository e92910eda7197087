//! Single-pair exchange sync: fetch the latest rate from the configured
//! provider and hand it to the exchange rate service.

use std::sync::Arc;
use thiserror::Error;

use crate::models::exchange::CurrencyPair;
use crate::services::exchange_rate::ExchangeService;
use crate::services::rate_provider::{ProviderError, RateProvider};
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct ExchangeSyncService {
    provider: Arc<dyn RateProvider>,
    exchanges: Arc<dyn ExchangeService>,
}

impl ExchangeSyncService {
    pub fn new(provider: Arc<dyn RateProvider>, exchanges: Arc<dyn ExchangeService>) -> Self {
        Self { provider, exchanges }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Fetch and persist one pair. Returns the stored rate.
    pub async fn sync_pair(&self, pair: &CurrencyPair) -> Result<f64, SyncError> {
        let rate = self.provider.fetch_rate(&pair.base, &pair.target).await?;

        self.exchanges
            .receive_exchange_rate(&pair.base, &pair.target, rate)
            .await?;

        Ok(rate)
    }
}
