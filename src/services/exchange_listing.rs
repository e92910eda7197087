//! Exchange listing
//!
//! Read-side adapter between the HTTP surface and the exchange rate service.

use std::sync::Arc;

use crate::models::exchange::{ExchangeResponse, ListExchangesQuery, ListExchangesResponse};
use crate::services::exchange_rate::ExchangeService;
use crate::store::StoreError;

#[derive(Clone)]
pub struct ExchangeListingService {
    exchanges: Arc<dyn ExchangeService>,
}

impl ExchangeListingService {
    pub fn new(exchanges: Arc<dyn ExchangeService>) -> Self {
        Self { exchanges }
    }

    /// Current exchanges matching the query, in the order the service returns
    /// them. No matches is an empty list.
    pub async fn list(&self, query: &ListExchangesQuery) -> Result<ListExchangesResponse, StoreError> {
        let exchanges = self
            .exchanges
            .list_exchanges(query.source.as_deref(), query.target.as_deref())
            .await?;

        Ok(exchanges.into_iter().map(ExchangeResponse::from).collect())
    }
}
