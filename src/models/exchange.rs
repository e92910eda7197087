use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::{IntoParams, ToSchema};

use crate::entities::exchanges;

/// Ordered (base, target) currency combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyPair {
    pub base: String,
    pub target: String,
}

impl CurrencyPair {
    pub fn new(base: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            target: target.into(),
        }
    }

    /// Pairs like USD/USD carry no information and are never synced.
    pub fn is_self_pair(&self) -> bool {
        self.base == self.target
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.target)
    }
}

/// Query parameters for GET /exchanges
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListExchangesQuery {
    /// Source currency code (e.g. USD, EUR)
    #[param(example = "USD")]
    pub source: Option<String>,
    /// Target currency code (e.g. BRL, EUR)
    #[param(example = "BRL")]
    pub target: Option<String>,
}

/// Single exchange in the GET /exchanges response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExchangeResponse {
    pub id: i32,
    #[schema(example = "USD")]
    pub source_currency: String,
    #[schema(example = "BRL")]
    pub target_currency: String,
    #[schema(example = 5.25)]
    pub rate: f64,
    pub last_acquisition: DateTime<Utc>,
}

pub type ListExchangesResponse = Vec<ExchangeResponse>;

impl From<exchanges::Model> for ExchangeResponse {
    fn from(exchange: exchanges::Model) -> Self {
        let last_acquisition = exchange.last_acquisition();
        Self {
            id: exchange.id,
            source_currency: exchange.base_currency,
            target_currency: exchange.target_currency,
            rate: exchange.rate,
            last_acquisition,
        }
    }
}
