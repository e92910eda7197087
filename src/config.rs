//! Service configuration
//!
//! Read once from the environment at startup and passed by value into the
//! components that need it.

use std::env;
use std::time::Duration;
use thiserror::Error;

use crate::services::freecurrency_api;

const ENV_DATABASE_URL: &str = "DATABASE_URL";
const ENV_HTTP_PORT: &str = "HTTP_PORT";
const ENV_SYNC_ENABLED: &str = "EXCHANGE_SYNC_ENABLED";
const ENV_SYNC_INTERVAL: &str = "EXCHANGE_SYNC_INTERVAL_SECS";
const ENV_CURRENCIES_FROM: &str = "EXCHANGE_CURRENCIES_FROM";
const ENV_CURRENCIES_TO: &str = "EXCHANGE_CURRENCIES_TO";
const ENV_RATE_PROVIDER: &str = "EXCHANGE_RATE_PROVIDER";
const ENV_FREE_CURRENCY_API_KEY: &str = "FREE_CURRENCY_API_KEY";
const ENV_FREE_CURRENCY_API_URL: &str = "FREE_CURRENCY_API_URL";
const ENV_EXCHANGE_RATE_API_URL: &str = "EXCHANGE_RATE_API_URL";

const DEFAULT_HTTP_PORT: u16 = 8080;
const DEFAULT_SYNC_INTERVAL_SECS: u64 = 1800; // 30 minutes
const DEFAULT_CURRENCIES_FROM: &str = "USD;EUR;GBP;JPY";
const DEFAULT_CURRENCIES_TO: &str = "BRL";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProviderConfig {
    FreeCurrencyApi { api_key: String, base_url: String },
    ExchangeRateApi { base_url: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncConfig {
    pub enabled: bool,
    pub interval: Duration,
    pub source_currencies: Vec<String>,
    pub target_currencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub http_port: u16,
    pub sync: SyncConfig,
    pub provider: ProviderConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &'static str| lookup(name).filter(|v| !v.trim().is_empty());

        let database_url = var(ENV_DATABASE_URL).ok_or(ConfigError::Missing(ENV_DATABASE_URL))?;

        let http_port = match var(ENV_HTTP_PORT) {
            Some(raw) => parse_number(ENV_HTTP_PORT, &raw)?,
            None => DEFAULT_HTTP_PORT,
        };

        let enabled = match var(ENV_SYNC_ENABLED) {
            Some(raw) => parse_bool(ENV_SYNC_ENABLED, &raw)?,
            None => false,
        };

        let interval_secs: u64 = match var(ENV_SYNC_INTERVAL) {
            Some(raw) => parse_number(ENV_SYNC_INTERVAL, &raw)?,
            None => DEFAULT_SYNC_INTERVAL_SECS,
        };
        if interval_secs == 0 {
            return Err(ConfigError::Invalid {
                name: ENV_SYNC_INTERVAL,
                value: "0".to_string(),
            });
        }

        let source_currencies = parse_currency_list(
            &var(ENV_CURRENCIES_FROM).unwrap_or_else(|| DEFAULT_CURRENCIES_FROM.to_string()),
        );
        let target_currencies = parse_currency_list(
            &var(ENV_CURRENCIES_TO).unwrap_or_else(|| DEFAULT_CURRENCIES_TO.to_string()),
        );

        let provider = match var(ENV_RATE_PROVIDER)
            .map(|p| p.trim().to_lowercase())
            .as_deref()
        {
            None | Some("freecurrencyapi") => ProviderConfig::FreeCurrencyApi {
                api_key: var(ENV_FREE_CURRENCY_API_KEY)
                    .ok_or(ConfigError::Missing(ENV_FREE_CURRENCY_API_KEY))?,
                base_url: var(ENV_FREE_CURRENCY_API_URL)
                    .unwrap_or_else(|| freecurrency_api::DEFAULT_BASE_URL.to_string()),
            },
            Some("http") => ProviderConfig::ExchangeRateApi {
                base_url: var(ENV_EXCHANGE_RATE_API_URL)
                    .ok_or(ConfigError::Missing(ENV_EXCHANGE_RATE_API_URL))?,
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: ENV_RATE_PROVIDER,
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            database_url,
            http_port,
            sync: SyncConfig {
                enabled,
                interval: Duration::from_secs(interval_secs),
                source_currencies,
                target_currencies,
            },
            provider,
        })
    }
}

/// Split a `;`-separated currency list. Entries are trimmed and upper-cased;
/// order and duplicates are kept, empty entries dropped.
pub fn parse_currency_list(raw: &str) -> Vec<String> {
    raw.split(';')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_number<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: raw.to_string(),
    })
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: raw.to_string(),
        }),
    }
}
