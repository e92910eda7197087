pub use super::exchange_rate_history::Entity as ExchangeRateHistory;
pub use super::exchanges::Entity as Exchanges;
