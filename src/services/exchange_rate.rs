//! Exchange rate service
//!
//! Sole owner of the `exchanges` and `exchange_rate_history` tables. Every
//! received rate either creates the pair's exchange row or updates it in place,
//! and always appends one history row.
//!
//! Lookup, write and history append are three separate store calls. Two
//! concurrent receives for the same pair can race: one of them may fail on the
//! unique `(base_currency, target_currency)` index, or one update may be lost.
//! Different pairs never interfere.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ColumnTrait, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, Set,
};

use crate::entities::{exchange_rate_history, exchanges, prelude::*};
use crate::store::{ExchangeStore, StoreError};

/// Read and write side of exchange state, as seen by the sync job and the
/// listing service.
#[async_trait]
pub trait ExchangeService: Send + Sync {
    /// Record a freshly fetched rate for `base`/`target`.
    async fn receive_exchange_rate(
        &self,
        base: &str,
        target: &str,
        rate: f64,
    ) -> Result<(), StoreError>;

    /// Current exchanges, optionally narrowed by base and/or target currency.
    /// `None` and `Some("")` both mean "no constraint".
    async fn list_exchanges(
        &self,
        base: Option<&str>,
        target: Option<&str>,
    ) -> Result<Vec<exchanges::Model>, StoreError>;
}

#[derive(Debug, FromQueryResult)]
struct InsertedId {
    id: i32,
}

pub struct ExchangeRateService<S> {
    store: S,
}

impl<S: ExchangeStore> ExchangeRateService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn find_exchange(
        &self,
        base: &str,
        target: &str,
    ) -> Result<Option<exchanges::Model>, StoreError> {
        let stmt = Exchanges::find()
            .filter(exchanges::Column::BaseCurrency.eq(base))
            .filter(exchanges::Column::TargetCurrency.eq(target))
            .limit(1)
            .build(self.store.backend());

        self.store.query_one(stmt).await
    }

    async fn create_exchange(
        &self,
        base: &str,
        target: &str,
        rate: f64,
        now: DateTime<Utc>,
    ) -> Result<i32, StoreError> {
        let new_exchange = exchanges::ActiveModel {
            base_currency: Set(base.to_string()),
            target_currency: Set(target.to_string()),
            rate: Set(rate),
            created_at: Set(now),
            updated_at: Set(None),
            ..Default::default()
        };

        let mut insert = Exchanges::insert(new_exchange).into_query();
        insert.returning_col(exchanges::Column::Id);
        let stmt = self.store.backend().build(&insert);

        let inserted: Option<InsertedId> = self.store.query_one(stmt).await?;
        inserted
            .map(|row| row.id)
            .ok_or_else(|| StoreError::Database(sea_orm::DbErr::RecordNotInserted))
    }

    async fn update_exchange(
        &self,
        id: i32,
        rate: f64,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let stmt = Exchanges::update_many()
            .col_expr(exchanges::Column::Rate, Expr::value(rate))
            .col_expr(exchanges::Column::UpdatedAt, Expr::value(Some(now)))
            .filter(exchanges::Column::Id.eq(id))
            .build(self.store.backend());

        self.store.exec(stmt).await?;
        Ok(())
    }

    async fn append_history(
        &self,
        exchange_id: i32,
        rate: f64,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let entry = exchange_rate_history::ActiveModel {
            exchange_id: Set(exchange_id),
            rate: Set(rate),
            created_at: Set(now),
            ..Default::default()
        };

        let stmt = ExchangeRateHistory::insert(entry).build(self.store.backend());

        self.store.exec(stmt).await?;
        Ok(())
    }
}

#[async_trait]
impl<S: ExchangeStore> ExchangeService for ExchangeRateService<S> {
    async fn receive_exchange_rate(
        &self,
        base: &str,
        target: &str,
        rate: f64,
    ) -> Result<(), StoreError> {
        let existing = self.find_exchange(base, target).await?;
        let now = Utc::now();

        let exchange_id = match existing {
            Some(exchange) => {
                self.update_exchange(exchange.id, rate, now)
                    .await
                    .inspect_err(|e| {
                        tracing::error!("Failed to update exchange {}-{}: {}", base, target, e)
                    })?;
                tracing::debug!(
                    "Updated exchange {}-{} (id {}) to {}",
                    base,
                    target,
                    exchange.id,
                    rate
                );
                exchange.id
            }
            None => {
                let id = self
                    .create_exchange(base, target, rate, now)
                    .await
                    .inspect_err(|e| {
                        tracing::error!("Failed to create exchange {}-{}: {}", base, target, e)
                    })?;
                tracing::debug!("Created exchange {}-{} with id {}", base, target, id);
                id
            }
        };

        self.append_history(exchange_id, rate, now)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    "Failed to append rate history for exchange {}-{}: {}",
                    base,
                    target,
                    e
                )
            })?;

        tracing::debug!("Recorded rate history for {}-{}: {}", base, target, rate);

        Ok(())
    }

    async fn list_exchanges(
        &self,
        base: Option<&str>,
        target: Option<&str>,
    ) -> Result<Vec<exchanges::Model>, StoreError> {
        let mut query = Exchanges::find();

        if let Some(base) = base.filter(|b| !b.is_empty()) {
            query = query.filter(exchanges::Column::BaseCurrency.eq(base));
        }
        if let Some(target) = target.filter(|t| !t.is_empty()) {
            query = query.filter(exchanges::Column::TargetCurrency.eq(target));
        }

        let stmt = query
            .order_by_asc(exchanges::Column::Id)
            .build(self.store.backend());

        self.store.query_many(stmt).await
    }
}
