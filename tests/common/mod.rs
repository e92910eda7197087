#![allow(dead_code)]

use async_trait::async_trait;
use exchange_register::{
    config::SyncConfig,
    entities::{exchange_rate_history, exchanges, prelude::*},
    services::{
        exchange_rate::ExchangeService,
        rate_provider::{ProviderError, RateProvider},
    },
    store::{ExchangeStore, StoreError},
};
use migration::{Migrator, MigratorTrait};
use reqwest::StatusCode;
use sea_orm::{
    ColumnTrait, ConnectOptions, Database, DatabaseConnection, DbBackend, DbErr, EntityTrait,
    FromQueryResult, QueryFilter, QueryOrder, Statement,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Set up a migrated, in-memory SQLite database.
/// A single pooled connection keeps every query on the same memory database.
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);

    let db = Database::connect(options).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}

pub async fn history_for(db: &DatabaseConnection, exchange_id: i32) -> Vec<exchange_rate_history::Model> {
    ExchangeRateHistory::find()
        .filter(exchange_rate_history::Column::ExchangeId.eq(exchange_id))
        .order_by_asc(exchange_rate_history::Column::Id)
        .all(db)
        .await
        .unwrap()
}

pub async fn all_exchanges(db: &DatabaseConnection) -> Vec<exchanges::Model> {
    Exchanges::find()
        .order_by_asc(exchanges::Column::Id)
        .all(db)
        .await
        .unwrap()
}

pub fn sync_config(sources: &[&str], targets: &[&str], interval_secs: u64) -> SyncConfig {
    SyncConfig {
        enabled: true,
        interval: Duration::from_secs(interval_secs),
        source_currencies: sources.iter().map(|s| s.to_string()).collect(),
        target_currencies: targets.iter().map(|s| s.to_string()).collect(),
    }
}

/// Rate provider with programmable answers. Pairs without a rate fail with a
/// 503, like an upstream outage.
#[derive(Default)]
pub struct FakeRateProvider {
    rates: Mutex<HashMap<(String, String), f64>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeRateProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_rate(&self, from: &str, to: &str, rate: f64) {
        self.rates
            .lock()
            .unwrap()
            .insert((from.to_string(), to.to_string()), rate);
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RateProvider for FakeRateProvider {
    fn name(&self) -> &str {
        "fake"
    }

    async fn fetch_rate(&self, from: &str, to: &str) -> Result<f64, ProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((from.to_string(), to.to_string()));

        self.rates
            .lock()
            .unwrap()
            .get(&(from.to_string(), to.to_string()))
            .copied()
            .ok_or_else(|| ProviderError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
                body: format!("no rate for {}/{}", from, to),
            })
    }
}

/// Exchange service that only records what it receives. Does no I/O, so it
/// is safe under a paused tokio clock.
#[derive(Default)]
pub struct RecordingExchangeService {
    received: Mutex<Vec<(String, String, f64)>>,
}

impl RecordingExchangeService {
    pub fn received(&self) -> Vec<(String, String, f64)> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExchangeService for RecordingExchangeService {
    async fn receive_exchange_rate(&self, base: &str, target: &str, rate: f64) -> Result<(), StoreError> {
        self.received
            .lock()
            .unwrap()
            .push((base.to_string(), target.to_string(), rate));
        Ok(())
    }

    async fn list_exchanges(
        &self,
        _base: Option<&str>,
        _target: Option<&str>,
    ) -> Result<Vec<exchanges::Model>, StoreError> {
        Ok(Vec::new())
    }
}

/// Store wrapper that can fail selected statements and counts writes.
pub struct FaultyStore {
    inner: DatabaseConnection,
    /// Fail any `exec` whose SQL mentions this table.
    pub fail_exec_on: Option<&'static str>,
    /// Fail every SELECT.
    pub fail_selects: bool,
    pub exec_calls: AtomicUsize,
}

impl FaultyStore {
    pub fn new(inner: DatabaseConnection) -> Self {
        Self {
            inner,
            fail_exec_on: None,
            fail_selects: false,
            exec_calls: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> &DatabaseConnection {
        &self.inner
    }

    pub fn exec_calls(&self) -> usize {
        self.exec_calls.load(Ordering::SeqCst)
    }

    fn injected(what: &str) -> StoreError {
        StoreError::Database(DbErr::Custom(format!("injected failure: {}", what)))
    }
}

#[async_trait]
impl ExchangeStore for FaultyStore {
    fn backend(&self) -> DbBackend {
        ExchangeStore::backend(&self.inner)
    }

    async fn exec(&self, stmt: Statement) -> Result<u64, StoreError> {
        self.exec_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(table) = self.fail_exec_on {
            if stmt.sql.contains(table) {
                return Err(Self::injected(table));
            }
        }
        ExchangeStore::exec(&self.inner, stmt).await
    }

    async fn query_one<T>(&self, stmt: Statement) -> Result<Option<T>, StoreError>
    where
        T: FromQueryResult + Send,
    {
        if self.fail_selects && stmt.sql.starts_with("SELECT") {
            return Err(Self::injected("select"));
        }
        ExchangeStore::query_one(&self.inner, stmt).await
    }

    async fn query_many<T>(&self, stmt: Statement) -> Result<Vec<T>, StoreError>
    where
        T: FromQueryResult + Send,
    {
        if self.fail_selects {
            return Err(Self::injected("select"));
        }
        ExchangeStore::query_many(&self.inner, stmt).await
    }

    async fn close(&self) -> Result<(), StoreError> {
        ExchangeStore::close(&self.inner).await
    }
}
