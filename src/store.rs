//! Exchange store
//!
//! Narrow persistence contract the exchange rate service is written against:
//! execute a statement, fetch one typed row (with "no row" as `None`), fetch
//! many typed rows, and close. Statements are built by the caller for the
//! store's backend, so any SQL dialect sea-orm supports can sit behind it.

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, DbErr, FromQueryResult, Statement};
use thiserror::Error;

/// Any storage failure other than "no row".
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

#[async_trait]
pub trait ExchangeStore: Send + Sync {
    /// Backend the caller should build statements for.
    fn backend(&self) -> DbBackend;

    /// Execute a statement that returns no rows. Returns rows affected.
    async fn exec(&self, stmt: Statement) -> Result<u64, StoreError>;

    /// Fetch a single row. `Ok(None)` means the query matched nothing.
    async fn query_one<T>(&self, stmt: Statement) -> Result<Option<T>, StoreError>
    where
        T: FromQueryResult + Send;

    async fn query_many<T>(&self, stmt: Statement) -> Result<Vec<T>, StoreError>
    where
        T: FromQueryResult + Send;

    /// Release pooled connections.
    async fn close(&self) -> Result<(), StoreError>;
}

#[async_trait]
impl ExchangeStore for DatabaseConnection {
    fn backend(&self) -> DbBackend {
        self.get_database_backend()
    }

    async fn exec(&self, stmt: Statement) -> Result<u64, StoreError> {
        let result = self.execute(stmt).await?;
        Ok(result.rows_affected())
    }

    async fn query_one<T>(&self, stmt: Statement) -> Result<Option<T>, StoreError>
    where
        T: FromQueryResult + Send,
    {
        Ok(T::find_by_statement(stmt).one(self).await?)
    }

    async fn query_many<T>(&self, stmt: Statement) -> Result<Vec<T>, StoreError>
    where
        T: FromQueryResult + Send,
    {
        Ok(T::find_by_statement(stmt).all(self).await?)
    }

    async fn close(&self) -> Result<(), StoreError> {
        // The clone shares the pool, so closing it closes the pool.
        self.clone().close().await?;
        Ok(())
    }
}
