use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_exchanges::Exchanges;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Append-only trail of every synced rate. The foreign key is declared
        // inline because SQLite cannot add one to an existing table.
        manager
            .create_table(
                Table::create()
                    .table(ExchangeRateHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExchangeRateHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ExchangeRateHistory::ExchangeId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExchangeRateHistory::Rate)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExchangeRateHistory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_exchange_rate_history_exchange_id")
                            .from(ExchangeRateHistory::Table, ExchangeRateHistory::ExchangeId)
                            .to(Exchanges::Table, Exchanges::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_exchange_rate_history_exchange_id")
                    .table(ExchangeRateHistory::Table)
                    .col(ExchangeRateHistory::ExchangeId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ExchangeRateHistory::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ExchangeRateHistory {
    Table,
    Id,
    ExchangeId,
    Rate,
    CreatedAt,
}
