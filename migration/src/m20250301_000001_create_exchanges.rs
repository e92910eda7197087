use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Current rate per currency pair
        manager
            .create_table(
                Table::create()
                    .table(Exchanges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Exchanges::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Exchanges::BaseCurrency)
                            .string_len(3)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Exchanges::TargetCurrency)
                            .string_len(3)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Exchanges::Rate)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Exchanges::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(SimpleExpr::Keyword(Keyword::CurrentTimestamp)),
                    )
                    .col(
                        ColumnDef::new(Exchanges::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // One row per (base, target)
        manager
            .create_index(
                Index::create()
                    .name("idx_exchanges_pair_unique")
                    .table(Exchanges::Table)
                    .col(Exchanges::BaseCurrency)
                    .col(Exchanges::TargetCurrency)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Listing by target alone is the common filter
        manager
            .create_index(
                Index::create()
                    .name("idx_exchanges_target_currency")
                    .table(Exchanges::Table)
                    .col(Exchanges::TargetCurrency)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Exchanges::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Exchanges {
    Table,
    Id,
    BaseCurrency,
    TargetCurrency,
    Rate,
    CreatedAt,
    UpdatedAt,
}
