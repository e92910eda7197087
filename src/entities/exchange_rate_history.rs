//! `SeaORM` Entity for exchange_rate_history table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "exchange_rate_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub exchange_id: i32,
    #[sea_orm(column_type = "Double")]
    pub rate: f64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::exchanges::Entity",
        from = "Column::ExchangeId",
        to = "super::exchanges::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Exchanges,
}

impl Related<super::exchanges::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exchanges.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
