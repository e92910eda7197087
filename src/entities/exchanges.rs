//! `SeaORM` Entity for exchanges table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "exchanges")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub base_currency: String,
    pub target_currency: String,
    #[sea_orm(column_type = "Double")]
    pub rate: f64,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::exchange_rate_history::Entity")]
    ExchangeRateHistory,
}

impl Related<super::exchange_rate_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExchangeRateHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Most recent moment the stored rate was known to be current.
    pub fn last_acquisition(&self) -> DateTimeUtc {
        self.updated_at.unwrap_or(self.created_at)
    }
}
