//! Income entity - Money received by an owner.
//!
//! Unlike expenses, every income names its `source` (e.g. an employer).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Income database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "incomes")]
pub struct Model {
    /// Unique identifier for the income
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the income
    pub user_id: String,
    /// Category the income is filed under
    pub category_id: i64,
    /// Amount received
    pub amount: f64,
    /// Where the money came from
    pub source: String,
    /// When the money was received
    pub date: DateTimeUtc,
    /// When the row was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Income and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each income belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
