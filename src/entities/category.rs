//! Category entity - user-defined labels for grouping ledger entries.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    /// Unique identifier for the category
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user; every query and mutation is scoped by this
    pub user_id: String,
    /// Display name
    pub name: String,
    /// Display color as a hex string (e.g. `"#3B82F6"`)
    pub color: String,
    /// Optional icon name
    pub icon: Option<String>,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One category labels many transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
    /// One category labels many recurring rules
    #[sea_orm(has_many = "super::recurring_rule::Entity")]
    RecurringRules,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::recurring_rule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecurringRules.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
