//! Recurring rule entity - a user-owned recurring bill or income.
//!
//! Each rule names an obligation that repeats on a fixed day of the month
//! (clamped to the month's last day for short months). Rules are soft-hidden
//! via `is_active` rather than deleted; deletion is an explicit operation
//! that also removes future materialized ledger entries.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::transaction::FlowDirection;

/// Recurring rule database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recurring_rules")]
pub struct Model {
    /// Unique identifier for the rule, immutable after creation
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user; every query and mutation is scoped by this
    pub user_id: String,
    /// Human-readable name, copied into materialized entries as description
    pub name: String,
    /// Amount of each occurrence
    pub amount: f64,
    /// Day of month the occurrence falls on (1..=31, clamped to short months)
    pub day_of_month: i32,
    /// Optional category applied to materialized entries
    pub category_id: Option<i64>,
    /// Whether occurrences are income or expenses
    pub flow: FlowDirection,
    /// Inactive rules are excluded from listing and materialization
    pub is_active: bool,
}

/// Defines relationships between `RecurringRule` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One rule has many materialized transactions
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
    /// Each rule may reference one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
