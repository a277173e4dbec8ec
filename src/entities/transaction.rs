//! Transaction entity - Represents one concrete ledger entry.
//!
//! Entries are either ad-hoc (entered directly by the user) or materialized
//! from a recurring rule, in which case `recurring_rule_id` links back to the
//! rule, or `is_salary` is set for salary payouts. Dates are plain calendar
//! dates with no time component.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Direction of money flow for a ledger entry or recurring rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum FlowDirection {
    /// Money coming in (salary, reimbursements, ...)
    #[sea_orm(string_value = "income")]
    Income,
    /// Money going out (bills, purchases, ...)
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning user; every query and mutation is scoped by this
    pub user_id: String,
    /// Whether this entry is income or an expense
    pub flow: FlowDirection,
    /// Transaction amount (positive by convention, not enforced)
    pub amount: f64,
    /// Human-readable description of the transaction
    pub description: String,
    /// Calendar date the entry falls on (no time-of-day)
    pub date: Date,
    /// Optional category reference
    pub category_id: Option<i64>,
    /// Set when this entry was materialized from a named recurring rule
    pub recurring_rule_id: Option<i64>,
    /// True only for salary payouts materialized from the profile's salary rule
    pub is_salary: bool,
}

/// Defines relationships between Transaction and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each transaction may belong to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
    /// Each materialized transaction may belong to one recurring rule.
    /// Deleting a rule unlinks (rather than deletes) the historical entries
    /// that outlive it.
    #[sea_orm(
        belongs_to = "super::recurring_rule::Entity",
        from = "Column::RecurringRuleId",
        to = "super::recurring_rule::Column::Id",
        on_delete = "SetNull"
    )]
    RecurringRule,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::recurring_rule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecurringRule.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
