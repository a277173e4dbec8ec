//! Profile entity - per-user settings, including the salary rule.
//!
//! The salary configuration lives on the profile row, which is what keeps it
//! to at most one salary rule per user: there is exactly one profile per
//! `user_id` and the salary fields are columns on it, not separate rows.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Profile database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    /// Owning user id, one profile per user
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    /// Display name
    pub name: String,
    /// Monthly salary amount; None or non-positive means no salary configured
    pub salary_amount: Option<f64>,
    /// Which business day of the month the salary is paid on (1 = first)
    pub salary_business_day: Option<i32>,
}

/// Profiles have no direct relations; salary ledger entries are linked by
/// `user_id` plus the `is_salary` flag on transactions.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
