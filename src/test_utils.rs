//! Shared test utilities for `Fintrack`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test rows with sensible defaults. Rows inserted here bypass
//! the lifecycle operations on purpose, so unit tests can exercise the
//! materializer and ledger against exactly the state they need.

use crate::{
    entities::{FlowDirection, Transaction, category, recurring_rule, transaction},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Initializes a test-writer tracing subscriber, honoring `RUST_LOG`.
/// Safe to call from every test; only the first call installs it.
pub fn init_test_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Builds a `NaiveDate` from literal parts.
#[allow(clippy::unwrap_used)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Returns every ledger entry of a user, oldest first, for assertions.
pub async fn all_transactions(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<transaction::Model>> {
    Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .order_by_asc(transaction::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Inserts a recurring rule row directly, without materializing anything.
///
/// # Defaults
/// * `category_id`: None
/// * `flow`: Expense
/// * `is_active`: true
pub async fn insert_rule_row(
    db: &DatabaseConnection,
    user_id: &str,
    name: &str,
    amount: f64,
    day_of_month: i32,
) -> Result<recurring_rule::Model> {
    recurring_rule::ActiveModel {
        user_id: Set(user_id.to_string()),
        name: Set(name.to_string()),
        amount: Set(amount),
        day_of_month: Set(day_of_month),
        category_id: Set(None),
        flow: Set(FlowDirection::Expense),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Inserts a category row directly with default color and no icon.
pub async fn insert_category_row(
    db: &DatabaseConnection,
    user_id: &str,
    name: &str,
) -> Result<category::Model> {
    category::ActiveModel {
        user_id: Set(user_id.to_string()),
        name: Set(name.to_string()),
        color: Set(crate::core::category::DEFAULT_COLOR.to_string()),
        icon: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}
