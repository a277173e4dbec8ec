//! Category management.
//!
//! Categories are per-user labels attached to ledger entries and recurring
//! rules. Deleting a category detaches it everywhere first, so no entry or
//! rule is ever left pointing at a missing row.

use crate::{
    entities::{Category, RecurringRule, Transaction, category, recurring_rule, transaction},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*, sea_query::Expr};

/// Color assigned when the caller does not pick one.
pub const DEFAULT_COLOR: &str = "#3B82F6";

/// Creates a new category.
pub async fn create_category(
    db: &DatabaseConnection,
    user_id: &str,
    name: &str,
    color: Option<String>,
    icon: Option<String>,
) -> Result<category::Model> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "category name cannot be empty".to_string(),
        });
    }

    let entry = category::ActiveModel {
        user_id: Set(user_id.to_string()),
        name: Set(name.trim().to_string()),
        color: Set(color.unwrap_or_else(|| DEFAULT_COLOR.to_string())),
        icon: Set(icon),
        ..Default::default()
    };
    entry.insert(db).await.map_err(Into::into)
}

/// Lists a user's categories, ordered alphabetically by name.
pub async fn list_categories(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<category::Model>> {
    Category::find()
        .filter(category::Column::UserId.eq(user_id))
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a category, detaching it from every transaction and recurring
/// rule that referenced it. The entries and rules themselves survive,
/// uncategorized.
pub async fn delete_category(
    db: &DatabaseConnection,
    user_id: &str,
    category_id: i64,
) -> Result<()> {
    let entry = Category::find_by_id(category_id)
        .filter(category::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::CategoryNotFound { id: category_id })?;

    Transaction::update_many()
        .col_expr(transaction::Column::CategoryId, Expr::value(None::<i64>))
        .filter(transaction::Column::CategoryId.eq(category_id))
        .filter(transaction::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    RecurringRule::update_many()
        .col_expr(
            recurring_rule::Column::CategoryId,
            Expr::value(None::<i64>),
        )
        .filter(recurring_rule::Column::CategoryId.eq(category_id))
        .filter(recurring_rule::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    entry.delete(db).await?;
    Ok(())
}
