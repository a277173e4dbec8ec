//! Ad-hoc ledger transactions.
//!
//! Entries the user records directly, as opposed to entries materialized
//! from recurring rules. Materialized entries (linked to a rule or flagged
//! as salary) are managed exclusively by the materializer and the rule
//! lifecycle, so the mutating operations here refuse to touch them.

use crate::{
    core::calendar::MonthSpan,
    entities::{FlowDirection, Transaction, transaction},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Caller-supplied fields for creating or editing an ad-hoc entry.
#[derive(Debug, Clone)]
pub struct TransactionInput {
    /// Whether this entry is income or an expense
    pub flow: FlowDirection,
    /// Entry amount, positive
    pub amount: f64,
    /// Human-readable description
    pub description: String,
    /// Calendar date the entry falls on
    pub date: NaiveDate,
    /// Optional category reference
    pub category_id: Option<i64>,
}

fn validate(input: &TransactionInput) -> Result<()> {
    if !input.amount.is_finite() || input.amount <= 0.0 {
        return Err(Error::InvalidAmount {
            amount: input.amount,
        });
    }
    if input.description.trim().is_empty() {
        return Err(Error::Config {
            message: "transaction description cannot be empty".to_string(),
        });
    }
    Ok(())
}

/// Records a new ad-hoc ledger entry.
pub async fn create_transaction(
    db: &DatabaseConnection,
    user_id: &str,
    input: TransactionInput,
) -> Result<transaction::Model> {
    validate(&input)?;

    let entry = transaction::ActiveModel {
        user_id: Set(user_id.to_string()),
        flow: Set(input.flow),
        amount: Set(input.amount),
        description: Set(input.description.trim().to_string()),
        date: Set(input.date),
        category_id: Set(input.category_id),
        recurring_rule_id: Set(None),
        is_salary: Set(false),
        ..Default::default()
    };
    entry.insert(db).await.map_err(Into::into)
}

/// Finds one ledger entry by id, scoped to its owner.
pub async fn get_transaction(
    db: &DatabaseConnection,
    user_id: &str,
    transaction_id: i64,
) -> Result<Option<transaction::Model>> {
    Transaction::find_by_id(transaction_id)
        .filter(transaction::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists a user's ledger entries within one month, newest first, optionally
/// narrowed to a single category. Includes materialized entries - the ledger
/// view does not distinguish how an entry came to exist.
pub async fn list_transactions(
    db: &DatabaseConnection,
    user_id: &str,
    span: &MonthSpan,
    category_id: Option<i64>,
) -> Result<Vec<transaction::Model>> {
    let mut query = Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .filter(transaction::Column::Date.gte(span.start))
        .filter(transaction::Column::Date.lte(span.end));

    if let Some(category_id) = category_id {
        query = query.filter(transaction::Column::CategoryId.eq(category_id));
    }

    query
        .order_by_desc(transaction::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

fn ensure_ad_hoc(entry: &transaction::Model) -> Result<()> {
    if entry.recurring_rule_id.is_some() || entry.is_salary {
        return Err(Error::Config {
            message: format!("transaction {} is managed by a recurring rule", entry.id),
        });
    }
    Ok(())
}

/// Edits an ad-hoc entry in place. Entries materialized from a recurring
/// rule are refused; they change only through their rule.
pub async fn update_transaction(
    db: &DatabaseConnection,
    user_id: &str,
    transaction_id: i64,
    input: TransactionInput,
) -> Result<transaction::Model> {
    validate(&input)?;

    let entry = get_transaction(db, user_id, transaction_id)
        .await?
        .ok_or(Error::TransactionNotFound { id: transaction_id })?;
    ensure_ad_hoc(&entry)?;

    let mut edited: transaction::ActiveModel = entry.into();
    edited.flow = Set(input.flow);
    edited.amount = Set(input.amount);
    edited.description = Set(input.description.trim().to_string());
    edited.date = Set(input.date);
    edited.category_id = Set(input.category_id);
    edited.update(db).await.map_err(Into::into)
}

/// Deletes an ad-hoc entry. Entries materialized from a recurring rule are
/// refused; they disappear only when their rule is deleted.
pub async fn delete_transaction(
    db: &DatabaseConnection,
    user_id: &str,
    transaction_id: i64,
) -> Result<()> {
    let entry = get_transaction(db, user_id, transaction_id)
        .await?
        .ok_or(Error::TransactionNotFound { id: transaction_id })?;
    ensure_ad_hoc(&entry)?;

    entry.delete(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::materialize::{self, RecurrenceRule};
    use crate::test_utils::*;

    fn groceries(day: u32) -> TransactionInput {
        TransactionInput {
            flow: FlowDirection::Expense,
            amount: 72.50,
            description: "Groceries".to_string(),
            date: date(2024, 3, day),
            category_id: None,
        }
    }

    #[tokio::test]
    async fn create_and_list_within_month() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;
        create_transaction(&db, "user-a", groceries(5)).await?;
        create_transaction(&db, "user-a", groceries(20)).await?;
        // Outside the queried month
        create_transaction(
            &db,
            "user-a",
            TransactionInput {
                date: date(2024, 4, 1),
                ..groceries(1)
            },
        )
        .await?;

        let march = MonthSpan::containing(date(2024, 3, 1));
        let entries = list_transactions(&db, "user-a", &march, None).await?;

        assert_eq!(entries.len(), 2);
        // Newest first
        assert_eq!(entries[0].date, date(2024, 3, 20));
        assert_eq!(entries[1].date, date(2024, 3, 5));

        Ok(())
    }

    #[tokio::test]
    async fn listing_can_filter_by_category() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;
        let food = insert_category_row(&db, "user-a", "Food").await?;
        create_transaction(
            &db,
            "user-a",
            TransactionInput {
                category_id: Some(food.id),
                ..groceries(5)
            },
        )
        .await?;
        create_transaction(&db, "user-a", groceries(6)).await?;

        let march = MonthSpan::containing(date(2024, 3, 1));
        let entries = list_transactions(&db, "user-a", &march, Some(food.id)).await?;

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category_id, Some(food.id));

        Ok(())
    }

    #[tokio::test]
    async fn update_and_delete_are_owner_scoped() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;
        let entry = create_transaction(&db, "user-a", groceries(5)).await?;

        assert!(matches!(
            update_transaction(&db, "user-b", entry.id, groceries(6)).await,
            Err(Error::TransactionNotFound { .. })
        ));
        assert!(matches!(
            delete_transaction(&db, "user-b", entry.id).await,
            Err(Error::TransactionNotFound { .. })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn update_edits_fields_in_place() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;
        let entry = create_transaction(&db, "user-a", groceries(5)).await?;

        let edited = update_transaction(
            &db,
            "user-a",
            entry.id,
            TransactionInput {
                flow: FlowDirection::Income,
                amount: 120.0,
                description: "Refund".to_string(),
                date: date(2024, 3, 8),
                category_id: None,
            },
        )
        .await?;

        assert_eq!(edited.id, entry.id);
        assert_eq!(edited.flow, FlowDirection::Income);
        assert_eq!(edited.amount, 120.0);
        assert_eq!(edited.description, "Refund");
        assert_eq!(edited.date, date(2024, 3, 8));

        Ok(())
    }

    #[tokio::test]
    async fn materialized_entries_are_refused() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;
        let rule = insert_rule_row(&db, "user-a", "Rent", 1200.0, 10).await?;
        materialize::materialize_rule(&db, &RecurrenceRule::Named(rule), date(2024, 3, 15))
            .await?;
        let managed = &all_transactions(&db, "user-a").await?[0];

        assert!(matches!(
            update_transaction(&db, "user-a", managed.id, groceries(5)).await,
            Err(Error::Config { .. })
        ));
        assert!(matches!(
            delete_transaction(&db, "user-a", managed.id).await,
            Err(Error::Config { .. })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn create_validates_input() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;

        assert!(matches!(
            create_transaction(
                &db,
                "user-a",
                TransactionInput {
                    amount: f64::NAN,
                    ..groceries(5)
                },
            )
            .await,
            Err(Error::InvalidAmount { .. })
        ));
        assert!(matches!(
            create_transaction(
                &db,
                "user-a",
                TransactionInput {
                    description: "  ".to_string(),
                    ..groceries(5)
                },
            )
            .await,
            Err(Error::Config { .. })
        ));

        Ok(())
    }
}
