//! Lifecycle of named recurring rules.
//!
//! Create, edit, deactivate, and delete recurring bills/incomes, keeping the
//! materialized ledger in step: creation materializes the two-month window,
//! edits reconcile it against the final persisted values, and deletion
//! removes every future occurrence (current month onward) before dropping
//! the rule itself. Each operation takes `today` explicitly, resolved once
//! by the caller, so both window months always come from the same day.

use crate::{
    core::materialize::{self, MaterializeOutcome, RecurrenceRule},
    entities::{FlowDirection, RecurringRule, recurring_rule},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Caller-supplied fields for creating or editing a recurring rule.
#[derive(Debug, Clone)]
pub struct RecurringRuleInput {
    /// Human-readable name, copied to materialized entries
    pub name: String,
    /// Amount of each occurrence
    pub amount: f64,
    /// Day of month (1..=31) the occurrence falls on
    pub day_of_month: i32,
    /// Optional category applied to occurrences
    pub category_id: Option<i64>,
    /// Whether occurrences are income or expenses
    pub flow: FlowDirection,
}

fn validate(input: &RecurringRuleInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(Error::Config {
            message: "recurring rule name cannot be empty".to_string(),
        });
    }
    if !input.amount.is_finite() || input.amount <= 0.0 {
        return Err(Error::InvalidAmount {
            amount: input.amount,
        });
    }
    if !(1..=31).contains(&input.day_of_month) {
        return Err(Error::InvalidDay {
            day: input.day_of_month,
        });
    }
    Ok(())
}

/// Creates a recurring rule and materializes its first two occurrences.
///
/// The rule is persisted first, then the creation-path materializer runs for
/// the current and next month. Both steps are sequential store calls with no
/// wrapping transaction: a failure after the rule insert leaves the rule in
/// place with fewer than two occurrences, which a later edit reconciles.
pub async fn create_recurring_rule(
    db: &DatabaseConnection,
    user_id: &str,
    input: RecurringRuleInput,
    today: NaiveDate,
) -> Result<recurring_rule::Model> {
    validate(&input)?;

    let rule = recurring_rule::ActiveModel {
        user_id: Set(user_id.to_string()),
        name: Set(input.name.trim().to_string()),
        amount: Set(input.amount),
        day_of_month: Set(input.day_of_month),
        category_id: Set(input.category_id),
        flow: Set(input.flow),
        is_active: Set(true),
        ..Default::default()
    };
    let rule = rule.insert(db).await?;
    info!(user = user_id, rule = rule.id, "created recurring rule");

    materialize::materialize_rule(db, &RecurrenceRule::Named(rule.clone()), today).await?;

    Ok(rule)
}

/// Finds an active rule by id, scoped to its owner.
pub async fn get_recurring_rule(
    db: &DatabaseConnection,
    user_id: &str,
    rule_id: i64,
) -> Result<Option<recurring_rule::Model>> {
    RecurringRule::find_by_id(rule_id)
        .filter(recurring_rule::Column::UserId.eq(user_id))
        .filter(recurring_rule::Column::IsActive.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists a user's active rules, ordered alphabetically by name.
pub async fn list_recurring_rules(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<recurring_rule::Model>> {
    RecurringRule::find()
        .filter(recurring_rule::Column::UserId.eq(user_id))
        .filter(recurring_rule::Column::IsActive.eq(true))
        .order_by_asc(recurring_rule::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Edits a rule and reconciles its materialized occurrences.
///
/// The new field values are persisted first; reconciliation then runs
/// against the final persisted rule, updating the window months in place or
/// inserting any that were missing.
pub async fn update_recurring_rule(
    db: &DatabaseConnection,
    user_id: &str,
    rule_id: i64,
    input: RecurringRuleInput,
    today: NaiveDate,
) -> Result<recurring_rule::Model> {
    validate(&input)?;

    let rule = get_recurring_rule(db, user_id, rule_id)
        .await?
        .ok_or(Error::RuleNotFound { id: rule_id })?;

    let mut edited: recurring_rule::ActiveModel = rule.into();
    edited.name = Set(input.name.trim().to_string());
    edited.amount = Set(input.amount);
    edited.day_of_month = Set(input.day_of_month);
    edited.category_id = Set(input.category_id);
    edited.flow = Set(input.flow);
    let rule = edited.update(db).await?;
    info!(user = user_id, rule = rule.id, "updated recurring rule");

    materialize::reconcile_rule(db, &RecurrenceRule::Named(rule.clone()), today).await?;

    Ok(rule)
}

/// Flips a rule's active flag without touching the ledger.
///
/// Inactive rules disappear from listings and are no longer materialized,
/// but their rule row and all existing ledger entries stay as they are.
pub async fn set_recurring_rule_active(
    db: &DatabaseConnection,
    user_id: &str,
    rule_id: i64,
    active: bool,
) -> Result<recurring_rule::Model> {
    let rule = RecurringRule::find_by_id(rule_id)
        .filter(recurring_rule::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::RuleNotFound { id: rule_id })?;

    let mut edited: recurring_rule::ActiveModel = rule.into();
    edited.is_active = Set(active);
    edited.update(db).await.map_err(Into::into)
}

/// Deletes a rule along with its future materialized occurrences.
///
/// Occurrences dated before the current month's start are historical record
/// and are preserved (unlinked from the rule once its row is gone);
/// everything from the month containing `today` onward is removed, then the
/// rule row itself. Returns the number of removed ledger entries.
pub async fn delete_recurring_rule(
    db: &DatabaseConnection,
    user_id: &str,
    rule_id: i64,
    today: NaiveDate,
) -> Result<u64> {
    let rule = RecurringRule::find_by_id(rule_id)
        .filter(recurring_rule::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::RuleNotFound { id: rule_id })?;

    let removed =
        materialize::remove_future_occurrences(db, &RecurrenceRule::Named(rule.clone()), today)
            .await?;
    rule.delete(db).await?;
    info!(user = user_id, rule = rule_id, removed, "deleted recurring rule");

    Ok(removed)
}

/// Runs the creation-path materializer for every active rule of a user.
///
/// This is the catch-up hook for a new month: rules materialized last month
/// already have a current-month entry (last month's "next"), so only the
/// new trailing month is filled in. Returns the total number of entries
/// created.
pub async fn materialize_active_rules(
    db: &DatabaseConnection,
    user_id: &str,
    today: NaiveDate,
) -> Result<usize> {
    let mut created = 0;
    for rule in list_recurring_rules(db, user_id).await? {
        let outcomes =
            materialize::materialize_rule(db, &RecurrenceRule::Named(rule), today).await?;
        created += outcomes
            .iter()
            .filter(|outcome| matches!(outcome, MaterializeOutcome::Created))
            .count();
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    fn rent_input() -> RecurringRuleInput {
        RecurringRuleInput {
            name: "Rent".to_string(),
            amount: 1200.0,
            day_of_month: 10,
            category_id: None,
            flow: FlowDirection::Expense,
        }
    }

    #[tokio::test]
    async fn create_materializes_two_months() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;

        let rule =
            create_recurring_rule(&db, "user-a", rent_input(), date(2024, 2, 15)).await?;

        assert!(rule.is_active);
        let entries = all_transactions(&db, "user-a").await?;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].date, date(2024, 2, 10));
        assert_eq!(entries[1].date, date(2024, 3, 10));
        assert!(entries.iter().all(|e| e.recurring_rule_id == Some(rule.id)));

        Ok(())
    }

    #[tokio::test]
    async fn create_rejects_bad_input() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;
        let today = date(2024, 2, 15);

        let blank = RecurringRuleInput {
            name: "   ".to_string(),
            ..rent_input()
        };
        assert!(matches!(
            create_recurring_rule(&db, "user-a", blank, today).await,
            Err(Error::Config { .. })
        ));

        let negative = RecurringRuleInput {
            amount: -5.0,
            ..rent_input()
        };
        assert!(matches!(
            create_recurring_rule(&db, "user-a", negative, today).await,
            Err(Error::InvalidAmount { .. })
        ));

        let day_out_of_range = RecurringRuleInput {
            day_of_month: 32,
            ..rent_input()
        };
        assert!(matches!(
            create_recurring_rule(&db, "user-a", day_out_of_range, today).await,
            Err(Error::InvalidDay { day: 32 })
        ));

        // Nothing was persisted along the way
        assert!(all_transactions(&db, "user-a").await?.is_empty());
        assert!(list_recurring_rules(&db, "user-a").await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn update_reconciles_both_months() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;
        let today = date(2024, 2, 15);
        let rule = create_recurring_rule(&db, "user-a", rent_input(), today).await?;

        let edited = RecurringRuleInput {
            name: "Rent (new lease)".to_string(),
            amount: 1350.0,
            day_of_month: 5,
            ..rent_input()
        };
        update_recurring_rule(&db, "user-a", rule.id, edited, today).await?;

        let entries = all_transactions(&db, "user-a").await?;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].date, date(2024, 2, 5));
        assert_eq!(entries[1].date, date(2024, 3, 5));
        assert!(entries.iter().all(|e| e.amount == 1350.0));
        assert!(entries.iter().all(|e| e.description == "Rent (new lease)"));

        Ok(())
    }

    #[tokio::test]
    async fn update_is_owner_scoped() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;
        let today = date(2024, 2, 15);
        let rule = create_recurring_rule(&db, "user-a", rent_input(), today).await?;

        let result =
            update_recurring_rule(&db, "user-b", rule.id, rent_input(), today).await;
        assert!(matches!(result, Err(Error::RuleNotFound { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn delete_preserves_history_before_current_month() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;
        // Created mid-January: materializes January and February
        let rule =
            create_recurring_rule(&db, "user-a", rent_input(), date(2024, 1, 15)).await?;
        // A month later the window advanced: February is skipped, March created
        materialize_active_rules(&db, "user-a", date(2024, 2, 15)).await?;
        assert_eq!(all_transactions(&db, "user-a").await?.len(), 3);

        let removed = delete_recurring_rule(&db, "user-a", rule.id, date(2024, 2, 15)).await?;

        assert_eq!(removed, 2);
        let remaining = all_transactions(&db, "user-a").await?;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].date, date(2024, 1, 10));
        assert!(list_recurring_rules(&db, "user-a").await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn inactive_rules_are_hidden_and_not_materialized() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;
        let today = date(2024, 2, 15);
        let rule = create_recurring_rule(&db, "user-a", rent_input(), today).await?;

        set_recurring_rule_active(&db, "user-a", rule.id, false).await?;

        assert!(list_recurring_rules(&db, "user-a").await?.is_empty());
        assert!(get_recurring_rule(&db, "user-a", rule.id).await?.is_none());
        // Existing entries stay; the next month's catch-up skips the rule
        assert_eq!(all_transactions(&db, "user-a").await?.len(), 2);
        let created = materialize_active_rules(&db, "user-a", date(2024, 3, 15)).await?;
        assert_eq!(created, 0);
        assert_eq!(all_transactions(&db, "user-a").await?.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn monthly_catchup_fills_only_the_new_month() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;
        create_recurring_rule(&db, "user-a", rent_input(), date(2024, 1, 15)).await?;

        let created = materialize_active_rules(&db, "user-a", date(2024, 2, 15)).await?;

        // February already existed from January's window; only March is new
        assert_eq!(created, 1);
        let entries = all_transactions(&db, "user-a").await?;
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2].date, date(2024, 3, 10));

        Ok(())
    }

    #[tokio::test]
    async fn listing_orders_by_name() -> crate::errors::Result<()> {
        let db = setup_test_db().await?;
        let today = date(2024, 2, 15);
        for name in ["Water", "Electricity", "Internet"] {
            let input = RecurringRuleInput {
                name: name.to_string(),
                ..rent_input()
            };
            create_recurring_rule(&db, "user-a", input, today).await?;
        }

        let names: Vec<String> = list_recurring_rules(&db, "user-a")
            .await?
            .into_iter()
            .map(|rule| rule.name)
            .collect();
        assert_eq!(names, vec!["Electricity", "Internet", "Water"]);

        Ok(())
    }
}
