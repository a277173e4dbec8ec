//! Recurrence materialization - projecting rules into dated ledger entries.
//!
//! A recurring rule only becomes visible on the dashboard once it has been
//! turned into concrete transactions. This module does that projection for
//! the two-month target window (current and next month): it resolves each
//! month's occurrence date, probes the store for an entry already linked to
//! the rule in that month, and then creates, overwrites, or skips. Every
//! probe re-reads the store rather than trusting any cached state, so the
//! projection is idempotent under repeated calls; two racing callers can
//! still both observe "missing" and double-insert, which is accepted here
//! and left to the storage layer to constrain if needed.

use crate::{
    core::{
        business_day::nth_business_day,
        calendar::{MonthSpan, month_window},
    },
    entities::{FlowDirection, Transaction, recurring_rule, transaction},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::{Set, prelude::*};
use tracing::debug;

/// Description copied onto every materialized salary entry.
pub const SALARY_DESCRIPTION: &str = "Salary";

/// A recurring obligation in the form the materializer consumes.
///
/// The two variants resolve their occurrence dates differently: named rules
/// use a clamped day-of-month, the salary rule uses a business-day ordinal.
/// Matching is exhaustive everywhere so a new variant cannot silently skip
/// one of the decision paths.
#[derive(Debug, Clone)]
pub enum RecurrenceRule {
    /// The per-user salary rule, carried on the profile
    Salary {
        /// Owning user
        user_id: String,
        /// Payout amount
        amount: f64,
        /// Which business day of the month the payout lands on
        business_day: u32,
    },
    /// A named recurring bill or income
    Named(recurring_rule::Model),
}

impl RecurrenceRule {
    /// The owning user id; all probes and writes are scoped by it.
    #[must_use]
    pub fn user_id(&self) -> &str {
        match self {
            Self::Salary { user_id, .. } => user_id,
            Self::Named(rule) => &rule.user_id,
        }
    }

    /// Resolves the concrete occurrence date for one target month.
    ///
    /// Named rules clamp their day-of-month to the month's last day. Salary
    /// dates come from the business-day walk and may land past the span's
    /// end when the ordinal exceeds the month's business days; that overflow
    /// is accepted, not corrected.
    #[must_use]
    pub fn occurrence_date(&self, span: &MonthSpan) -> NaiveDate {
        match self {
            Self::Salary { business_day, .. } => {
                nth_business_day(span.year(), span.month(), *business_day)
            }
            Self::Named(rule) => {
                // Cast safety: day_of_month is validated to 1..=31 at rule creation.
                #[allow(clippy::cast_sign_loss)]
                let day = rule.day_of_month.max(1) as u32;
                span.clamp_day(day)
            }
        }
    }

    /// Builds the insertable draft for an occurrence on `date`.
    fn draft(&self, date: NaiveDate) -> transaction::ActiveModel {
        match self {
            Self::Salary {
                user_id, amount, ..
            } => transaction::ActiveModel {
                user_id: Set(user_id.clone()),
                flow: Set(FlowDirection::Income),
                amount: Set(*amount),
                description: Set(SALARY_DESCRIPTION.to_string()),
                date: Set(date),
                category_id: Set(None),
                recurring_rule_id: Set(None),
                is_salary: Set(true),
                ..Default::default()
            },
            Self::Named(rule) => transaction::ActiveModel {
                user_id: Set(rule.user_id.clone()),
                flow: Set(rule.flow),
                amount: Set(rule.amount),
                description: Set(rule.name.clone()),
                date: Set(date),
                category_id: Set(rule.category_id),
                recurring_rule_id: Set(Some(rule.id)),
                is_salary: Set(false),
                ..Default::default()
            },
        }
    }
}

/// Decision made for one (rule, month) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterializeOutcome {
    /// A new ledger entry was inserted for the month
    Created,
    /// An existing entry was overwritten with the rule's current values
    Updated,
    /// An entry already existed; the creation path never overwrites
    Skipped,
}

/// Finds the ledger entry already materialized for this rule in this month,
/// if any. Salary entries are keyed by the `is_salary` flag, named rules by
/// their rule id; both are additionally scoped to the owner and the month's
/// inclusive date range.
async fn find_occurrence(
    db: &DatabaseConnection,
    rule: &RecurrenceRule,
    span: &MonthSpan,
) -> Result<Option<transaction::Model>> {
    let query = Transaction::find()
        .filter(transaction::Column::UserId.eq(rule.user_id()))
        .filter(transaction::Column::Date.gte(span.start))
        .filter(transaction::Column::Date.lte(span.end));

    let query = match rule {
        RecurrenceRule::Salary { .. } => {
            query.filter(transaction::Column::IsSalary.eq(true))
        }
        RecurrenceRule::Named(named) => {
            query.filter(transaction::Column::RecurringRuleId.eq(named.id))
        }
    };

    query.one(db).await.map_err(Into::into)
}

/// Creation path: materializes the rule into the two-month window without
/// ever overwriting existing entries.
///
/// Months that already have an entry are skipped; the remaining drafts are
/// inserted in a single batch. Calling this twice in a row therefore leaves
/// exactly one entry per month. Returns one outcome per window month, in
/// window order.
pub async fn materialize_rule(
    db: &DatabaseConnection,
    rule: &RecurrenceRule,
    today: NaiveDate,
) -> Result<Vec<MaterializeOutcome>> {
    let mut drafts = Vec::new();
    let mut outcomes = Vec::new();

    for span in month_window(today) {
        if find_occurrence(db, rule, &span).await?.is_some() {
            outcomes.push(MaterializeOutcome::Skipped);
        } else {
            let date = rule.occurrence_date(&span);
            debug!(user = rule.user_id(), %date, "materializing occurrence");
            drafts.push(rule.draft(date));
            outcomes.push(MaterializeOutcome::Created);
        }
    }

    if !drafts.is_empty() {
        Transaction::insert_many(drafts).exec(db).await?;
    }

    Ok(outcomes)
}

/// Update path: reconciles the two-month window against the rule's current
/// values.
///
/// Months with an existing entry get it overwritten in place (amount,
/// description, category, flow, and date for named rules; amount and date
/// for salary); months without one get a fresh insert, which covers rules
/// whose earlier materialization never happened. Returns one outcome per
/// window month, in window order.
pub async fn reconcile_rule(
    db: &DatabaseConnection,
    rule: &RecurrenceRule,
    today: NaiveDate,
) -> Result<Vec<MaterializeOutcome>> {
    let mut outcomes = Vec::new();

    for span in month_window(today) {
        let date = rule.occurrence_date(&span);

        match find_occurrence(db, rule, &span).await? {
            Some(existing) => {
                let mut entry: transaction::ActiveModel = existing.into();
                match rule {
                    RecurrenceRule::Salary { amount, .. } => {
                        entry.amount = Set(*amount);
                        entry.date = Set(date);
                    }
                    RecurrenceRule::Named(named) => {
                        entry.amount = Set(named.amount);
                        entry.description = Set(named.name.clone());
                        entry.category_id = Set(named.category_id);
                        entry.flow = Set(named.flow);
                        entry.date = Set(date);
                    }
                }
                entry.update(db).await?;
                outcomes.push(MaterializeOutcome::Updated);
            }
            None => {
                rule.draft(date).insert(db).await?;
                outcomes.push(MaterializeOutcome::Created);
            }
        }
    }

    Ok(outcomes)
}

/// Deletes every materialized occurrence of the rule dated on or after the
/// first day of the month containing `today`. Entries in strictly earlier
/// months are historical record and stay untouched. Returns the number of
/// removed entries.
pub async fn remove_future_occurrences(
    db: &DatabaseConnection,
    rule: &RecurrenceRule,
    today: NaiveDate,
) -> Result<u64> {
    let month_start = MonthSpan::containing(today).start;

    let delete = Transaction::delete_many()
        .filter(transaction::Column::UserId.eq(rule.user_id()))
        .filter(transaction::Column::Date.gte(month_start));

    let delete = match rule {
        RecurrenceRule::Salary { .. } => {
            delete.filter(transaction::Column::IsSalary.eq(true))
        }
        RecurrenceRule::Named(named) => {
            delete.filter(transaction::Column::RecurringRuleId.eq(named.id))
        }
    };

    let result = delete.exec(db).await?;
    Ok(result.rows_affected)
}
