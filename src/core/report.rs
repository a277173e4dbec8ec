//! Monthly summary reporting.
//!
//! Aggregates one month of a user's ledger into the totals the dashboard
//! shows: income, expenses, and the net between them. Materialized entries
//! count the same as ad-hoc ones - by the time they are summed, they are
//! just ledger rows.

use crate::{
    core::calendar::MonthSpan,
    entities::{FlowDirection, Transaction, transaction},
    errors::Result,
};
use sea_orm::prelude::*;

/// Totals for one user over one calendar month.
#[derive(Debug, Clone)]
pub struct MonthlySummary {
    /// The month summarized
    pub span: MonthSpan,
    /// Sum of all income entries
    pub income_total: f64,
    /// Sum of all expense entries
    pub expense_total: f64,
    /// Income minus expenses
    pub net: f64,
    /// Number of ledger entries in the month
    pub transaction_count: usize,
}

/// Sums a user's ledger entries within one month.
pub async fn monthly_summary(
    db: &DatabaseConnection,
    user_id: &str,
    span: MonthSpan,
) -> Result<MonthlySummary> {
    let entries = Transaction::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .filter(transaction::Column::Date.gte(span.start))
        .filter(transaction::Column::Date.lte(span.end))
        .all(db)
        .await?;

    let mut income_total = 0.0;
    let mut expense_total = 0.0;
    for entry in &entries {
        match entry.flow {
            FlowDirection::Income => income_total += entry.amount,
            FlowDirection::Expense => expense_total += entry.amount,
        }
    }

    Ok(MonthlySummary {
        span,
        income_total,
        expense_total,
        net: income_total - expense_total,
        transaction_count: entries.len(),
    })
}

/// Formats an amount with its flow sign, e.g. `"+$5000.00"` or `"-$72.50"`.
#[must_use]
pub fn format_signed_amount(flow: FlowDirection, amount: f64) -> String {
    match flow {
        FlowDirection::Income => format!("+${amount:.2}"),
        FlowDirection::Expense => format!("-${amount:.2}"),
    }
}
