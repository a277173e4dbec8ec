//! Core business logic - framework-agnostic finance operations.
//!
//! The modules here split along the dashboard's seams: pure date arithmetic
//! ([`business_day`], [`calendar`]), the recurrence materializer that turns
//! rules into dated ledger entries ([`materialize`]), lifecycle orchestration
//! for named rules and the salary rule ([`recurring`], [`salary`]), plus the
//! ad-hoc ledger, categories, and monthly reporting.

/// Business-day arithmetic for salary scheduling
pub mod business_day;
/// Month spans and "today" resolution in the fixed reference timezone
pub mod calendar;
/// Category management
pub mod category;
/// Recurrence materialization - projecting rules into ledger entries
pub mod materialize;
/// Lifecycle of named recurring rules
pub mod recurring;
/// Monthly summary reporting
pub mod report;
/// Salary configuration and payout scheduling
pub mod salary;
/// Ad-hoc ledger transactions
pub mod transaction;
