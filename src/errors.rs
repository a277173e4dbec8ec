//! Unified error types and result handling.
//!
//! Storage failures are wrapped, never retried or masked: a failed read or
//! write from any core operation surfaces to the caller as [`Error::Database`]
//! with the underlying `DbErr` intact.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration or input that has no more specific variant
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable description of what was wrong
        message: String,
    },

    /// A monetary amount was zero, negative, or not finite
    #[error("invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A day-of-month or business-day ordinal outside 1..=31
    #[error("invalid day ordinal: {day} (expected 1..=31)")]
    InvalidDay {
        /// The rejected ordinal
        day: i32,
    },

    /// No recurring rule with this id belongs to the requesting user
    #[error("recurring rule {id} not found")]
    RuleNotFound {
        /// The rule id that failed to resolve
        id: i64,
    },

    /// No profile row exists for this user
    #[error("profile not found for user {user_id}")]
    ProfileNotFound {
        /// The owning user id
        user_id: String,
    },

    /// No ledger transaction with this id belongs to the requesting user
    #[error("transaction {id} not found")]
    TransactionNotFound {
        /// The transaction id that failed to resolve
        id: i64,
    },

    /// No category with this id belongs to the requesting user
    #[error("category {id} not found")]
    CategoryNotFound {
        /// The category id that failed to resolve
        id: i64,
    },

    /// Any read/write failure from the record store, propagated unmodified
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
