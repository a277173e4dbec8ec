//! Salary configuration and payout scheduling.
//!
//! The salary rule lives on the user's profile row (one profile per user is
//! what bounds it to one salary rule per user) and pays out on the Nth
//! business day of each month. Configuring it materializes the two-month
//! window of payout entries; editing reconciles them; clearing removes the
//! future ones, keeping months already in the past.

use crate::{
    core::{
        business_day,
        materialize::{self, RecurrenceRule},
    },
    entities::{Profile, profile},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{Set, prelude::*};
use tracing::info;

/// Finds a user's profile.
pub async fn get_profile(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Option<profile::Model>> {
    Profile::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Finds a user's profile, creating an empty one (no salary configured) on
/// first access.
pub async fn ensure_profile(
    db: &DatabaseConnection,
    user_id: &str,
    name: &str,
) -> Result<profile::Model> {
    if let Some(existing) = get_profile(db, user_id).await? {
        return Ok(existing);
    }

    let created = profile::ActiveModel {
        user_id: Set(user_id.to_string()),
        name: Set(name.to_string()),
        salary_amount: Set(None),
        salary_business_day: Set(None),
    }
    .insert(db)
    .await?;
    info!(user = user_id, "created profile");
    Ok(created)
}

/// The profile's salary configuration as (amount, business-day ordinal), or
/// None when unset. An amount of zero or less, or an ordinal below one,
/// counts as unset.
fn configured_salary(profile: &profile::Model) -> Option<(f64, u32)> {
    match (profile.salary_amount, profile.salary_business_day) {
        (Some(amount), Some(day)) if amount > 0.0 && day >= 1 => {
            Some((amount, day.unsigned_abs()))
        }
        _ => None,
    }
}

/// The profile's salary rule in materializer form, or None when unset.
#[must_use]
pub fn salary_rule(profile: &profile::Model) -> Option<RecurrenceRule> {
    configured_salary(profile).map(|(amount, business_day)| RecurrenceRule::Salary {
        user_id: profile.user_id.clone(),
        amount,
        business_day,
    })
}

/// The next upcoming payout date, or None when no salary is configured.
///
/// A payout landing on `today` counts as already paid, so the projection
/// moves to the following month in that case.
#[must_use]
pub fn projected_salary_date(profile: &profile::Model, today: NaiveDate) -> Option<NaiveDate> {
    configured_salary(profile)
        .map(|(_, business_day)| business_day::next_salary_date(business_day, today))
}

/// Sets or changes the salary configuration and brings the ledger in step.
///
/// The profile is persisted first. If no salary was configured before, the
/// creation-path materializer fills the two-month window; otherwise the
/// update path reconciles existing payout entries (amount and date) in
/// place, inserting any month that was missing.
pub async fn set_salary(
    db: &DatabaseConnection,
    user_id: &str,
    amount: f64,
    business_day: i32,
    today: NaiveDate,
) -> Result<profile::Model> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    if !(1..=31).contains(&business_day) {
        return Err(Error::InvalidDay { day: business_day });
    }

    let existing = get_profile(db, user_id)
        .await?
        .ok_or_else(|| Error::ProfileNotFound {
            user_id: user_id.to_string(),
        })?;
    let had_salary = configured_salary(&existing).is_some();

    let mut edited: profile::ActiveModel = existing.into();
    edited.salary_amount = Set(Some(amount));
    edited.salary_business_day = Set(Some(business_day));
    let updated = edited.update(db).await?;
    info!(user = user_id, business_day, "salary configured");

    let rule = RecurrenceRule::Salary {
        user_id: user_id.to_string(),
        amount,
        business_day: business_day.unsigned_abs(),
    };
    if had_salary {
        materialize::reconcile_rule(db, &rule, today).await?;
    } else {
        materialize::materialize_rule(db, &rule, today).await?;
    }

    Ok(updated)
}

/// Unsets the salary configuration and deletes future payout entries.
///
/// Payouts dated before the current month's start are historical record and
/// stay. Returns the number of removed entries. Clearing an already-unset
/// salary is a no-op.
pub async fn clear_salary(
    db: &DatabaseConnection,
    user_id: &str,
    today: NaiveDate,
) -> Result<u64> {
    let existing = get_profile(db, user_id)
        .await?
        .ok_or_else(|| Error::ProfileNotFound {
            user_id: user_id.to_string(),
        })?;

    let Some(rule) = salary_rule(&existing) else {
        return Ok(0);
    };

    let removed = materialize::remove_future_occurrences(db, &rule, today).await?;

    let mut edited: profile::ActiveModel = existing.into();
    edited.salary_amount = Set(None);
    edited.salary_business_day = Set(None);
    edited.update(db).await?;
    info!(user = user_id, removed, "salary cleared");

    Ok(removed)
}
