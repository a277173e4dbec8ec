//! Business-day arithmetic for salary scheduling.
//!
//! Salaries are paid on the Nth business day of each month, where a business
//! day is Monday through Friday; no holiday calendar is considered. The
//! calculator walks forward from the first of the month counting weekdays,
//! which means an ordinal larger than the month's business-day count walks
//! into the following month rather than clamping. That is defined behavior
//! relied on elsewhere, not an error case.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::core::calendar::MonthSpan;

/// Returns true for Monday through Friday.
#[must_use]
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Computes the date of the `n`th business day of the given month.
///
/// Walks forward one day at a time from the first of the month, counting
/// days that are not Saturday or Sunday, and returns the date on which the
/// running count first reaches `n`. There is no upper bound check: the walk
/// continues into following months when `n` exceeds the month's business
/// days. `n = 0` degenerates to the first of the month; callers validate
/// ordinals to 1..=31 before they get here.
///
/// # Arguments
/// * `year` - Calendar year
/// * `month` - Calendar month, 1 = January
/// * `n` - Business-day ordinal (1 = first business day)
#[must_use]
pub fn nth_business_day(year: i32, month: u32, n: u32) -> NaiveDate {
    let mut date = NaiveDate::from_ymd_opt(year, month, 1).expect("month has a first day");
    let mut seen = 0;

    while seen < n {
        if is_business_day(date) {
            seen += 1;
            if seen == n {
                break;
            }
        }
        date = date.succ_opt().expect("date within chrono range");
    }

    date
}

/// Computes the next upcoming salary date from a business-day ordinal.
///
/// Tries the month containing `today` first; if that payout date is not
/// strictly after `today` (a payout landing on `today` counts as already
/// paid), the following month's payout date is returned instead, rolling
/// over the year at December.
#[must_use]
pub fn next_salary_date(business_day: u32, today: NaiveDate) -> NaiveDate {
    let candidate = nth_business_day(today.year(), today.month(), business_day);
    if candidate > today {
        return candidate;
    }

    let next = MonthSpan::containing(today).next();
    nth_business_day(next.year(), next.month(), business_day)
}
