//! Month spans and "today" resolution in the fixed reference timezone.
//!
//! Every date-window computation in the crate is anchored to a single fixed
//! UTC offset rather than the host machine's local timezone, so that "which
//! month is it" has one answer no matter where the process runs. Dates are
//! plain `NaiveDate`s once resolved; time-of-day never crosses the store
//! boundary.

use chrono::{Datelike, FixedOffset, Months, NaiveDate, Utc};

/// Offset of the reference timezone from UTC, in seconds (UTC-4).
const REFERENCE_OFFSET_SECS: i32 = -4 * 3600;

/// Returns the current calendar date in the reference timezone.
///
/// Lifecycle operations take the resulting date as an explicit parameter
/// rather than calling this internally, so one logical operation resolves
/// "today" exactly once.
#[must_use]
pub fn today() -> NaiveDate {
    let offset = FixedOffset::east_opt(REFERENCE_OFFSET_SECS).expect("offset within a day");
    Utc::now().with_timezone(&offset).date_naive()
}

/// One calendar month as an inclusive `[start, end]` date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSpan {
    /// First day of the month
    pub start: NaiveDate,
    /// Last day of the month
    pub end: NaiveDate,
}

impl MonthSpan {
    /// The span of the month containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        let start =
            NaiveDate::from_ymd_opt(date.year(), date.month(), 1).expect("month has a first day");
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|first_of_next| first_of_next.pred_opt())
            .expect("date within chrono range");
        Self { start, end }
    }

    /// The span of the month immediately after this one.
    #[must_use]
    pub fn next(&self) -> Self {
        let first_of_next = self
            .start
            .checked_add_months(Months::new(1))
            .expect("date within chrono range");
        Self::containing(first_of_next)
    }

    /// Calendar year of this month.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.start.year()
    }

    /// Calendar month, 1 = January.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.start.month()
    }

    /// Number of days in this month.
    #[must_use]
    pub fn last_day(&self) -> u32 {
        self.end.day()
    }

    /// The date of `day` within this month, clamped to the month's last day.
    ///
    /// This is the short-month policy for day-of-month rules: day 31 in a
    /// 30-day month lands on day 30, never rolling into the next month.
    #[must_use]
    pub fn clamp_day(&self, day: u32) -> NaiveDate {
        let day = day.min(self.last_day());
        NaiveDate::from_ymd_opt(self.year(), self.month(), day.max(1))
            .expect("clamped day is valid")
    }

    /// Whether `date` falls inside this span.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The ordered pair of target months for materialization: the month
/// containing `today`, then the month after it.
#[must_use]
pub fn month_window(today: NaiveDate) -> [MonthSpan; 2] {
    let current = MonthSpan::containing(today);
    let next = current.next();
    [current, next]
}
