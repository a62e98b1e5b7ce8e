//! Elapsed-month arithmetic for contract duration limits.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// How whole months between two dates are counted.
///
/// Which rule legal limits should use is unresolved, so both are available
/// and the validator only ever calls [`DurationPolicy::elapsed_months`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationPolicy {
    /// Elapsed days divided by 30, rounded down. An approximation that
    /// drifts near month boundaries: 2024-01-31 to 2024-03-01 counts as one
    /// month.
    #[default]
    ThirtyDayMonths,
    /// Whole calendar months: one month has elapsed once the same day of
    /// the next month is reached, clamped to the last day of short months.
    CalendarMonths,
}

impl DurationPolicy {
    /// Whole months from `start` to `end`. Negative when `end` precedes
    /// `start`.
    #[must_use]
    pub fn elapsed_months(self, start: NaiveDate, end: NaiveDate) -> i64 {
        match self {
            Self::ThirtyDayMonths => thirty_day_months(start, end),
            Self::CalendarMonths => calendar_months(start, end),
        }
    }
}

/// Days between the dates divided by 30, truncated toward zero.
#[must_use]
pub fn thirty_day_months(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() / 30
}

/// Whole calendar months between the dates.
#[must_use]
pub fn calendar_months(start: NaiveDate, end: NaiveDate) -> i64 {
    if end < start {
        return -calendar_months(end, start);
    }

    let mut months = i64::from(end.year() - start.year()) * 12 + i64::from(end.month())
        - i64::from(start.month());

    // Back off while adding `months` to start overshoots end.
    while months > 0 && add_months(start, months).map_or(true, |d| d > end) {
        months -= 1;
    }
    months
}

fn add_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let months = u32::try_from(months).ok()?;
    date.checked_add_months(Months::new(months))
}
