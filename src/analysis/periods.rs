//! Calendar arithmetic shared by the grouping, streak and completion code.
//!
//! Inputs are already-localized naive timestamps. A day runs midnight to
//! midnight and a week runs Monday to Sunday.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::db::models::Recurrence;

/// Unit a streak length is measured in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PeriodUnit {
    Days,
    Weeks,
}

/// Whole calendar days from `start` to `end`, ignoring time of day.
pub fn count_days_exclusive(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    days_between(start.date(), end.date())
}

/// Same as [`count_days_exclusive`] but counts `end`'s day too.
/// `2023-12-25 12:00` to `2024-01-12 08:12` is 19.
pub fn count_days_inclusive(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    count_days_exclusive(start, end) + 1
}

/// Number of Monday-to-Sunday weeks the range `[a, b]` touches.
/// A Wednesday and the Monday twelve days later span three weeks.
pub fn count_weeks_spanned(a: NaiveDateTime, b: NaiveDateTime) -> i64 {
    let days = days_between(week_start(a.date()), week_start(b.date()));
    days.div_euclid(7) + 1
}

/// The Monday that begins the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Move `date` by `n` periods of the given recurrence. `n` may be negative.
pub fn add_interval(date: NaiveDate, recurrence: Recurrence, n: i64) -> NaiveDate {
    date + Duration::days(recurrence.interval_days() * n)
}

/// Key of the period a timestamp falls in: its date for daily habits, the
/// Monday of its week for weekly ones.
pub fn period_key(at: NaiveDateTime, recurrence: Recurrence) -> NaiveDate {
    match recurrence {
        Recurrence::Daily => at.date(),
        Recurrence::Weekly => week_start(at.date()),
    }
}

/// Periods spanned by `[start, end]`, inclusive of both ends.
pub fn count_periods(start: NaiveDateTime, end: NaiveDateTime, recurrence: Recurrence) -> i64 {
    match recurrence {
        Recurrence::Daily => count_days_inclusive(start, end),
        Recurrence::Weekly => count_weeks_spanned(start, end),
    }
}

pub(crate) fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}
