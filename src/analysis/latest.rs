use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::grouping::group_all_by_period;
use super::periods::{add_interval, days_between, period_key, PeriodUnit};
use crate::db::models::Habit;
use crate::log_debug;

const ENABLE_LOGS: bool = true;

/// The most recent run of activity, classified relative to "today".
///
/// Unlike [`super::streaks::compute_all_streaks`] this reports a lone period
/// too (length 1). A habit that was never performed yields the empty record:
/// length 0 and every other field `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LatestStreak {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub length: u32,
    pub unit: PeriodUnit,
    /// Today falls inside the streak's last period or the one right after it.
    pub is_current: Option<bool>,
    /// Today is the period right after the streak, so performing now extends it.
    pub can_extend_today: Option<bool>,
}

impl LatestStreak {
    pub fn none(unit: PeriodUnit) -> Self {
        Self {
            start: None,
            end: None,
            length: 0,
            unit,
            is_current: None,
            can_extend_today: None,
        }
    }
}

pub fn compute_latest_streak(habit: &Habit, today: NaiveDateTime) -> LatestStreak {
    let recurrence = habit.recurrence;
    let groups = group_all_by_period(&habit.activities, recurrence);

    // Most recent period first.
    let periods: Vec<NaiveDate> = groups.periods().rev().collect();
    let Some(&most_recent) = periods.first() else {
        return LatestStreak::none(recurrence.unit());
    };

    let streak_start = walk_back(&periods, recurrence.interval_days());

    let Some((start, end, length)) = groups.span(streak_start, most_recent) else {
        return LatestStreak::none(recurrence.unit());
    };

    let today_period = period_key(today, recurrence);
    let can_extend_today = today_period == add_interval(most_recent, recurrence, 1);
    let is_current = today_period == most_recent || can_extend_today;

    log_debug!(
        "[latest_streak] habit_id={} length={} is_current={} can_extend_today={}",
        habit.id,
        length,
        is_current,
        can_extend_today
    );

    LatestStreak {
        start: Some(start),
        end: Some(end),
        length,
        unit: recurrence.unit(),
        is_current: Some(is_current),
        can_extend_today: Some(can_extend_today),
    }
}

/// Given active periods newest first, find the oldest period still chained to
/// the newest one by exact `interval` steps.
fn walk_back(periods: &[NaiveDate], interval: i64) -> NaiveDate {
    let streak_end = periods[0];
    let mut streak_length: i64 = 1;

    for (idx, &period) in periods.iter().enumerate().skip(1) {
        if days_between(period, streak_end) == interval * streak_length {
            streak_length += 1;
        } else {
            return periods[idx - 1];
        }
    }

    periods[periods.len() - 1]
}
