use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::error::AnalysisError;
use super::grouping::{group_all_by_period, PeriodGroups};
use super::periods::{days_between, PeriodUnit};
use crate::db::models::Habit;
use crate::log_debug;

const ENABLE_LOGS: bool = true;

/// A run of two or more consecutive active periods.
///
/// `start` and `end` are the first and last real performances of the run,
/// not the zeroed period boundaries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub length: u32,
    pub unit: PeriodUnit,
}

/// What to order a streak list by.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StreakSort {
    /// By start timestamp.
    #[default]
    Date,
    Length,
}

impl FromStr for StreakSort {
    type Err = AnalysisError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "date" => Ok(StreakSort::Date),
            "length" => Ok(StreakSort::Length),
            other => Err(AnalysisError::UnknownSortKey(other.to_string())),
        }
    }
}

impl fmt::Display for StreakSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StreakSort::Date => "date",
            StreakSort::Length => "length",
        })
    }
}

/// Sort direction. Defaults to descending so the most recent (or longest)
/// entry comes first.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = AnalysisError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(AnalysisError::UnknownSortOrder(other.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        })
    }
}

/// Every historical streak of a habit, ordered as requested.
///
/// A single active period on its own is not a streak, so habits with fewer
/// than two active periods always yield an empty list. The defaults
/// (`StreakSort::Date`, `SortOrder::Desc`) put the most recent streak first.
pub fn compute_all_streaks(habit: &Habit, sort_by: StreakSort, order: SortOrder) -> Vec<Streak> {
    let groups = group_all_by_period(&habit.activities, habit.recurrence);

    let mut streaks: Vec<Streak> = find_runs(&groups)
        .into_iter()
        .filter_map(|(first, last)| {
            let (start, end, length) = groups.span(first, last)?;
            Some(Streak {
                start,
                end,
                length,
                unit: habit.recurrence.unit(),
            })
        })
        .collect();

    streaks.sort_by(|a, b| {
        let ordering = match sort_by {
            StreakSort::Date => a.start.cmp(&b.start),
            StreakSort::Length => a.length.cmp(&b.length),
        };
        order.apply(ordering)
    });

    log_debug!(
        "[streaks] habit_id={} active_periods={} streaks={}",
        habit.id,
        groups.len(),
        streaks.len()
    );

    streaks
}

/// Walk the active periods oldest first and return `(first, last)` period
/// keys of every run spanning more than one period.
///
/// The offset from the run's first period to the next key must equal
/// `length * interval` for the run to continue; otherwise the run closes at
/// the current key and the next key becomes a fresh candidate.
fn find_runs(groups: &PeriodGroups<'_>) -> Vec<(NaiveDate, NaiveDate)> {
    let interval = groups.recurrence().interval_days();
    let periods: Vec<NaiveDate> = groups.periods().collect();

    let mut runs = Vec::new();
    let mut run_start: Option<NaiveDate> = None;
    let mut run_length: i64 = 0;

    for (idx, &current) in periods.iter().enumerate() {
        let Some(&next) = periods.get(idx + 1) else {
            if let Some(first) = run_start {
                if run_length > 1 {
                    runs.push((first, current));
                }
            }
            break;
        };

        let first = match run_start {
            Some(first) => first,
            None => {
                run_start = Some(current);
                run_length = 1;
                current
            }
        };

        if days_between(first, next) == run_length * interval {
            run_length += 1;
        } else {
            if run_length > 1 {
                runs.push((first, current));
            }
            run_start = None;
            run_length = 0;
        }
    }

    runs
}
