use std::collections::btree_map::{self, BTreeMap};

use chrono::{NaiveDate, NaiveDateTime};

use super::error::{validate_range, AnalysisError};
use super::periods::{count_periods, period_key};
use crate::db::models::{Activity, Recurrence};

/// Activities bucketed by the period they were performed in.
///
/// Sparse: a period only appears if at least one activity fell inside it.
/// Keys iterate in ascending date order.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodGroups<'a> {
    recurrence: Recurrence,
    groups: BTreeMap<NaiveDate, Vec<&'a Activity>>,
}

impl<'a> PeriodGroups<'a> {
    pub fn recurrence(&self) -> Recurrence {
        self.recurrence
    }

    /// Number of distinct active periods.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Active period keys, oldest first.
    pub fn periods(&self) -> impl DoubleEndedIterator<Item = NaiveDate> + '_ {
        self.groups.keys().copied()
    }

    pub fn activities(&self, period: NaiveDate) -> &[&'a Activity] {
        self.groups.get(&period).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> btree_map::Iter<'_, NaiveDate, Vec<&'a Activity>> {
        self.groups.iter()
    }

    /// Earliest performance inside `period`.
    pub fn first_performed(&self, period: NaiveDate) -> Option<NaiveDateTime> {
        self.activities(period)
            .iter()
            .map(|activity| activity.performed_at)
            .min()
    }

    /// Latest performance inside `period`.
    pub fn last_performed(&self, period: NaiveDate) -> Option<NaiveDateTime> {
        self.activities(period)
            .iter()
            .map(|activity| activity.performed_at)
            .max()
    }

    /// Accurate bounds of a run of periods: the first activity of `first` and
    /// the last activity of `last`, plus the number of periods between them
    /// counted on the calendar.
    pub fn span(&self, first: NaiveDate, last: NaiveDate) -> Option<(NaiveDateTime, NaiveDateTime, u32)> {
        let start = self.first_performed(first)?;
        let end = self.last_performed(last)?;
        let length = count_periods(start, end, self.recurrence).max(0);
        Some((start, end, u32::try_from(length).unwrap_or(u32::MAX)))
    }
}

/// Group activities by the day or week they were performed in, optionally
/// keeping only those inside `[start, end]` (both bounds inclusive, either may
/// be omitted).
pub fn group_by_period<'a>(
    activities: &'a [Activity],
    recurrence: Recurrence,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> Result<PeriodGroups<'a>, AnalysisError> {
    validate_range(start, end)?;

    let in_window = activities.iter().filter(|activity| {
        let at = activity.performed_at;
        !(start.is_some_and(|start| at < start) || end.is_some_and(|end| at > end))
    });
    Ok(collect_groups(in_window, recurrence))
}

/// Unbounded grouping; cannot fail.
pub fn group_all_by_period(activities: &[Activity], recurrence: Recurrence) -> PeriodGroups<'_> {
    collect_groups(activities.iter(), recurrence)
}

fn collect_groups<'a>(
    activities: impl Iterator<Item = &'a Activity>,
    recurrence: Recurrence,
) -> PeriodGroups<'a> {
    let mut groups: BTreeMap<NaiveDate, Vec<&'a Activity>> = BTreeMap::new();
    for activity in activities {
        groups
            .entry(period_key(activity.performed_at, recurrence))
            .or_default()
            .push(activity);
    }
    PeriodGroups { recurrence, groups }
}
