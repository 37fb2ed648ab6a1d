//! All-habits statistics table and preset date windows.

mod ranges;
mod types;

pub use ranges::DateRange;
pub use types::{HabitOverview, OverviewField};

use chrono::NaiveDateTime;

use crate::analysis::{compute_completion_rate, compute_latest_streak, AnalysisError, SortOrder};
use crate::db::models::{Habit, Recurrence};

/// Summarise every habit relative to `today`: periods performed so far,
/// completion since creation and the length of the latest streak.
pub fn build_overview(
    habits: &[Habit],
    today: NaiveDateTime,
) -> Result<Vec<HabitOverview>, AnalysisError> {
    habits
        .iter()
        .map(|habit| {
            let performed = habit.count_completed_periods(None, Some(today))?;
            let completion = compute_completion_rate(habit, None, Some(today), today)?;
            let latest = compute_latest_streak(habit, today);

            Ok(HabitOverview {
                id: habit.id.clone(),
                title: habit.title.clone(),
                created_at: habit.created_at,
                recurrence: habit.recurrence,
                last_performed: habit.date_last_performed(),
                num_periods_performed: u32::try_from(performed).unwrap_or(u32::MAX),
                completion_rate: completion.percent(),
                latest_streak: latest.length,
            })
        })
        .collect()
}

/// Stable sort by one column. Titles compare case-insensitively and habits
/// never performed sort as if performed at the earliest possible time.
pub fn sort_overview(
    mut rows: Vec<HabitOverview>,
    field: OverviewField,
    order: SortOrder,
) -> Vec<HabitOverview> {
    rows.sort_by(|a, b| {
        let ordering = match field {
            OverviewField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            OverviewField::CreatedAt => a.created_at.cmp(&b.created_at),
            OverviewField::Recurrence => a.recurrence.as_str().cmp(b.recurrence.as_str()),
            OverviewField::LastPerformed => a.last_performed.cmp(&b.last_performed),
            OverviewField::NumPeriodsPerformed => {
                a.num_periods_performed.cmp(&b.num_periods_performed)
            }
            OverviewField::CompletionRate => a.completion_rate.cmp(&b.completion_rate),
            OverviewField::LatestStreak => a.latest_streak.cmp(&b.latest_streak),
        };
        order.apply(ordering)
    });
    rows
}

pub fn filter_overview(rows: Vec<HabitOverview>, recurrence: Recurrence) -> Vec<HabitOverview> {
    rows.into_iter()
        .filter(|row| row.recurrence == recurrence)
        .collect()
}
