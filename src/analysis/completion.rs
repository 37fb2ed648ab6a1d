use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::error::{validate_range, AnalysisError};
use super::grouping::group_by_period;
use super::periods::count_periods;
use crate::db::models::Habit;
use crate::log_debug;

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompletionStats {
    pub num_active_periods: u32,
    pub num_total_periods: u32,
    /// `num_active_periods / num_total_periods`, in `[0, 1]`.
    pub rate: f64,
}

impl CompletionStats {
    pub fn empty() -> Self {
        Self {
            num_active_periods: 0,
            num_total_periods: 0,
            rate: 0.0,
        }
    }

    /// Rate as a whole percentage, rounding halves to even.
    pub fn percent(&self) -> u32 {
        (100.0 * self.rate).round_ties_even() as u32
    }
}

/// Share of periods in `[start, end]` in which the habit was performed.
///
/// `start` defaults to the habit's creation time and `end` to `now`. An
/// explicit window with `end < start` is rejected. A defaulted window that ends
/// before it starts (e.g. `end` earlier than the habit's creation) has no
/// periods and yields [`CompletionStats::empty`].
pub fn compute_completion_rate(
    habit: &Habit,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    now: NaiveDateTime,
) -> Result<CompletionStats, AnalysisError> {
    validate_range(start, end)?;

    let start = start.unwrap_or(habit.created_at);
    let end = end.unwrap_or(now);
    if end < start {
        return Ok(CompletionStats::empty());
    }

    let active = group_by_period(&habit.activities, habit.recurrence, Some(start), Some(end))?.len();
    let total = count_periods(start, end, habit.recurrence);

    let num_active_periods = u32::try_from(active).unwrap_or(u32::MAX);
    let num_total_periods = u32::try_from(total.max(0)).unwrap_or(u32::MAX);
    let rate = if num_total_periods == 0 {
        0.0
    } else {
        f64::from(num_active_periods) / f64::from(num_total_periods)
    };

    log_debug!(
        "[completion] habit_id={} start={} end={} active={} total={}",
        habit.id,
        start,
        end,
        num_active_periods,
        num_total_periods
    );

    Ok(CompletionStats {
        num_active_periods,
        num_total_periods,
        rate,
    })
}
