//! Habit-related data models.
//!
//! A habit owns its activities; deleting the habit removes them too.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Activity;
use crate::analysis::{grouping::group_by_period, AnalysisError, PeriodUnit};

/// How often a habit is meant to be performed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    Daily,
    Weekly,
}

impl Recurrence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
        }
    }

    /// Number of days that make up one period.
    pub fn interval_days(&self) -> i64 {
        match self {
            Recurrence::Daily => 1,
            Recurrence::Weekly => 7,
        }
    }

    pub fn unit(&self) -> PeriodUnit {
        match self {
            Recurrence::Daily => PeriodUnit::Days,
            Recurrence::Weekly => PeriodUnit::Weeks,
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = AnalysisError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "daily" => Ok(Recurrence::Daily),
            "weekly" => Ok(Recurrence::Weekly),
            other => Err(AnalysisError::UnknownRecurrence(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub title: String,
    pub recurrence: Recurrence,
    pub created_at: NaiveDateTime,
    /// Always sorted ascending by `performed_at`.
    pub activities: Vec<Activity>,
}

impl Habit {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        recurrence: Recurrence,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            recurrence,
            created_at,
            activities: Vec::new(),
        }
    }

    /// Append a performance, keeping the activity list ordered.
    pub fn record(&mut self, activity: Activity) {
        let idx = self
            .activities
            .partition_point(|existing| existing.performed_at <= activity.performed_at);
        self.activities.insert(idx, activity);
    }

    /// The last time this habit was performed, if ever.
    pub fn date_last_performed(&self) -> Option<NaiveDateTime> {
        self.activities.last().map(|activity| activity.performed_at)
    }

    /// Number of distinct periods with at least one performance inside the window.
    /// Five performances in one day count once for a daily habit.
    pub fn count_completed_periods(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<usize, AnalysisError> {
        Ok(group_by_period(&self.activities, self.recurrence, start, end)?.len())
    }
}

/// Id and title only, for selection lists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HabitAbridged {
    pub id: String,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn record_keeps_activities_sorted() {
        let mut habit = Habit::new("h1", "Practise piano", Recurrence::Daily, at(2023, 5, 28, 9, 0, 0));
        habit.record(Activity::new("a1", "h1", at(2023, 6, 2, 10, 0, 0)));
        habit.record(Activity::new("a2", "h1", at(2023, 5, 30, 10, 0, 0)));
        habit.record(Activity::new("a3", "h1", at(2023, 6, 1, 10, 0, 0)));

        let ids: Vec<&str> = habit.activities.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a2", "a3", "a1"]);
        assert_eq!(habit.date_last_performed(), Some(at(2023, 6, 2, 10, 0, 0)));
    }

    #[test]
    fn never_performed_has_no_last_date() {
        let habit = Habit::new("h1", "Water plants", Recurrence::Weekly, at(2023, 6, 19, 15, 43, 21));
        assert_eq!(habit.date_last_performed(), None);
        assert_eq!(habit.count_completed_periods(None, None), Ok(0));
    }

    #[test]
    fn completed_periods_collapse_same_day() {
        let mut habit = Habit::new("h1", "Practise piano", Recurrence::Daily, at(2023, 5, 28, 9, 0, 0));
        habit.record(Activity::new("a1", "h1", at(2023, 5, 30, 5, 1, 59)));
        habit.record(Activity::new("a2", "h1", at(2023, 5, 30, 12, 0, 42)));
        habit.record(Activity::new("a3", "h1", at(2023, 6, 2, 19, 29, 9)));

        assert_eq!(habit.count_completed_periods(None, None), Ok(2));
        assert_eq!(
            habit.count_completed_periods(Some(at(2023, 6, 1, 0, 0, 0)), None),
            Ok(1)
        );
    }

    #[test]
    fn recurrence_parses_known_values_only() {
        assert_eq!("daily".parse::<Recurrence>(), Ok(Recurrence::Daily));
        assert_eq!("weekly".parse::<Recurrence>(), Ok(Recurrence::Weekly));
        assert_eq!(
            "monthly".parse::<Recurrence>(),
            Err(AnalysisError::UnknownRecurrence("monthly".into()))
        );
        assert_eq!(Recurrence::Weekly.interval_days(), 7);
        assert_eq!(Recurrence::Daily.unit(), PeriodUnit::Days);
    }
}
