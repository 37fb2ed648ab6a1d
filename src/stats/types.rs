use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisError;
use crate::db::models::Recurrence;

/// One row of the all-habits statistics table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HabitOverview {
    pub id: String,
    pub title: String,
    pub created_at: NaiveDateTime,
    pub recurrence: Recurrence,
    pub last_performed: Option<NaiveDateTime>,
    pub num_periods_performed: u32,
    /// Whole percent.
    pub completion_rate: u32,
    pub latest_streak: u32,
}

/// Column the overview can be sorted by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OverviewField {
    Title,
    CreatedAt,
    Recurrence,
    LastPerformed,
    NumPeriodsPerformed,
    CompletionRate,
    LatestStreak,
}

impl OverviewField {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverviewField::Title => "title",
            OverviewField::CreatedAt => "created_at",
            OverviewField::Recurrence => "recurrence",
            OverviewField::LastPerformed => "last_performed",
            OverviewField::NumPeriodsPerformed => "num_periods_performed",
            OverviewField::CompletionRate => "completion_rate",
            OverviewField::LatestStreak => "latest_streak",
        }
    }
}

impl fmt::Display for OverviewField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverviewField {
    type Err = AnalysisError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "title" => Ok(OverviewField::Title),
            "created_at" => Ok(OverviewField::CreatedAt),
            "recurrence" => Ok(OverviewField::Recurrence),
            "last_performed" => Ok(OverviewField::LastPerformed),
            "num_periods_performed" => Ok(OverviewField::NumPeriodsPerformed),
            "completion_rate" => Ok(OverviewField::CompletionRate),
            "latest_streak" => Ok(OverviewField::LatestStreak),
            other => Err(AnalysisError::UnknownSortKey(other.to_string())),
        }
    }
}
