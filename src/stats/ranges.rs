use std::str::FromStr;

use chrono::{Duration, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisError;

/// Preset look-back windows ending at a given moment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DateRange {
    LastWeek,
    LastMonth,
    LastSixMonths,
}

impl DateRange {
    /// `(start, end)` where `start` is a midnight and `end` is returned as given.
    ///
    /// The week covers the seven days ending with `end`'s day. Month windows
    /// start the day after the same date one or six months back; when that
    /// date does not exist the month is clamped to its last day first, so
    /// 30 March looks back to 1 March.
    pub fn resolve(self, end: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
        let end_date = end.date();
        let start_date = match self {
            DateRange::LastWeek => end_date - Duration::days(6),
            DateRange::LastMonth => months_back(end_date, 1),
            DateRange::LastSixMonths => months_back(end_date, 6),
        };
        (start_date.and_time(NaiveTime::MIN), end)
    }
}

impl FromStr for DateRange {
    type Err = AnalysisError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "last-week" => Ok(DateRange::LastWeek),
            "last-month" => Ok(DateRange::LastMonth),
            "last-six-months" => Ok(DateRange::LastSixMonths),
            other => Err(AnalysisError::UnknownDateRange(other.to_string())),
        }
    }
}

fn months_back(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months))
        .map(|back| back + Duration::days(1))
        .unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(value: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn parses_names() {
        assert_eq!("last-week".parse::<DateRange>().unwrap(), DateRange::LastWeek);
        assert_eq!(
            "last-six-months".parse::<DateRange>().unwrap(),
            DateRange::LastSixMonths
        );
        assert!("fortnight".parse::<DateRange>().is_err());
    }

    #[test]
    fn last_week_includes_today() {
        let end = ts("2023-06-28 15:32:51");
        assert_eq!(
            DateRange::LastWeek.resolve(end),
            (ts("2023-06-22 00:00:00"), end)
        );
    }

    #[test]
    fn last_month() {
        let start = |end: &str| DateRange::LastMonth.resolve(ts(end)).0;
        assert_eq!(start("2023-03-15 10:00:00"), ts("2023-02-16 00:00:00"));
        assert_eq!(start("2023-03-30 10:00:00"), ts("2023-03-01 00:00:00"));
        assert_eq!(start("2023-01-31 10:00:00"), ts("2023-01-01 00:00:00"));
        assert_eq!(start("2023-01-18 10:00:00"), ts("2022-12-19 00:00:00"));
    }

    #[test]
    fn last_six_months() {
        let start = |end: &str| DateRange::LastSixMonths.resolve(ts(end)).0;
        assert_eq!(start("2024-06-18 10:00:00"), ts("2023-12-19 00:00:00"));
        assert_eq!(start("2024-02-10 10:00:00"), ts("2023-08-11 00:00:00"));
        assert_eq!(start("2023-08-31 10:00:00"), ts("2023-03-01 00:00:00"));
    }
}
