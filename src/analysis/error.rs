use chrono::NaiveDateTime;
use thiserror::Error;

/// Errors raised by the streak and completion engine.
///
/// Empty input is never an error; every operation has a well-defined empty or
/// zero result for a habit that has not been performed yet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("invalid date range: end {end} is before start {start}")]
    InvalidRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("unknown recurrence '{0}' (expected 'daily' or 'weekly')")]
    UnknownRecurrence(String),

    #[error("unknown sort key '{0}'")]
    UnknownSortKey(String),

    #[error("unknown sort order '{0}' (expected 'asc' or 'desc')")]
    UnknownSortOrder(String),

    #[error("unknown date range '{0}' (expected 'last-week', 'last-month' or 'last-six-months')")]
    UnknownDateRange(String),
}

/// Reject a window whose bounds are both present and inverted.
pub fn validate_range(
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> Result<(), AnalysisError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(AnalysisError::InvalidRange { start, end }),
        _ => Ok(()),
    }
}
