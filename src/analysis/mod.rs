//! Streak and completion analysis.
//!
//! Everything here is a pure function of a habit snapshot: activities are
//! grouped into periods (days or Monday-based weeks), then scanned for runs of
//! consecutive periods or counted against a date window. Nothing is cached.

pub mod completion;
pub mod error;
pub mod grouping;
pub mod latest;
pub mod periods;
pub mod streaks;

pub use completion::{compute_completion_rate, CompletionStats};
pub use error::AnalysisError;
pub use grouping::{group_by_period, PeriodGroups};
pub use latest::{compute_latest_streak, LatestStreak};
pub use periods::PeriodUnit;
pub use streaks::{compute_all_streaks, SortOrder, Streak, StreakSort};
