pub mod activity;
pub mod habit;

pub use activity::Activity;
pub use habit::{Habit, HabitAbridged, Recurrence};
