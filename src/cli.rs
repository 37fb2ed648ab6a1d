use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{
    analysis::{SortOrder, StreakSort},
    db::models::Recurrence,
    stats::{DateRange, OverviewField},
};

/// Timestamps are local time, `YYYY-mm-dd HH:MM:SS` or `YYYY-mm-dd`.
#[derive(Parser, Debug)]
#[command(name = "habitrack")]
#[command(version, about = "Track habits and their streaks")]
pub struct Cli {
    /// SQLite database file (overrides the settings file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Settings file
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a habit
    Create {
        title: String,
        /// daily or weekly
        #[arg(short, long)]
        recurrence: Recurrence,
        /// Creation time (default: now)
        #[arg(long)]
        created_at: Option<String>,
    },

    /// Record a performance of a habit
    Perform {
        habit_id: String,
        /// When it was performed (default: now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Delete a habit and all of its activities
    Delete { habit_id: String },

    /// List habit ids and titles
    List,

    /// Show a habit with its activities
    Show { habit_id: String },

    /// All streaks of two or more periods
    Streaks {
        habit_id: String,
        /// date or length (default from settings)
        #[arg(long)]
        sort_by: Option<StreakSort>,
        /// asc or desc (default from settings)
        #[arg(long)]
        order: Option<SortOrder>,
    },

    /// The most recent streak and whether it is still alive
    Latest {
        habit_id: String,
        /// Reference time (default: now)
        #[arg(long)]
        today: Option<String>,
    },

    /// Completion rate over a window
    Rate {
        habit_id: String,
        /// last-week, last-month or last-six-months
        #[arg(long, conflicts_with = "start")]
        range: Option<DateRange>,
        /// Window start (default: habit creation)
        #[arg(long)]
        start: Option<String>,
        /// Window end (default: now)
        #[arg(long)]
        end: Option<String>,
    },

    /// Statistics for every habit
    Overview {
        /// title, created_at, recurrence, last_performed,
        /// num_periods_performed, completion_rate or latest_streak
        #[arg(long)]
        sort_by: Option<OverviewField>,
        /// asc or desc
        #[arg(long)]
        order: Option<SortOrder>,
        /// Only habits with this recurrence
        #[arg(long)]
        recurrence: Option<Recurrence>,
        /// Reference time (default: now)
        #[arg(long)]
        today: Option<String>,
    },

    /// Show or change stored settings
    Config {
        /// Default streak sort key
        #[arg(long)]
        streak_sort_by: Option<StreakSort>,
        /// Default streak sort order
        #[arg(long)]
        streak_order: Option<SortOrder>,
        /// Database file to use when --db is not given
        #[arg(long)]
        database_file: Option<PathBuf>,
        /// Forget the stored database file and use the default location
        #[arg(long, conflicts_with = "database_file")]
        clear_database_file: bool,
    },
}
