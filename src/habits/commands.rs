use chrono::NaiveDateTime;

use crate::{
    analysis::{
        compute_all_streaks, compute_completion_rate, compute_latest_streak, CompletionStats,
        LatestStreak, SortOrder, Streak, StreakSort,
    },
    db::models::{Activity, Habit, HabitAbridged, Recurrence},
    log_info, log_warn,
    settings::{SettingsView, StreakListSettings},
    stats::{build_overview, filter_overview, sort_overview, DateRange, HabitOverview, OverviewField},
    utils::time::{now_local, parse_local, parse_local_end},
    AppState,
};

const ENABLE_LOGS: bool = true;

fn parse_optional(value: Option<&str>) -> Result<Option<NaiveDateTime>, String> {
    value
        .map(|raw| parse_local(raw).map_err(|e| e.to_string()))
        .transpose()
}

/// A date-only window end covers that whole day.
fn parse_optional_end(value: Option<&str>) -> Result<Option<NaiveDateTime>, String> {
    value
        .map(|raw| parse_local_end(raw).map_err(|e| e.to_string()))
        .transpose()
}

fn load_habit(state: &AppState, habit_id: &str) -> Result<Habit, String> {
    state
        .db
        .get_habit(habit_id)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("Habit {habit_id} not found"))
}

pub fn create_habit(
    state: &AppState,
    title: &str,
    recurrence: Recurrence,
    created_at: Option<&str>,
) -> Result<Habit, String> {
    let title = title.trim();
    if title.is_empty() {
        return Err("Habit title must not be empty".to_string());
    }
    let created_at = parse_optional(created_at)?;
    let habit = state
        .db
        .create_habit(title, recurrence, created_at)
        .map_err(|e| e.to_string())?;
    log_info!("Created {} habit {} ({})", habit.recurrence, habit.id, habit.title);
    Ok(habit)
}

pub fn perform_habit(
    state: &AppState,
    habit_id: &str,
    performed_at: Option<&str>,
) -> Result<Activity, String> {
    let performed_at = parse_optional(performed_at)?;
    let activity = state
        .db
        .create_activity(habit_id, performed_at)
        .map_err(|e| e.to_string())?;
    log_info!("Recorded activity {} for habit {}", activity.id, habit_id);
    Ok(activity)
}

pub fn delete_habit(state: &AppState, habit_id: &str) -> Result<(), String> {
    state.db.delete_habit(habit_id).map_err(|e| e.to_string())?;
    log_info!("Deleted habit {habit_id}");
    Ok(())
}

pub fn list_habits(state: &AppState) -> Result<Vec<HabitAbridged>, String> {
    state.db.get_all_habits_abridged().map_err(|e| e.to_string())
}

pub fn show_habit(state: &AppState, habit_id: &str) -> Result<Habit, String> {
    load_habit(state, habit_id)
}

/// All streaks of a habit. Sort key and order fall back to the stored
/// settings when not given.
pub fn get_streaks(
    state: &AppState,
    habit_id: &str,
    sort_by: Option<StreakSort>,
    order: Option<SortOrder>,
) -> Result<Vec<Streak>, String> {
    let habit = load_habit(state, habit_id)?;
    let defaults = state.settings.streaks();
    Ok(compute_all_streaks(
        &habit,
        sort_by.unwrap_or(defaults.sort_by),
        order.unwrap_or(defaults.order),
    ))
}

pub fn get_latest_streak(
    state: &AppState,
    habit_id: &str,
    today: Option<&str>,
) -> Result<LatestStreak, String> {
    let habit = load_habit(state, habit_id)?;
    let today = parse_optional(today)?.unwrap_or_else(now_local);
    Ok(compute_latest_streak(&habit, today))
}

/// Completion rate over a preset range, an explicit window, or (with neither)
/// from creation up to now. A preset range ends at `end` when given.
pub fn get_completion_rate(
    state: &AppState,
    habit_id: &str,
    range: Option<DateRange>,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<CompletionStats, String> {
    let habit = load_habit(state, habit_id)?;
    let now = now_local();
    let mut start = parse_optional(start)?;
    let mut end = parse_optional_end(end)?;

    if let Some(range) = range {
        if start.is_some() {
            return Err("A preset range cannot be combined with an explicit start".to_string());
        }
        let (range_start, range_end) = range.resolve(end.unwrap_or(now));
        start = Some(range_start);
        end = Some(range_end);
    }

    if let Some(start) = start {
        if start.date() < habit.created_at.date() {
            log_warn!(
                "Window starts {} before habit {} was created on {}; the rate may understate it",
                start,
                habit.id,
                habit.created_at.date()
            );
        }
    }
    if let Some(end) = end {
        if end.date() > now.date() {
            log_warn!("Window ends {} after today; the rate may understate habit {}", end, habit.id);
        }
    }

    compute_completion_rate(&habit, start, end, now).map_err(|e| e.to_string())
}

pub fn get_overview(
    state: &AppState,
    sort_by: Option<OverviewField>,
    order: Option<SortOrder>,
    recurrence: Option<Recurrence>,
    today: Option<&str>,
) -> Result<Vec<HabitOverview>, String> {
    let today = parse_optional(today)?.unwrap_or_else(now_local);
    let habits = state.db.get_all_habits().map_err(|e| e.to_string())?;
    let mut rows = build_overview(&habits, today).map_err(|e| e.to_string())?;

    if let Some(recurrence) = recurrence {
        rows = filter_overview(rows, recurrence);
    }
    if let Some(field) = sort_by {
        rows = sort_overview(rows, field, order.unwrap_or_default());
    }
    Ok(rows)
}

/// Apply any given changes to the stored settings and return the result.
/// `clear_database_file` drops the stored database override and cannot be
/// combined with a new `database_file`.
pub fn update_settings(
    state: &AppState,
    sort_by: Option<StreakSort>,
    order: Option<SortOrder>,
    database_file: Option<std::path::PathBuf>,
    clear_database_file: bool,
) -> Result<SettingsView, String> {
    if clear_database_file && database_file.is_some() {
        return Err("Cannot set and clear the database file at once".to_string());
    }
    let settings = &state.settings;
    if sort_by.is_some() || order.is_some() {
        let current = settings.streaks();
        settings
            .update_streaks(StreakListSettings {
                sort_by: sort_by.unwrap_or(current.sort_by),
                order: order.unwrap_or(current.order),
            })
            .map_err(|e| e.to_string())?;
    }
    if database_file.is_some() || clear_database_file {
        settings
            .update_database_file(database_file)
            .map_err(|e| e.to_string())?;
    }
    Ok(settings.view())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::Database, settings::SettingsStore};
    use tempfile::TempDir;

    fn state() -> (AppState, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let settings = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        let state = AppState {
            db: Database::open_in_memory().unwrap(),
            settings,
        };
        (state, dir)
    }

    fn seeded(state: &AppState) -> Habit {
        let habit = create_habit(state, "Practise piano", Recurrence::Daily, Some("2023-06-01 08:00:00"))
            .unwrap();
        for at in [
            "2023-06-01 19:00:00",
            "2023-06-02 19:00:00",
            "2023-06-03 19:00:00",
            "2023-06-05 19:00:00",
            "2023-06-06 19:00:00",
            "2023-06-10 19:00:00",
        ] {
            perform_habit(state, &habit.id, Some(at)).unwrap();
        }
        habit
    }

    #[test]
    fn create_rejects_blank_title_and_bad_timestamp() {
        let (state, _dir) = state();
        assert!(create_habit(&state, "   ", Recurrence::Daily, None).is_err());
        assert!(create_habit(&state, "Read", Recurrence::Daily, Some("yesterday")).is_err());
        assert!(list_habits(&state).unwrap().is_empty());
    }

    #[test]
    fn perform_unknown_habit_fails() {
        let (state, _dir) = state();
        assert!(perform_habit(&state, "missing", None).is_err());
    }

    #[test]
    fn show_returns_recorded_activities() {
        let (state, _dir) = state();
        let habit = seeded(&state);
        let shown = show_habit(&state, &habit.id).unwrap();
        assert_eq!(shown.title, "Practise piano");
        assert_eq!(shown.activities.len(), 6);
        assert!(show_habit(&state, "missing").is_err());
    }

    #[test]
    fn streaks_use_settings_defaults_unless_overridden() {
        let (state, _dir) = state();
        let habit = seeded(&state);

        let by_date = get_streaks(&state, &habit.id, None, None).unwrap();
        let starts: Vec<String> = by_date.iter().map(|s| s.start.date().to_string()).collect();
        assert_eq!(starts, vec!["2023-06-05", "2023-06-01"]);

        state
            .settings
            .update_streaks(StreakListSettings {
                sort_by: StreakSort::Length,
                order: SortOrder::Desc,
            })
            .unwrap();
        let by_length = get_streaks(&state, &habit.id, None, None).unwrap();
        assert_eq!(by_length[0].length, 3);

        let ascending = get_streaks(&state, &habit.id, None, Some(SortOrder::Asc)).unwrap();
        assert_eq!(ascending[0].length, 2);
    }

    #[test]
    fn latest_streak_relative_to_given_day() {
        let (state, _dir) = state();
        let habit = seeded(&state);

        let latest = get_latest_streak(&state, &habit.id, Some("2023-06-11 09:00:00")).unwrap();
        assert_eq!(latest.length, 1);
        assert_eq!(latest.is_current, Some(true));
        assert_eq!(latest.can_extend_today, Some(true));

        let stale = get_latest_streak(&state, &habit.id, Some("2023-06-13")).unwrap();
        assert_eq!(stale.is_current, Some(false));
    }

    #[test]
    fn completion_rate_over_explicit_and_preset_windows() {
        let (state, _dir) = state();
        let habit = seeded(&state);

        let stats = get_completion_rate(
            &state,
            &habit.id,
            None,
            Some("2023-06-01"),
            Some("2023-06-10 23:59:59"),
        )
        .unwrap();
        assert_eq!(stats.num_active_periods, 6);
        assert_eq!(stats.num_total_periods, 10);
        assert_eq!(stats.percent(), 60);

        let week = get_completion_rate(
            &state,
            &habit.id,
            Some(DateRange::LastWeek),
            None,
            Some("2023-06-10 23:59:59"),
        )
        .unwrap();
        // 4 June to 10 June
        assert_eq!(week.num_total_periods, 7);
        assert_eq!(week.num_active_periods, 3);
    }

    #[test]
    fn date_only_end_covers_the_whole_day() {
        let (state, _dir) = state();
        let habit = create_habit(&state, "Stretch", Recurrence::Daily, Some("2023-06-01 07:00:00")).unwrap();
        perform_habit(&state, &habit.id, Some("2023-06-01 19:00:00")).unwrap();
        perform_habit(&state, &habit.id, Some("2023-06-02 19:00:00")).unwrap();

        let window =
            get_completion_rate(&state, &habit.id, None, Some("2023-06-01"), Some("2023-06-02")).unwrap();
        assert_eq!(window.num_active_periods, 2);
        assert_eq!(window.num_total_periods, 2);
        assert_eq!(window.rate, 1.0);

        let week =
            get_completion_rate(&state, &habit.id, Some(DateRange::LastWeek), None, Some("2023-06-02"))
                .unwrap();
        assert_eq!(week.num_active_periods, 2);
        assert_eq!(week.num_total_periods, 7);
    }

    #[test]
    fn completion_rate_rejects_inverted_window_and_mixed_inputs() {
        let (state, _dir) = state();
        let habit = seeded(&state);
        assert!(get_completion_rate(&state, &habit.id, None, Some("2023-06-10"), Some("2023-06-01")).is_err());
        assert!(get_completion_rate(
            &state,
            &habit.id,
            Some(DateRange::LastMonth),
            Some("2023-06-01"),
            None
        )
        .is_err());
    }

    #[test]
    fn overview_filters_and_sorts() {
        let (state, _dir) = state();
        seeded(&state);
        create_habit(&state, "call home", Recurrence::Weekly, Some("2023-06-05 10:00:00")).unwrap();

        let weekly = get_overview(&state, None, None, Some(Recurrence::Weekly), Some("2023-06-11")).unwrap();
        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly[0].title, "call home");

        let by_title = get_overview(
            &state,
            Some(OverviewField::Title),
            Some(SortOrder::Asc),
            None,
            Some("2023-06-11"),
        )
        .unwrap();
        let titles: Vec<&str> = by_title.iter().map(|row| row.title.as_str()).collect();
        assert_eq!(titles, vec!["call home", "Practise piano"]);
    }

    #[test]
    fn delete_removes_habit() {
        let (state, _dir) = state();
        let habit = seeded(&state);
        delete_habit(&state, &habit.id).unwrap();
        assert!(list_habits(&state).unwrap().is_empty());
        assert!(delete_habit(&state, &habit.id).is_err());
    }

    #[test]
    fn update_settings_keeps_unspecified_values() {
        let (state, _dir) = state();
        let view = update_settings(&state, None, Some(SortOrder::Asc), None, false).unwrap();
        assert_eq!(view.streaks.sort_by, StreakSort::Date);
        assert_eq!(view.streaks.order, SortOrder::Asc);
        assert_eq!(view.database_file, None);
    }

    #[test]
    fn database_file_can_be_set_then_cleared() {
        let (state, _dir) = state();
        let path = std::path::PathBuf::from("/tmp/habits.sqlite3");

        let set = update_settings(&state, None, None, Some(path.clone()), false).unwrap();
        assert_eq!(set.database_file, Some(path.clone()));

        let untouched = update_settings(&state, Some(StreakSort::Length), None, None, false).unwrap();
        assert_eq!(untouched.database_file, Some(path.clone()));

        let cleared = update_settings(&state, None, None, None, true).unwrap();
        assert_eq!(cleared.database_file, None);
        assert_eq!(state.settings.database_file(), None);
        assert_eq!(cleared.streaks.sort_by, StreakSort::Length);

        assert!(update_settings(&state, None, None, Some(path), true).is_err());
    }
}
