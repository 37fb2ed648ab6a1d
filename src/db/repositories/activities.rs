use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::db::{
    helpers::{parse_datetime, to_db_datetime},
    models::Activity,
    Database,
};
use crate::utils::time::now_local;

pub(super) fn row_to_activity(row: &Row) -> Result<Activity> {
    let performed_at: String = row.get("performed_at")?;

    Ok(Activity {
        id: row.get("id")?,
        habit_id: row.get("habit_id")?,
        performed_at: parse_datetime(&performed_at, "performed_at")?,
    })
}

/// Activities of one habit, oldest first.
pub(super) fn activities_for_habit(conn: &Connection, habit_id: &str) -> Result<Vec<Activity>> {
    let mut stmt = conn.prepare(
        "SELECT id, habit_id, performed_at
         FROM activities
         WHERE habit_id = ?1
         ORDER BY performed_at ASC",
    )?;

    let mut rows = stmt.query(params![habit_id])?;
    let mut activities = Vec::new();
    while let Some(row) = rows.next()? {
        activities.push(row_to_activity(row)?);
    }

    Ok(activities)
}

impl Database {
    /// Record a performance of a habit. `performed_at` is local time and
    /// defaults to now.
    pub fn create_activity(
        &self,
        habit_id: &str,
        performed_at: Option<NaiveDateTime>,
    ) -> Result<Activity> {
        self.execute(|conn| {
            let exists: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM habits WHERE id = ?1)",
                params![habit_id],
                |row| row.get(0),
            )?;
            if !exists {
                bail!("Habit {habit_id} not found");
            }

            let activity = Activity {
                id: Uuid::new_v4().to_string(),
                habit_id: habit_id.to_string(),
                performed_at: performed_at.unwrap_or_else(now_local),
            };

            conn.execute(
                "INSERT INTO activities (id, habit_id, performed_at) VALUES (?1, ?2, ?3)",
                params![
                    activity.id,
                    activity.habit_id,
                    to_db_datetime(activity.performed_at)?,
                ],
            )
            .with_context(|| "failed to insert activity")?;

            Ok(activity)
        })
    }

    pub fn get_activities_for_habit(&self, habit_id: &str) -> Result<Vec<Activity>> {
        self.execute(|conn| activities_for_habit(conn, habit_id))
    }
}
