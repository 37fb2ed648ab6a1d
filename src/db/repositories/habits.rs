use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Row};
use uuid::Uuid;

use super::activities::{activities_for_habit, row_to_activity};
use crate::db::{
    helpers::{parse_datetime, parse_recurrence, to_db_datetime},
    models::{Activity, Habit, HabitAbridged, Recurrence},
    Database,
};
use crate::utils::time::now_local;

fn row_to_habit(row: &Row) -> Result<Habit> {
    let recurrence: String = row.get("recurrence")?;
    let created_at: String = row.get("created_at")?;

    Ok(Habit {
        id: row.get("id")?,
        title: row.get("title")?,
        recurrence: parse_recurrence(&recurrence)?,
        created_at: parse_datetime(&created_at, "created_at")?,
        activities: Vec::new(),
    })
}

impl Database {
    /// Create a habit. `created_at` is local time and defaults to now.
    pub fn create_habit(
        &self,
        title: &str,
        recurrence: Recurrence,
        created_at: Option<NaiveDateTime>,
    ) -> Result<Habit> {
        let habit = Habit::new(
            Uuid::new_v4().to_string(),
            title,
            recurrence,
            created_at.unwrap_or_else(now_local),
        );

        self.execute(|conn| {
            conn.execute(
                "INSERT INTO habits (id, title, recurrence, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![
                    habit.id,
                    habit.title,
                    habit.recurrence.as_str(),
                    to_db_datetime(habit.created_at)?,
                ],
            )
            .with_context(|| "failed to insert habit")?;
            Ok(())
        })?;

        Ok(habit)
    }

    /// A habit with its activities ordered by performance time.
    pub fn get_habit(&self, habit_id: &str) -> Result<Option<Habit>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, recurrence, created_at FROM habits WHERE id = ?1",
            )?;
            let mut rows = stmt.query(params![habit_id])?;
            let mut habit = match rows.next()? {
                Some(row) => row_to_habit(row)?,
                None => return Ok(None),
            };

            habit.activities = activities_for_habit(conn, habit_id)?;
            Ok(Some(habit))
        })
    }

    /// Every habit with its activities, oldest habit first.
    pub fn get_all_habits(&self) -> Result<Vec<Habit>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, recurrence, created_at FROM habits ORDER BY created_at ASC, id ASC",
            )?;
            let mut rows = stmt.query([])?;
            let mut habits = Vec::new();
            while let Some(row) = rows.next()? {
                habits.push(row_to_habit(row)?);
            }

            let mut stmt = conn.prepare(
                "SELECT id, habit_id, performed_at
                 FROM activities
                 ORDER BY habit_id ASC, performed_at ASC",
            )?;
            let mut rows = stmt.query([])?;
            let mut by_habit: HashMap<String, Vec<Activity>> = HashMap::new();
            while let Some(row) = rows.next()? {
                let activity = row_to_activity(row)?;
                by_habit
                    .entry(activity.habit_id.clone())
                    .or_default()
                    .push(activity);
            }

            for habit in &mut habits {
                habit.activities = by_habit.remove(&habit.id).unwrap_or_default();
            }

            Ok(habits)
        })
    }

    pub fn get_all_habits_abridged(&self) -> Result<Vec<HabitAbridged>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare("SELECT id, title FROM habits ORDER BY title COLLATE NOCASE ASC")?;
            let mut rows = stmt.query([])?;
            let mut habits = Vec::new();
            while let Some(row) = rows.next()? {
                habits.push(HabitAbridged {
                    id: row.get(0)?,
                    title: row.get(1)?,
                });
            }
            Ok(habits)
        })
    }

    /// Delete a habit and every activity recorded for it.
    pub fn delete_habit(&self, habit_id: &str) -> Result<()> {
        self.execute(|conn| {
            let tx = conn
                .unchecked_transaction()
                .context("failed to open delete transaction")?;

            tx.execute("DELETE FROM activities WHERE habit_id = ?1", params![habit_id])?;
            let rows_affected = tx.execute("DELETE FROM habits WHERE id = ?1", params![habit_id])?;
            if rows_affected == 0 {
                return Err(anyhow!("Habit {habit_id} not found"));
            }

            tx.commit().context("failed to commit habit deletion")?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::db::models::Recurrence;
    use crate::db::Database;
    use chrono::NaiveDateTime;

    fn ts(value: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn create_and_fetch() {
        let db = Database::open_in_memory().unwrap();
        let created = db
            .create_habit("Phone parents", Recurrence::Weekly, Some(ts("2023-09-14 19:01:16")))
            .unwrap();
        db.create_activity(&created.id, Some(ts("2023-09-18 16:20:30"))).unwrap();

        let fetched = db.get_habit(&created.id).unwrap().expect("habit should exist");
        assert_eq!(fetched.title, "Phone parents");
        assert_eq!(fetched.recurrence, Recurrence::Weekly);
        assert_eq!(fetched.created_at, ts("2023-09-14 19:01:16"));
        assert_eq!(fetched.activities.len(), 1);
        assert_eq!(fetched.activities[0].habit_id, created.id);

        assert!(db.get_habit("missing").unwrap().is_none());
    }

    #[test]
    fn all_habits_carry_their_own_activities() {
        let db = Database::open_in_memory().unwrap();
        let piano = db
            .create_habit("Practise piano", Recurrence::Daily, Some(ts("2023-05-28 19:21:57")))
            .unwrap();
        let phone = db
            .create_habit("Phone parents", Recurrence::Weekly, Some(ts("2023-06-14 19:01:16")))
            .unwrap();
        let plants = db
            .create_habit("Water plants", Recurrence::Weekly, Some(ts("2023-06-19 15:43:21")))
            .unwrap();

        db.create_activity(&piano.id, Some(ts("2023-05-31 00:55:21"))).unwrap();
        db.create_activity(&phone.id, Some(ts("2023-06-18 16:20:30"))).unwrap();
        db.create_activity(&piano.id, Some(ts("2023-06-01 11:17:49"))).unwrap();

        let habits = db.get_all_habits().unwrap();
        assert_eq!(habits.len(), 3);
        for habit in &habits {
            let expected = if habit.id == piano.id {
                2
            } else if habit.id == phone.id {
                1
            } else {
                assert_eq!(habit.id, plants.id);
                0
            };
            assert_eq!(habit.activities.len(), expected, "{}", habit.title);
            assert!(habit.activities.iter().all(|a| a.habit_id == habit.id));
        }

        let abridged = db.get_all_habits_abridged().unwrap();
        let titles: Vec<&str> = abridged.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, vec!["Phone parents", "Practise piano", "Water plants"]);
    }

    #[test]
    fn abridged_titles_ignore_case() {
        let db = Database::open_in_memory().unwrap();
        for title in ["Water plants", "call home", "Practise piano"] {
            db.create_habit(title, Recurrence::Daily, None).unwrap();
        }

        let abridged = db.get_all_habits_abridged().unwrap();
        let titles: Vec<&str> = abridged.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, vec!["call home", "Practise piano", "Water plants"]);
    }

    #[test]
    fn delete_cascades_to_activities() {
        let db = Database::open_in_memory().unwrap();
        let habit = db.create_habit("Practise piano", Recurrence::Daily, None).unwrap();
        db.create_activity(&habit.id, None).unwrap();

        db.delete_habit(&habit.id).unwrap();

        assert!(db.get_habit(&habit.id).unwrap().is_none());
        assert!(db.get_activities_for_habit(&habit.id).unwrap().is_empty());
        assert!(db.delete_habit(&habit.id).is_err());
    }
}
