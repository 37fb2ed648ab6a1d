use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{error, info};
use rusqlite::Connection;

pub mod helpers;
mod migrations;
pub mod models;
mod repositories;

use migrations::run_migrations;

/// Handle to the habit store. Owned by the caller and passed explicitly to
/// whatever needs persistence; there is no global connection.
pub struct Database {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl Database {
    pub fn open(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let conn = Connection::open(&db_path).context("failed to open SQLite database")?;
        if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
            error!("Failed to enable WAL mode: {err}");
        }

        let database = Self::init(conn, Some(db_path))?;
        if let Some(path) = database.path() {
            info!("Database initialized at {}", path.display());
        }
        Ok(database)
    }

    /// Fresh, private database that disappears when dropped.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        Self::init(conn, None)
    }

    fn init(mut conn: Connection, db_path: Option<PathBuf>) -> Result<Self> {
        if let Err(err) = conn.pragma_update(None, "foreign_keys", "ON") {
            error!("Failed to enable foreign keys: {err}");
        }
        run_migrations(&mut conn).context("failed to run database migrations")?;
        Ok(Self { conn, db_path })
    }

    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    pub fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        task(&self.conn)
    }

    pub fn close(self) {
        if let Err((_, err)) = self.conn.close() {
            error!("Failed to close database: {err}");
            return;
        }
        info!("Database connection closed");
    }
}
