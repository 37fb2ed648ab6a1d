//! Value conversion between SQLite rows and models.
//!
//! Timestamps are stored as UTC RFC 3339 text and handed to the rest of the
//! crate as local naive date-times.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

use crate::db::models::Recurrence;

pub fn to_db_datetime(local: NaiveDateTime) -> Result<String> {
    let resolved = Local
        .from_local_datetime(&local)
        .earliest()
        .ok_or_else(|| anyhow!("{local} does not exist in the local timezone"))?;
    Ok(resolved.with_timezone(&Utc).to_rfc3339())
}

pub fn parse_datetime(value: &str, field: &str) -> Result<NaiveDateTime> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Local).naive_local())
        .with_context(|| format!("failed to parse {field}"))
}

pub fn parse_recurrence(value: &str) -> Result<Recurrence> {
    value
        .parse::<Recurrence>()
        .with_context(|| format!("invalid recurrence stored in database: {value}"))
}
