use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Timestamp format accepted from users and used in fixtures.
pub const INPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time, truncated to whole seconds.
pub fn now_local() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Parse a `YYYY-mm-dd HH:MM:SS` local timestamp. A bare `YYYY-mm-dd` means
/// midnight.
pub fn parse_local(value: &str) -> Result<NaiveDateTime> {
    parse_with_default_time(value, NaiveTime::MIN)
}

/// Like [`parse_local`], but a bare `YYYY-mm-dd` means the last second of that
/// day. Used for the closing bound of a window.
pub fn parse_local_end(value: &str) -> Result<NaiveDateTime> {
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).context("invalid end-of-day time")?;
    parse_with_default_time(value, end_of_day)
}

fn parse_with_default_time(value: &str, time: NaiveTime) -> Result<NaiveDateTime> {
    let trimmed = value.trim();
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, INPUT_FORMAT) {
        return Ok(parsed);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| date.and_time(time))
        .with_context(|| format!("'{value}' is not a YYYY-mm-dd [HH:MM:SS] timestamp"))
}
