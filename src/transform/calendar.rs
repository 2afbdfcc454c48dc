// src/transform/calendar.rs

use anyhow::{anyhow, Context, Result};
use chrono::{Datelike, NaiveDate};

/// Calendar attributes derived from one `YYYY-MM-DD` date string.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarParts {
    pub day: i32,
    pub month: i32,
    pub year: i32,
    pub quarter: i32,
    pub day_of_week: String,
    pub week_of_year: i32,
}

/// Split `date` on `-` into year/month/day, then confirm the whole value
/// parses as a `%Y-%m-%d` calendar date and derive quarter, weekday name and
/// ISO week. Any shape or calendar violation is an error carrying the
/// offending value; callers treat it as fatal for the run, not per-row.
pub fn derive_calendar_parts(date: &str) -> Result<CalendarParts> {
    let parts: Vec<&str> = date.split('-').collect();
    if parts.len() < 3 {
        return Err(anyhow!("date {:?} does not split into year-month-day", date));
    }

    let year: i32 = parts[0]
        .parse()
        .with_context(|| format!("year component of date {:?}", date))?;
    let month: i32 = parts[1]
        .parse()
        .with_context(|| format!("month component of date {:?}", date))?;
    let day: i32 = parts[2]
        .parse()
        .with_context(|| format!("day component of date {:?}", date))?;

    let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("date {:?} is not a valid YYYY-MM-DD calendar date", date))?;

    Ok(CalendarParts {
        day,
        month,
        year,
        quarter: (month - 1) / 3 + 1,
        day_of_week: parsed.format("%A").to_string(),
        week_of_year: parsed.iso_week().week() as i32,
    })
}
