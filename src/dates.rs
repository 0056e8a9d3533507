//! Primitive date helpers shared by the calendar and both schedulers.

use crate::error::{PlannerError, Result};
use crate::holidays::Holiday;
use chrono::{Datelike, Duration, NaiveDate, TimeDelta, Weekday};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a canonical `YYYY-MM-DD` string.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| PlannerError::InvalidDate {
        input: input.to_string(),
    })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Shift `date` by `days` calendar days (negative moves backward).
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

/// Like [`add_days`], but reports an out-of-range result instead of panicking.
pub fn checked_add_days(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    TimeDelta::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or(PlannerError::DateOutOfRange { from: date, days })
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Exact-date membership test against a holiday list.
pub fn is_holiday(date: NaiveDate, holidays: &[Holiday]) -> bool {
    holidays.iter().any(|holiday| holiday.date == date)
}

/// Inclusive day count between two dates; zero when `end < start`.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    ((end - start).num_days() + 1).max(0)
}
