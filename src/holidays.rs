use crate::dates::add_days;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Length of an academic quarter, first day to last.
pub const QUARTER_LENGTH_DAYS: i64 = 77;

/// Gap between the end of winter quarter and the first day of spring quarter.
const SPRING_BREAK_GAP_DAYS: i64 = 7;

pub const WINTER_BREAK: &str = "Winter Break";
pub const SPRING_BREAK: &str = "Spring Break";

/// A single non-working day. Multi-day breaks are stored as one entry per day.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
}

impl Holiday {
    pub fn new(date: NaiveDate, name: impl Into<String>) -> Self {
        Self {
            date,
            name: name.into(),
        }
    }
}

/// How a holiday lands in a given year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HolidayRule {
    Fixed { month: u32, day: u32 },
    NthWeekday { month: u32, weekday: Weekday, n: u32 },
    LastWeekday { month: u32, weekday: Weekday },
}

impl HolidayRule {
    pub fn resolve(&self, year: i32) -> Option<NaiveDate> {
        match *self {
            HolidayRule::Fixed { month, day } => NaiveDate::from_ymd_opt(year, month, day),
            HolidayRule::NthWeekday { month, weekday, n } => nth_weekday(year, month, weekday, n),
            HolidayRule::LastWeekday { month, weekday } => last_weekday(year, month, weekday),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRule {
    pub name: String,
    pub rule: HolidayRule,
}

impl NamedRule {
    pub fn new(name: impl Into<String>, rule: HolidayRule) -> Self {
        Self {
            name: name.into(),
            rule,
        }
    }
}

/// The holidays observed every year.
pub fn standard_rules() -> Vec<NamedRule> {
    use HolidayRule::*;
    vec![
        NamedRule::new("New Year's Day", Fixed { month: 1, day: 1 }),
        NamedRule::new(
            "Martin Luther King Jr. Day",
            NthWeekday { month: 1, weekday: Weekday::Mon, n: 3 },
        ),
        NamedRule::new(
            "Presidents' Day",
            NthWeekday { month: 2, weekday: Weekday::Mon, n: 3 },
        ),
        NamedRule::new("Cesar Chavez Day", Fixed { month: 3, day: 31 }),
        NamedRule::new("Memorial Day", LastWeekday { month: 5, weekday: Weekday::Mon }),
        NamedRule::new("Juneteenth", Fixed { month: 6, day: 19 }),
        NamedRule::new("Independence Day", Fixed { month: 7, day: 4 }),
        NamedRule::new("Labor Day", NthWeekday { month: 9, weekday: Weekday::Mon, n: 1 }),
        NamedRule::new("Veterans Day", Fixed { month: 11, day: 11 }),
        NamedRule::new(
            "Thanksgiving Day",
            NthWeekday { month: 11, weekday: Weekday::Thu, n: 4 },
        ),
        NamedRule::new("Christmas Day", Fixed { month: 12, day: 25 }),
    ]
}

/// Every holiday and break day in the inclusive year range, sorted by date.
///
/// A reversed range yields an empty list.
pub fn generate_holidays(year_start: i32, year_end: i32) -> Vec<Holiday> {
    if year_end < year_start {
        return Vec::new();
    }

    let mut holidays = rule_holidays(&standard_rules(), year_start, year_end);

    // Winter break straddles New Year, so the previous academic year can
    // contribute January days to the first year of the range.
    for year in (year_start - 1)..=year_end {
        holidays.extend(winter_break(year));
    }
    for year in year_start..=year_end {
        holidays.extend(spring_break(year));
    }

    finalize(holidays, year_start, year_end)
}

/// Evaluate caller-supplied rules over a year range with the same ordering
/// and de-duplication guarantees as [`generate_holidays`].
pub fn generate_with_rules(rules: &[NamedRule], year_start: i32, year_end: i32) -> Vec<Holiday> {
    if year_end < year_start {
        return Vec::new();
    }
    finalize(rule_holidays(rules, year_start, year_end), year_start, year_end)
}

fn rule_holidays(rules: &[NamedRule], year_start: i32, year_end: i32) -> Vec<Holiday> {
    let mut holidays = Vec::new();
    for year in year_start..=year_end {
        for named in rules {
            if let Some(date) = named.rule.resolve(year) {
                holidays.push(Holiday::new(date, named.name.clone()));
            }
        }
    }
    holidays
}

fn finalize(mut holidays: Vec<Holiday>, year_start: i32, year_end: i32) -> Vec<Holiday> {
    holidays.retain(|holiday| {
        let year = holiday.date.year();
        year >= year_start && year <= year_end
    });
    holidays.sort();
    holidays.dedup();
    holidays
}

/// First and last day of the fall quarter that begins in `year`.
pub fn fall_quarter(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let start = last_weekday(year, 9, Weekday::Mon)?;
    Some((start, add_days(start, QUARTER_LENGTH_DAYS)))
}

/// First and last day of the winter quarter that begins in `year`.
pub fn winter_quarter(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let new_year = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let mut start = new_year + Duration::days(1);
    while start.weekday() != Weekday::Mon {
        start = start + Duration::days(1);
    }
    Some((start, add_days(start, QUARTER_LENGTH_DAYS)))
}

/// First and last day of the spring quarter that begins in `year`.
pub fn spring_quarter(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    let (_, winter_end) = winter_quarter(year)?;
    let start = add_days(winter_end, SPRING_BREAK_GAP_DAYS);
    Some((start, add_days(start, QUARTER_LENGTH_DAYS)))
}

/// Days strictly between the fall quarter of `year` and the following winter quarter.
fn winter_break(year: i32) -> Vec<Holiday> {
    match (fall_quarter(year), winter_quarter(year + 1)) {
        (Some((_, fall_end)), Some((winter_start, _))) => {
            explode(fall_end, winter_start, WINTER_BREAK)
        }
        _ => Vec::new(),
    }
}

fn spring_break(year: i32) -> Vec<Holiday> {
    match (winter_quarter(year), spring_quarter(year)) {
        (Some((_, winter_end)), Some((spring_start, _))) => {
            explode(winter_end, spring_start, SPRING_BREAK)
        }
        _ => Vec::new(),
    }
}

/// One entry per day strictly between `after` and `before`.
fn explode(after: NaiveDate, before: NaiveDate, name: &str) -> Vec<Holiday> {
    let mut days = Vec::new();
    let mut current = after + Duration::days(1);
    while current < before {
        days.push(Holiday::new(current, name));
        current = current + Duration::days(1);
    }
    days
}

/// The nth occurrence of a weekday in a month.
pub fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u32) -> Option<NaiveDate> {
    let mut date = NaiveDate::from_ymd_opt(year, month, 1)?;
    let mut count = 0;

    while date.month() == month {
        if date.weekday() == weekday {
            count += 1;
            if count == n {
                return Some(date);
            }
        }
        date = date + Duration::days(1);
    }
    None
}

/// The last occurrence of a weekday in a month.
pub fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let mut date = first_of_next - Duration::days(1);

    while date.weekday() != weekday {
        date = date - Duration::days(1);
    }
    Some(date)
}
