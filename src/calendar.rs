use crate::dates::checked_add_days;
use crate::error::{PlannerError, Result};
use crate::holidays::{self, Holiday};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Default bound on how far the business-day skip functions may walk.
pub const DEFAULT_ITERATION_CAP: u32 = 366;

/// Working-day calendar: weekends plus a named holiday set.
///
/// Built once per scheduling session and shared read-only by every pass.
#[derive(Debug, Clone, PartialEq)]
pub struct BusinessCalendar {
    holidays: HashMap<NaiveDate, Vec<String>>,
    non_working_days: HashSet<Weekday>,
    iteration_cap: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessCalendarConfig {
    working_days: Vec<Weekday>,
    holidays: Vec<Holiday>,
    #[serde(default = "default_iteration_cap")]
    iteration_cap: u32,
}

fn default_iteration_cap() -> u32 {
    DEFAULT_ITERATION_CAP
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        Self::with_year_range(2025, 2025)
    }
}

impl BusinessCalendar {
    const ALL_WEEKDAYS: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Mon-Fri week with no holidays.
    pub fn weekdays_only() -> Self {
        Self {
            holidays: HashMap::new(),
            non_working_days: HashSet::from([Weekday::Sat, Weekday::Sun]),
            iteration_cap: DEFAULT_ITERATION_CAP,
        }
    }

    /// Mon-Fri week with the generated holidays for an inclusive year range.
    pub fn with_year_range(start_year: i32, end_year: i32) -> Self {
        let (start, end) = if start_year <= end_year {
            (start_year, end_year)
        } else {
            (end_year, start_year)
        };
        Self::from_holidays(&holidays::generate_holidays(start, end))
    }

    /// Mon-Fri week with the given holiday list.
    pub fn from_holidays(holidays: &[Holiday]) -> Self {
        let mut calendar = Self::weekdays_only();
        calendar.add_holidays(holidays);
        calendar
    }

    pub fn from_config(config: &BusinessCalendarConfig) -> Self {
        let mut calendar = Self::weekdays_only();
        calendar.set_working_days(&config.working_days);
        calendar.add_holidays(&config.holidays);
        calendar.iteration_cap = config.iteration_cap;
        calendar
    }

    pub fn to_config(&self) -> BusinessCalendarConfig {
        BusinessCalendarConfig::from(self)
    }

    pub fn with_iteration_cap(mut self, cap: u32) -> Self {
        self.iteration_cap = cap;
        self
    }

    pub fn iteration_cap(&self) -> u32 {
        self.iteration_cap
    }

    pub fn add_holiday(&mut self, holiday: Holiday) {
        let names = self.holidays.entry(holiday.date).or_default();
        if !names.contains(&holiday.name) {
            names.push(holiday.name);
        }
    }

    pub fn add_holidays(&mut self, holidays: &[Holiday]) {
        for holiday in holidays {
            self.add_holiday(holiday.clone());
        }
    }

    /// Set custom working days (e.g., Mon-Sat for 6-day weeks)
    pub fn set_working_days(&mut self, days: &[Weekday]) {
        self.non_working_days.clear();
        for day in Self::ALL_WEEKDAYS {
            if !days.contains(&day) {
                self.non_working_days.insert(day);
            }
        }
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains_key(&date)
    }

    pub fn is_non_working_weekday(&self, date: NaiveDate) -> bool {
        self.non_working_days.contains(&date.weekday())
    }

    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !self.is_holiday(date) && !self.is_non_working_weekday(date)
    }

    /// Names recorded for a holiday date, joined for display.
    pub fn holiday_name(&self, date: NaiveDate) -> Option<String> {
        self.holidays.get(&date).map(|names| names.join(" / "))
    }

    /// `date` itself when it is a business day, otherwise the first one after it.
    pub fn next_business_day(&self, date: NaiveDate) -> Result<NaiveDate> {
        self.skip_to_business_day(date, 1)
    }

    /// `date` itself when it is a business day, otherwise the last one before it.
    pub fn previous_business_day(&self, date: NaiveDate) -> Result<NaiveDate> {
        self.skip_to_business_day(date, -1)
    }

    fn skip_to_business_day(&self, from: NaiveDate, step: i64) -> Result<NaiveDate> {
        let mut current = from;
        let mut steps = 0u32;
        while !self.is_business_day(current) {
            if steps >= self.iteration_cap {
                return Err(PlannerError::BusinessDayRunaway {
                    from,
                    limit: self.iteration_cap,
                });
            }
            current = checked_add_days(current, step)?;
            steps += 1;
        }
        Ok(current)
    }

    /// Count business days in an inclusive range
    pub fn count_business_days(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        let mut count = 0;
        let mut current = start;

        while current <= end {
            if self.is_business_day(current) {
                count += 1;
            }
            current = current + Duration::days(1);
        }
        count
    }

    /// Holiday dates (not plain weekends) in an inclusive range.
    pub fn holidays_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        let mut current = start;

        while current <= end {
            if self.is_holiday(current) {
                days.push(current);
            }
            current = current + Duration::days(1);
        }
        days
    }

    /// Sorted holiday entries, one per (date, name).
    pub fn holidays(&self) -> Vec<Holiday> {
        let mut entries: Vec<Holiday> = self
            .holidays
            .iter()
            .flat_map(|(date, names)| names.iter().map(|name| Holiday::new(*date, name.clone())))
            .collect();
        entries.sort();
        entries
    }
}

impl BusinessCalendarConfig {
    pub fn new<I, J>(working_days: I, holidays: J) -> Self
    where
        I: IntoIterator<Item = Weekday>,
        J: IntoIterator<Item = Holiday>,
    {
        let mut working: Vec<Weekday> = working_days.into_iter().collect();
        working.sort_by_key(|wd| wd.num_days_from_monday());
        working.dedup_by(|a, b| a.num_days_from_monday() == b.num_days_from_monday());

        let mut holidays: Vec<Holiday> = holidays.into_iter().collect();
        holidays.sort();
        holidays.dedup();

        Self {
            working_days: working,
            holidays,
            iteration_cap: DEFAULT_ITERATION_CAP,
        }
    }

    pub fn working_days(&self) -> &[Weekday] {
        &self.working_days
    }

    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }
}

impl From<&BusinessCalendar> for BusinessCalendarConfig {
    fn from(calendar: &BusinessCalendar) -> Self {
        let working = BusinessCalendar::ALL_WEEKDAYS
            .into_iter()
            .filter(|day| !calendar.non_working_days.contains(day))
            .collect::<Vec<_>>();

        Self {
            working_days: working,
            holidays: calendar.holidays(),
            iteration_cap: calendar.iteration_cap,
        }
    }
}
