//! Weekly Gantt projection of a goal's task layout.
//!
//! Week 1 starts on the goal's effective start date and every week is a
//! consecutive seven-day block. Each task row reports how much of each week
//! its date span covers; each week reports how many of its days are holidays.

use crate::calendar::BusinessCalendar;
use crate::config::WeekGranularity;
use crate::dates::inclusive_days;
use crate::error::Result;
use crate::goal::Difficulty;
use crate::task_scheduler::TaskLayout;
use chrono::{Duration, NaiveDate};
use polars::prelude::PlSmallStr;
use polars::prelude::*;
use serde::Serialize;

const DAYS_PER_WEEK: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HolidayOverlay {
    None,
    Partial,
    Full,
}

impl HolidayOverlay {
    pub fn classify(holiday_days: u32) -> Self {
        match holiday_days {
            0 => HolidayOverlay::None,
            7.. => HolidayOverlay::Full,
            _ => HolidayOverlay::Partial,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HolidayOverlay::None => "none",
            HolidayOverlay::Partial => "partial",
            HolidayOverlay::Full => "full",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GanttWeek {
    /// 1-based week number.
    pub index: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub holiday_days: u32,
    pub overlay: HolidayOverlay,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GanttRow {
    pub task_id: String,
    pub task_name: String,
    pub is_approval: bool,
    /// Overlap fraction per week, aligned with [`GanttGrid::weeks`].
    pub cells: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GanttGrid {
    pub weeks: Vec<GanttWeek>,
    pub rows: Vec<GanttRow>,
}

/// Share of a seven-day week covered by a task span, in `0.0..=1.0`.
pub fn overlap_fraction(
    task_start: NaiveDate,
    task_end: NaiveDate,
    week_start: NaiveDate,
    week_end: NaiveDate,
) -> f64 {
    let days = inclusive_days(task_start.max(week_start), task_end.min(week_end));
    (days as f64 / DAYS_PER_WEEK as f64).clamp(0.0, 1.0)
}

/// Number of week columns for a layout under the given granularity.
pub fn week_count(
    layout: &TaskLayout,
    start: NaiveDate,
    difficulty: Option<Difficulty>,
    granularity: WeekGranularity,
) -> u32 {
    let template_weeks = Difficulty::or_default(difficulty).template_weeks();
    match granularity {
        WeekGranularity::Template => template_weeks,
        WeekGranularity::FromTasks => match layout.latest_end() {
            Some(end) => {
                let days = inclusive_days(start, end);
                ((days + DAYS_PER_WEEK - 1) / DAYS_PER_WEEK).max(1) as u32
            }
            None => template_weeks,
        },
    }
}

pub fn project_weeks(
    layout: &TaskLayout,
    start: NaiveDate,
    difficulty: Option<Difficulty>,
    calendar: &BusinessCalendar,
    granularity: WeekGranularity,
) -> GanttGrid {
    let weeks: Vec<GanttWeek> = (0..week_count(layout, start, difficulty, granularity))
        .map(|offset| {
            let week_start = start + Duration::days(offset as i64 * DAYS_PER_WEEK);
            let week_end = week_start + Duration::days(DAYS_PER_WEEK - 1);
            let holiday_days = calendar.holidays_between(week_start, week_end).len() as u32;
            GanttWeek {
                index: offset + 1,
                start: week_start,
                end: week_end,
                holiday_days,
                overlay: HolidayOverlay::classify(holiday_days),
            }
        })
        .collect();

    let rows = layout
        .iter()
        .map(|position| GanttRow {
            task_id: position.task.id.clone(),
            task_name: position.task.name.clone(),
            is_approval: position.task.is_approval,
            cells: weeks
                .iter()
                .map(|week| {
                    overlap_fraction(position.start_date, position.end_date, week.start, week.end)
                })
                .collect(),
        })
        .collect();

    GanttGrid { weeks, rows }
}

impl GanttGrid {
    pub fn cell(&self, task_id: &str, week_index: u32) -> Option<f64> {
        let row = self.rows.iter().find(|row| row.task_id == task_id)?;
        let column = week_index.checked_sub(1)? as usize;
        row.cells.get(column).copied()
    }

    /// One row per (task, week) pair.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let capacity = self.rows.len() * self.weeks.len();
        let mut task_ids: Vec<&str> = Vec::with_capacity(capacity);
        let mut task_names: Vec<&str> = Vec::with_capacity(capacity);
        let mut week_numbers: Vec<u32> = Vec::with_capacity(capacity);
        let mut week_starts: Vec<i32> = Vec::with_capacity(capacity);
        let mut overlaps: Vec<f64> = Vec::with_capacity(capacity);
        let mut overlays: Vec<&str> = Vec::with_capacity(capacity);

        for row in &self.rows {
            for (week, overlap) in self.weeks.iter().zip(&row.cells) {
                task_ids.push(row.task_id.as_str());
                task_names.push(row.task_name.as_str());
                week_numbers.push(week.index);
                week_starts.push(date_to_i32(week.start));
                overlaps.push(*overlap);
                overlays.push(week.overlay.as_str());
            }
        }

        let columns: Vec<Column> = vec![
            Series::new(PlSmallStr::from_static("task_id"), task_ids).into_column(),
            Series::new(PlSmallStr::from_static("task_name"), task_names).into_column(),
            Series::new(PlSmallStr::from_static("week"), week_numbers).into_column(),
            Series::new(PlSmallStr::from_static("week_start"), week_starts)
                .cast(&DataType::Date)?
                .into_column(),
            Series::new(PlSmallStr::from_static("overlap"), overlaps).into_column(),
            Series::new(PlSmallStr::from_static("holiday"), overlays).into_column(),
        ];
        Ok(DataFrame::new(columns)?)
    }
}

fn date_to_i32(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    (date - epoch).num_days() as i32
}
