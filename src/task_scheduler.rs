use crate::calendar::BusinessCalendar;
use crate::config::{DependencyResolution, HALF_WEEK_DAYS, PlannerConfig};
use crate::dates::checked_add_days;
use crate::error::{PlannerError, Result};
use crate::goal::Difficulty;
use crate::template::{TaskTemplate, TemplateGraph};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskPosition {
    pub task: TaskTemplate,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Computed positions for one goal, iterated in template order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskLayout {
    positions: Vec<TaskPosition>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl TaskLayout {
    fn from_positions(positions: Vec<TaskPosition>) -> Self {
        let mut index = HashMap::with_capacity(positions.len());
        for (idx, position) in positions.iter().enumerate() {
            index.entry(position.task.id.clone()).or_insert(idx);
        }
        Self { positions, index }
    }

    pub fn get(&self, task_id: &str) -> Option<&TaskPosition> {
        self.index.get(task_id).map(|&idx| &self.positions[idx])
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.index.contains_key(task_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaskPosition> {
        self.positions.iter()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn earliest_start(&self) -> Option<NaiveDate> {
        self.positions.iter().map(|p| p.start_date).min()
    }

    pub fn latest_end(&self) -> Option<NaiveDate> {
        self.positions.iter().map(|p| p.end_date).max()
    }
}

/// Lays a task template out on the calendar starting from an anchor date.
pub struct TaskScheduler<'a> {
    calendar: &'a BusinessCalendar,
    increment_days: f64,
    resolution: DependencyResolution,
}

impl<'a> TaskScheduler<'a> {
    pub fn new(calendar: &'a BusinessCalendar) -> Self {
        Self {
            calendar,
            increment_days: HALF_WEEK_DAYS,
            resolution: DependencyResolution::TemplateOrder,
        }
    }

    pub fn from_config(calendar: &'a BusinessCalendar, config: &PlannerConfig) -> Self {
        Self {
            calendar,
            increment_days: config.increment_days,
            resolution: config.dependency_resolution,
        }
    }

    pub fn with_increment_days(mut self, days: f64) -> Self {
        self.increment_days = days;
        self
    }

    pub fn with_resolution(mut self, resolution: DependencyResolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn execute(
        &self,
        tasks: &[TaskTemplate],
        anchor: NaiveDate,
        difficulty: Option<Difficulty>,
    ) -> Result<TaskLayout> {
        let scale = Difficulty::or_default(difficulty).scale();
        let order: Vec<usize> = match self.resolution {
            DependencyResolution::TemplateOrder => (0..tasks.len()).collect(),
            DependencyResolution::Topological => {
                TemplateGraph::build(tasks).topological_positions(tasks)?
            }
        };

        let mut finishes: HashMap<&str, NaiveDate> = HashMap::with_capacity(tasks.len());
        let mut computed: Vec<Option<(NaiveDate, NaiveDate)>> = vec![None; tasks.len()];

        for position in order {
            let task = &tasks[position];

            // Unknown and not-yet-computed dependencies contribute nothing.
            let latest_dependency = task
                .dependencies
                .iter()
                .filter_map(|dep| finishes.get(dep.as_str()))
                .max()
                .copied();
            let candidate = latest_dependency.unwrap_or(anchor);

            let start = self.calendar.next_business_day(candidate)?;
            let span = self.scaled_span_days(task.duration, scale);
            let end = self.extend_over_holidays(start, span)?;

            debug!(task_id = %task.id, %start, %end, span, "task positioned");
            finishes.entry(task.id.as_str()).or_insert(end);
            computed[position] = Some((start, end));
        }

        let positions = tasks
            .iter()
            .zip(computed)
            .filter_map(|(task, dates)| {
                dates.map(|(start_date, end_date)| TaskPosition {
                    task: task.clone(),
                    start_date,
                    end_date,
                })
            })
            .collect();
        Ok(TaskLayout::from_positions(positions))
    }

    /// Calendar days a task occupies before holiday adjustment; at least one.
    /// Oversized spans saturate and are rejected when the end date is computed.
    pub fn scaled_span_days(&self, duration: f64, scale: f64) -> i64 {
        let raw = (duration * self.increment_days * scale).round();
        // NaN fails the comparison and falls back to one day.
        if raw >= 1.0 { raw as i64 } else { 1 }
    }

    /// Last day of a span of `span` days from `start`, pushed out one day for
    /// every holiday inside it (including holidays the extension itself reaches).
    fn extend_over_holidays(&self, start: NaiveDate, span: i64) -> Result<NaiveDate> {
        let mut end = checked_add_days(start, span - 1)?;
        let mut current = start;
        let mut extensions = 0u32;

        while current <= end {
            if self.calendar.is_holiday(current) {
                extensions += 1;
                if extensions > self.calendar.iteration_cap() {
                    return Err(PlannerError::BusinessDayRunaway {
                        from: start,
                        limit: self.calendar.iteration_cap(),
                    });
                }
                end = checked_add_days(end, 1)?;
            }
            current = checked_add_days(current, 1)?;
        }
        Ok(end)
    }
}

/// Lay out `tasks` from `anchor` with the default half-week increment and
/// template-order dependency resolution.
pub fn compute_task_positions(
    tasks: &[TaskTemplate],
    anchor: NaiveDate,
    difficulty: Option<Difficulty>,
    calendar: &BusinessCalendar,
) -> Result<TaskLayout> {
    TaskScheduler::new(calendar).execute(tasks, anchor, difficulty)
}
