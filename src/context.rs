use crate::calendar::BusinessCalendar;
use crate::config::PlannerConfig;
use crate::error::Result;
use crate::gantt::{GanttGrid, project_weeks};
use crate::goal::{Difficulty, Goal};
use crate::goal_scheduler::{GoalScheduler, resolve_anchor};
use crate::holidays::generate_holidays;
use crate::task_scheduler::{TaskLayout, TaskScheduler};
use crate::template::{TaskTemplate, default_template};
use chrono::NaiveDate;
use tracing::info;

/// Everything a scheduling session needs, built once and passed down:
/// the holiday calendar, the planner settings and the task template.
#[derive(Debug, Clone)]
pub struct SchedulingContext {
    calendar: BusinessCalendar,
    config: PlannerConfig,
    template: Vec<TaskTemplate>,
}

impl Default for SchedulingContext {
    fn default() -> Self {
        Self::from_config(PlannerConfig::default())
    }
}

impl SchedulingContext {
    /// Generate holidays for the configured year range.
    pub fn from_config(config: PlannerConfig) -> Self {
        let (start, end) = config.holiday_years;
        let holidays = generate_holidays(start, end);
        info!(start, end, count = holidays.len(), "holiday calendar generated");
        let calendar =
            BusinessCalendar::from_holidays(&holidays).with_iteration_cap(config.iteration_cap);
        Self::new(calendar, config)
    }

    pub fn new(calendar: BusinessCalendar, config: PlannerConfig) -> Self {
        Self {
            calendar,
            config,
            template: default_template(),
        }
    }

    pub fn with_template(mut self, template: Vec<TaskTemplate>) -> Self {
        self.template = template;
        self
    }

    pub fn calendar(&self) -> &BusinessCalendar {
        &self.calendar
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn template(&self) -> &[TaskTemplate] {
        &self.template
    }

    pub fn resolve_anchor(&self, raw: Option<&str>) -> NaiveDate {
        resolve_anchor(raw, &self.config)
    }

    pub fn schedule_goals(&self, goals: &mut [Goal], anchor: NaiveDate) -> Result<()> {
        GoalScheduler::from_config(&self.calendar, &self.config).execute(goals, anchor)
    }

    pub fn task_layout(&self, start: NaiveDate, difficulty: Option<Difficulty>) -> Result<TaskLayout> {
        TaskScheduler::from_config(&self.calendar, &self.config).execute(
            &self.template,
            start,
            difficulty,
        )
    }

    /// Week grid for a scheduled goal, or `None` when it has no start yet.
    pub fn gantt_for(&self, goal: &Goal) -> Result<Option<GanttGrid>> {
        let Some(start) = goal.scheduled_start_date else {
            return Ok(None);
        };
        let layout = self.task_layout(start, goal.difficulty)?;
        Ok(Some(project_weeks(
            &layout,
            start,
            goal.difficulty,
            &self.calendar,
            self.config.week_granularity,
        )))
    }
}
