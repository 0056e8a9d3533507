//! Goal portfolio scheduling: holiday calendars, business-day arithmetic,
//! priority-ordered goal layout, template task layout, weighted completion
//! and weekly Gantt projection.

pub mod calendar;
pub mod completion;
pub mod config;
pub mod context;
pub mod dates;
pub mod error;
pub mod gantt;
pub mod goal;
pub mod goal_scheduler;
pub mod holidays;
pub mod report;
pub mod task_scheduler;
pub mod template;

pub use calendar::{BusinessCalendar, BusinessCalendarConfig};
pub use completion::{
    GoalProgress, calculate_completion, calculate_weighted_completion, can_complete_task,
    portfolio_progress,
};
pub use config::{
    CompletionWeights, DependencyResolution, GoalDurations, PlannerConfig, WeekGranularity,
};
pub use context::SchedulingContext;
pub use error::{PlannerError, Result};
pub use gantt::{GanttGrid, GanttRow, GanttWeek, HolidayOverlay, overlap_fraction, project_weeks};
pub use goal::{Difficulty, Goal, Priority};
pub use goal_scheduler::{
    GoalScheduler, PriorityOnReorder, adopt_neighbor_priority, compare_goals, move_goal,
    resolve_anchor, schedule_goals, scheduled_goals, sort_goals,
};
pub use holidays::{Holiday, HolidayRule, NamedRule, generate_holidays, generate_with_rules};
pub use report::{load_goals_from_json, save_goals_to_json, save_schedule_to_csv};
pub use task_scheduler::{TaskLayout, TaskPosition, TaskScheduler, compute_task_positions};
pub use template::{MAX_TASK_DURATION, TaskTemplate, default_template, validate_template};
