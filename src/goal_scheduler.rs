use crate::calendar::BusinessCalendar;
use crate::config::{GoalDurations, PlannerConfig};
use crate::dates::{checked_add_days, parse_date};
use crate::error::{PlannerError, Result};
use crate::goal::{Goal, Priority};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, warn};

/// What happens to a moved goal's priority after a manual reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityOnReorder {
    #[default]
    Keep,
    /// Take the priority of the goal directly above (or below, at the top).
    AdoptNeighbor,
}

/// Ordering used before layout: explicit `order` first, then priority rank,
/// then `priority_number` among Critical goals.
pub fn compare_goals(a: &Goal, b: &Goal) -> Ordering {
    match (a.order, b.order) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a
            .priority_rank()
            .cmp(&b.priority_rank())
            .then_with(|| critical_number(a).cmp(&critical_number(b))),
    }
}

fn critical_number(goal: &Goal) -> u32 {
    match goal.priority {
        Some(Priority::Critical) => goal.priority_number.unwrap_or(u32::MAX),
        _ => u32::MAX,
    }
}

/// Stable in-place sort by [`compare_goals`].
pub fn sort_goals(goals: &mut [Goal]) {
    goals.sort_by(compare_goals);
}

/// Indices of top-level goals in scheduling order.
pub fn top_level_order(goals: &[Goal]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..goals.len())
        .filter(|&idx| !goals[idx].is_child())
        .collect();
    indices.sort_by(|&a, &b| compare_goals(&goals[a], &goals[b]));
    indices
}

/// Parse a caller-supplied anchor, falling back to the configured default.
pub fn resolve_anchor(raw: Option<&str>, config: &PlannerConfig) -> NaiveDate {
    match raw {
        None => config.default_anchor,
        Some(value) => parse_date(value).unwrap_or_else(|err| {
            warn!(%err, fallback = %config.default_anchor, "using default anchor date");
            config.default_anchor
        }),
    }
}

pub struct GoalScheduler<'a> {
    calendar: &'a BusinessCalendar,
    durations: GoalDurations,
}

impl<'a> GoalScheduler<'a> {
    pub fn new(calendar: &'a BusinessCalendar) -> Self {
        Self {
            calendar,
            durations: GoalDurations::default(),
        }
    }

    pub fn from_config(calendar: &'a BusinessCalendar, config: &PlannerConfig) -> Self {
        Self {
            calendar,
            durations: config.goal_durations,
        }
    }

    /// Recompute every goal's scheduled dates in place.
    pub fn execute(&self, goals: &mut [Goal], anchor: NaiveDate) -> Result<()> {
        for goal in goals.iter_mut() {
            goal.clear_schedule();
        }

        let mut cursor = self.calendar.next_business_day(anchor)?;
        for idx in top_level_order(goals) {
            let goal = &mut goals[idx];
            let (start, end) = self.place(goal, cursor)?;
            goal.scheduled_start_date = Some(start);
            goal.scheduled_end_date = Some(end);
            debug!(goal_id = %goal.id, %start, %end, "goal scheduled");
            cursor = checked_add_days(end, 1)?;
        }

        self.schedule_children(goals)
    }

    /// Children start on their parent's start and run in parallel with each
    /// other. Grandchildren resolve once their parent has a start date.
    fn schedule_children(&self, goals: &mut [Goal]) -> Result<()> {
        let mut by_id: HashMap<String, usize> = HashMap::with_capacity(goals.len());
        for (idx, goal) in goals.iter().enumerate() {
            by_id.entry(goal.id.clone()).or_insert(idx);
        }

        let mut pending: Vec<usize> = (0..goals.len())
            .filter(|&idx| goals[idx].is_child())
            .collect();

        loop {
            let mut progressed = false;
            let mut still_pending = Vec::with_capacity(pending.len());

            for idx in pending {
                let parent_start = goals[idx]
                    .parent_id
                    .as_ref()
                    .and_then(|parent_id| by_id.get(parent_id))
                    .filter(|&&parent_idx| parent_idx != idx)
                    .and_then(|&parent_idx| goals[parent_idx].scheduled_start_date);

                match parent_start {
                    Some(parent_start) => {
                        let (start, end) = self.place(&goals[idx], parent_start)?;
                        let goal = &mut goals[idx];
                        goal.scheduled_start_date = Some(start);
                        goal.scheduled_end_date = Some(end);
                        debug!(goal_id = %goal.id, %start, %end, "child goal scheduled");
                        progressed = true;
                    }
                    None => still_pending.push(idx),
                }
            }

            pending = still_pending;
            if !progressed || pending.is_empty() {
                break;
            }
        }

        for idx in pending {
            warn!(
                goal_id = %goals[idx].id,
                parent_id = ?goals[idx].parent_id,
                "parent goal not found; leaving child unscheduled"
            );
        }
        Ok(())
    }

    /// Start/end for one goal whose earliest start is `earliest`.
    fn place(&self, goal: &Goal, earliest: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
        let start = self.calendar.next_business_day(earliest)?;

        if let Some(completed) = goal.completed_date {
            return Ok((start.min(completed), completed));
        }

        let duration = self.durations.for_difficulty(goal.effective_difficulty());
        let nominal_end = checked_add_days(start, duration.max(1) - 1)?;
        let end = self.calendar.previous_business_day(nominal_end)?;
        Ok((start, end.max(start)))
    }
}

/// Recompute scheduled dates in place with default goal durations.
pub fn schedule_goals(
    goals: &mut [Goal],
    anchor: NaiveDate,
    calendar: &BusinessCalendar,
) -> Result<()> {
    GoalScheduler::new(calendar).execute(goals, anchor)
}

/// Same as [`schedule_goals`] but leaves the input untouched.
pub fn scheduled_goals(
    goals: &[Goal],
    anchor: NaiveDate,
    calendar: &BusinessCalendar,
) -> Result<Vec<Goal>> {
    let mut copy = goals.to_vec();
    schedule_goals(&mut copy, anchor, calendar)?;
    Ok(copy)
}

/// Move a goal within a manually ordered list and make the new order sticky
/// by rewriting every goal's `order` to its index.
pub fn move_goal(
    goals: &mut Vec<Goal>,
    from: usize,
    to: usize,
    policy: PriorityOnReorder,
) -> Result<()> {
    let len = goals.len();
    for index in [from, to] {
        if index >= len {
            return Err(PlannerError::ReorderOutOfBounds { index, len });
        }
    }

    let moved = goals.remove(from);
    goals.insert(to, moved);
    for (position, goal) in goals.iter_mut().enumerate() {
        goal.order = Some(position as u32);
    }

    if policy == PriorityOnReorder::AdoptNeighbor {
        adopt_neighbor_priority(goals, to)?;
    }
    Ok(())
}

/// Copy the priority of the goal above `index` (or below it when `index` is
/// the first slot) onto the goal at `index`. Returns whether anything changed.
pub fn adopt_neighbor_priority(goals: &mut [Goal], index: usize) -> Result<bool> {
    let len = goals.len();
    if index >= len {
        return Err(PlannerError::ReorderOutOfBounds { index, len });
    }

    let neighbor = if index > 0 {
        index - 1
    } else if index + 1 < len {
        index + 1
    } else {
        return Ok(false);
    };

    let (priority, number) = (goals[neighbor].priority, goals[neighbor].priority_number);
    let goal = &mut goals[index];
    let changed = goal.priority != priority || goal.priority_number != number;
    if changed {
        debug!(goal_id = %goal.id, from = ?goal.priority, to = ?priority, "adopting neighbor priority");
    }
    goal.priority = priority;
    goal.priority_number = number;
    Ok(changed)
}
