use crate::config::CompletionWeights;
use crate::context::SchedulingContext;
use crate::error::Result;
use crate::goal::Goal;
use crate::task_scheduler::TaskLayout;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Weighted completion percentage (0..=100) with the default 1:2
/// approval/regular weights.
pub fn calculate_completion<S: AsRef<str>>(layout: &TaskLayout, completed: &[S]) -> u8 {
    calculate_weighted_completion(layout, completed, CompletionWeights::default())
}

pub fn calculate_weighted_completion<S: AsRef<str>>(
    layout: &TaskLayout,
    completed: &[S],
    weights: CompletionWeights,
) -> u8 {
    let weight_of = |is_approval: bool| -> u64 {
        if is_approval {
            weights.approval as u64
        } else {
            weights.regular as u64
        }
    };

    let total: u64 = layout.iter().map(|p| weight_of(p.task.is_approval)).sum();
    if total == 0 {
        return 0;
    }

    let done: u64 = completed
        .iter()
        .map(|id| id.as_ref())
        .collect::<HashSet<&str>>()
        .into_iter()
        .filter_map(|task_id| layout.get(task_id))
        .map(|p| weight_of(p.task.is_approval))
        .sum();

    let percent = (100.0 * done as f64 / total as f64).round();
    percent.clamp(0.0, 100.0) as u8
}

/// Whether every dependency of `task_id` is already completed. Unknown tasks
/// are never completable.
pub fn can_complete_task<S: AsRef<str>>(
    task_id: &str,
    layout: &TaskLayout,
    completed: &[S],
) -> bool {
    let Some(position) = layout.get(task_id) else {
        return false;
    };
    position
        .task
        .dependencies
        .iter()
        .all(|dep| completed.iter().any(|done| done.as_ref() == dep.as_str()))
}

/// Progress snapshot for one scheduled goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub goal_id: String,
    pub percent: u8,
    /// Incomplete tasks whose dependencies are all done.
    pub next_completable: Vec<String>,
}

/// Lay out the template for every scheduled goal and report its progress.
/// Goals without a scheduled start are skipped.
pub fn portfolio_progress(
    goals: &[Goal],
    completed_by_goal: &HashMap<String, Vec<String>>,
    ctx: &SchedulingContext,
) -> Result<Vec<GoalProgress>> {
    let empty: Vec<String> = Vec::new();
    goals
        .par_iter()
        .filter_map(|goal| goal.scheduled_start_date.map(|start| (goal, start)))
        .map(|(goal, start)| -> Result<GoalProgress> {
            let layout = ctx.task_layout(start, goal.difficulty)?;
            let completed = completed_by_goal.get(&goal.id).unwrap_or(&empty).as_slice();
            let next_completable = layout
                .iter()
                .map(|p| p.task.id.as_str())
                .filter(|&id| !completed.iter().any(|done| done.as_str() == id))
                .filter(|&id| can_complete_task(id, &layout, completed))
                .map(ToOwned::to_owned)
                .collect();
            Ok(GoalProgress {
                goal_id: goal.id.clone(),
                percent: calculate_weighted_completion(
                    &layout,
                    completed,
                    ctx.config().completion_weights,
                ),
                next_completable,
            })
        })
        .collect()
}
