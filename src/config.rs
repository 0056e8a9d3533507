use crate::calendar::DEFAULT_ITERATION_CAP;
use crate::error::Result;
use crate::goal::Difficulty;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Days per template duration unit at task granularity (half a week).
pub const HALF_WEEK_DAYS: f64 = 3.5;

/// How the task scheduler orders template tasks before laying them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyResolution {
    /// Walk the template as authored; forward references resolve to nothing.
    #[default]
    TemplateOrder,
    /// Topologically sort the template first and reject cycles.
    Topological,
}

/// Number of week columns in a Gantt projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekGranularity {
    /// 4/6/8 weeks for Easy/Medium/Hard.
    #[default]
    Template,
    /// Enough weeks to cover the latest task end.
    FromTasks,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletionWeights {
    pub approval: u32,
    pub regular: u32,
}

impl Default for CompletionWeights {
    fn default() -> Self {
        Self {
            approval: 1,
            regular: 2,
        }
    }
}

/// Calendar-day durations for goals at each difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalDurations {
    pub easy: i64,
    pub medium: i64,
    pub hard: i64,
}

impl Default for GoalDurations {
    fn default() -> Self {
        Self {
            easy: 30,
            medium: 45,
            hard: 60,
        }
    }
}

impl GoalDurations {
    pub fn for_difficulty(&self, difficulty: Difficulty) -> i64 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }
}

/// Planner settings. Every field has a default so partial JSON files load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Anchor used when the caller's anchor cannot be parsed.
    pub default_anchor: NaiveDate,
    /// Inclusive holiday generation range.
    pub holiday_years: (i32, i32),
    /// Calendar days per template duration unit.
    pub increment_days: f64,
    pub goal_durations: GoalDurations,
    pub completion_weights: CompletionWeights,
    pub dependency_resolution: DependencyResolution,
    pub iteration_cap: u32,
    pub week_granularity: WeekGranularity,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_anchor: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap_or_default(),
            holiday_years: (2025, 2027),
            increment_days: HALF_WEEK_DAYS,
            goal_durations: GoalDurations::default(),
            completion_weights: CompletionWeights::default(),
            dependency_resolution: DependencyResolution::default(),
            iteration_cap: DEFAULT_ITERATION_CAP,
            week_granularity: WeekGranularity::default(),
        }
    }
}

impl PlannerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config: PlannerConfig = serde_json::from_str(
            r#"{ "default_anchor": "2026-02-02", "dependency_resolution": "topological" }"#,
        )
        .unwrap();
        assert_eq!(config.default_anchor, NaiveDate::from_ymd_opt(2026, 2, 2).unwrap());
        assert_eq!(config.dependency_resolution, DependencyResolution::Topological);
        assert_eq!(config.completion_weights, CompletionWeights::default());
        assert_eq!(config.goal_durations.for_difficulty(Difficulty::Medium), 45);
    }
}
