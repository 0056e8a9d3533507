use chrono::NaiveDate;
use thiserror::Error;

/// Errors surfaced by the planner.
///
/// Routine malformed input (bad dates on goals, unknown priorities, dangling
/// dependency ids) is handled leniently inside the scheduler and never shows up
/// here. What remains are configuration faults and invalid call shapes.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// A date string was not in `YYYY-MM-DD` form.
    #[error("invalid date '{input}' (expected YYYY-MM-DD)")]
    InvalidDate { input: String },

    /// Stepping to a business day exceeded the iteration cap. The holiday set
    /// almost certainly covers every day of the searched span.
    #[error("no business day found within {limit} days of {from}; check the holiday set")]
    BusinessDayRunaway { from: NaiveDate, limit: u32 },

    /// Date arithmetic left the range chrono can represent.
    #[error("shifting {from} by {days} days leaves the supported date range")]
    DateOutOfRange { from: NaiveDate, days: i64 },

    /// The task template contains a dependency cycle through `task_id`.
    #[error("dependency cycle detected at task '{task_id}'")]
    DependencyCycle { task_id: String },

    #[error("invalid task template: {0}")]
    InvalidTemplate(String),

    #[error("reorder index {index} is out of bounds for {len} goals")]
    ReorderOutOfBounds { index: usize, len: usize },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataframe error: {0}")]
    DataFrame(#[from] polars::prelude::PolarsError),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
