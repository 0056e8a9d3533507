use crate::dates::format_date;
use crate::error::Result;
use crate::goal::Goal;
use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Read a goal list in the interchange shape (a JSON array of goals).
pub fn load_goals_from_json<P: AsRef<Path>>(path: P) -> Result<Vec<Goal>> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(file)?)
}

pub fn save_goals_to_json<P: AsRef<Path>>(goals: &[Goal], path: P) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, goals)?;
    Ok(())
}

#[derive(Serialize)]
struct ScheduleCsvRecord {
    id: String,
    title: String,
    priority: String,
    priority_number: String,
    difficulty: String,
    parent_id: String,
    order: String,
    completed_date: String,
    scheduled_start_date: String,
    scheduled_end_date: String,
}

impl From<&Goal> for ScheduleCsvRecord {
    fn from(goal: &Goal) -> Self {
        Self {
            id: goal.id.clone(),
            title: goal.title.clone(),
            priority: goal.priority.map(|p| p.to_string()).unwrap_or_default(),
            priority_number: format_number(goal.priority_number),
            difficulty: goal.effective_difficulty().to_string(),
            parent_id: goal.parent_id.clone().unwrap_or_default(),
            order: format_number(goal.order),
            completed_date: format_optional_date(goal.completed_date),
            scheduled_start_date: format_optional_date(goal.scheduled_start_date),
            scheduled_end_date: format_optional_date(goal.scheduled_end_date),
        }
    }
}

/// One CSV row per goal with its scheduled dates.
pub fn write_schedule_csv<W: Write>(goals: &[Goal], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for goal in goals {
        csv_writer.serialize(ScheduleCsvRecord::from(goal))?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn save_schedule_to_csv<P: AsRef<Path>>(goals: &[Goal], path: P) -> Result<()> {
    let file = File::create(path)?;
    write_schedule_csv(goals, file)
}

fn format_optional_date(date: Option<NaiveDate>) -> String {
    date.map(format_date).unwrap_or_default()
}

fn format_number(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
