use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Rank used for goals with a missing or unrecognised priority.
pub const UNRANKED: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Priority {
    Critical,
    Important,
    Next,
    #[serde(rename = "Sometime Maybe")]
    SometimeMaybe,
}

impl Priority {
    /// Sort rank, 1 is scheduled first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Critical => 1,
            Priority::Important => 2,
            Priority::Next => 3,
            Priority::SometimeMaybe => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::Important => "Important",
            Priority::Next => "Next",
            Priority::SometimeMaybe => "Sometime Maybe",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "critical" => Ok(Priority::Critical),
            "important" => Ok(Priority::Important),
            "next" => Ok(Priority::Next),
            "sometimemaybe" => Ok(Priority::SometimeMaybe),
            _ => Err(format!("unknown priority '{s}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Duration multiplier applied to template task durations.
    pub fn scale(self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 1.5,
            Difficulty::Hard => 2.0,
        }
    }

    /// Weeks shown by the simplified Gantt view.
    pub fn template_weeks(self) -> u32 {
        match self {
            Difficulty::Easy => 4,
            Difficulty::Medium => 6,
            Difficulty::Hard => 8,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Missing difficulty behaves as Easy.
    pub fn or_default(difficulty: Option<Difficulty>) -> Difficulty {
        difficulty.unwrap_or_default()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(format!("unknown difficulty '{s}'")),
        }
    }
}

/// An initiative in the portfolio. Field names follow the interchange shape
/// shared with the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_priority")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_number: Option<u32>,
    #[serde(default, deserialize_with = "lenient_difficulty")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub completed_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub scheduled_start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub scheduled_end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

impl Goal {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            priority: None,
            priority_number: None,
            difficulty: None,
            parent_id: None,
            completed_date: None,
            scheduled_start_date: None,
            scheduled_end_date: None,
            order: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_priority_number(mut self, number: u32) -> Self {
        self.priority_number = Some(number);
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_completed_date(mut self, date: NaiveDate) -> Self {
        self.completed_date = Some(date);
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn is_child(&self) -> bool {
        self.parent_id.is_some()
    }

    pub fn is_completed(&self) -> bool {
        self.completed_date.is_some()
    }

    pub fn priority_rank(&self) -> u8 {
        self.priority.map(Priority::rank).unwrap_or(UNRANKED)
    }

    pub fn effective_difficulty(&self) -> Difficulty {
        Difficulty::or_default(self.difficulty)
    }

    pub fn clear_schedule(&mut self) {
        self.scheduled_start_date = None;
        self.scheduled_end_date = None;
    }
}

fn lenient_priority<'de, D>(deserializer: D) -> Result<Option<Priority>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value.parse() {
        Ok(priority) => Some(priority),
        Err(err) => {
            warn!(%err, "unrecognised goal priority, sorting last");
            None
        }
    }))
}

fn lenient_difficulty<'de, D>(deserializer: D) -> Result<Option<Difficulty>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value.parse() {
        Ok(difficulty) => Some(difficulty),
        Err(err) => {
            warn!(%err, "unrecognised goal difficulty, using Easy");
            None
        }
    }))
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match crate::dates::parse_date(&value) {
        Ok(date) => Some(date),
        Err(err) => {
            warn!(%err, "ignoring unparseable goal date");
            None
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_parsing_tolerates_spacing_and_case() {
        assert_eq!("sometime maybe".parse::<Priority>(), Ok(Priority::SometimeMaybe));
        assert_eq!("Sometime-Maybe".parse::<Priority>(), Ok(Priority::SometimeMaybe));
        assert_eq!("CRITICAL".parse::<Priority>(), Ok(Priority::Critical));
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn unknown_values_deserialize_to_defaults() {
        let goal: Goal = serde_json::from_str(
            r#"{
                "id": "g1",
                "title": "Onboarding revamp",
                "priority": "Whenever",
                "difficulty": "Brutal",
                "completedDate": "not a date"
            }"#,
        )
        .unwrap();
        assert_eq!(goal.priority, None);
        assert_eq!(goal.priority_rank(), UNRANKED);
        assert_eq!(goal.effective_difficulty(), Difficulty::Easy);
        assert_eq!(goal.completed_date, None);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let goal = Goal::new("g2", "Budget")
            .with_priority(Priority::SometimeMaybe)
            .with_difficulty(Difficulty::Hard)
            .with_parent("g1");
        let json = serde_json::to_value(&goal).unwrap();
        assert_eq!(json["priority"], "Sometime Maybe");
        assert_eq!(json["difficulty"], "Hard");
        assert_eq!(json["parentId"], "g1");
        assert!(json["scheduledStartDate"].is_null());

        let back: Goal = serde_json::from_value(json).unwrap();
        assert_eq!(back, goal);
    }
}
