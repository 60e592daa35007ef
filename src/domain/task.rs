//! Task domain model
//!
//! Tasks are the unit of work in the service. Their display field for name
//! lookups is `content`.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::candidate::Candidate;

#[derive(Debug, Error, PartialEq)]
pub enum PriorityError {
    #[error("Invalid priority \"{0}\". Use p1, p2, p3, or p4.")]
    Invalid(String),
}

/// Task priority as stored by the service
///
/// The wire value runs backwards from what users type: `4` is `p1`
/// (highest) and `1` is `p4` (the default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Priority(u8);

impl Priority {
    pub const LOWEST: Priority = Priority(1);

    /// Raw API value (1..=4)
    pub fn value(&self) -> u8 {
        self.0
    }

    /// User-facing label (`p1`..`p4`)
    pub fn label(&self) -> String {
        format!("p{}", 5u8.saturating_sub(self.0.clamp(1, 4)))
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::LOWEST
    }
}

impl FromStr for Priority {
    type Err = PriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let level = lower
            .strip_prefix('p')
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=4).contains(n))
            .ok_or_else(|| PriorityError::Invalid(s.to_string()))?;

        Ok(Self(5 - level))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Due date information attached to a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Due {
    /// `YYYY-MM-DD`, or a full datetime for tasks with a time
    pub date: String,

    /// Human-readable form as entered (`"every monday"`)
    #[serde(default)]
    pub string: Option<String>,

    #[serde(default)]
    pub is_recurring: bool,
}

impl Due {
    /// The calendar date, ignoring any time component
    pub fn day(&self) -> Option<NaiveDate> {
        let day = self.date.get(..10)?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }

    /// Text to show users: the original phrase if present, else the date
    pub fn display(&self) -> &str {
        self.string.as_deref().filter(|s| !s.is_empty()).unwrap_or(&self.date)
    }
}

/// An active or completed task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,

    pub content: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub project_id: String,

    #[serde(default)]
    pub section_id: Option<String>,

    #[serde(default)]
    pub parent_id: Option<String>,

    #[serde(default)]
    pub labels: Vec<String>,

    #[serde(default)]
    pub priority: Priority,

    #[serde(default)]
    pub due: Option<Due>,

    #[serde(default)]
    pub checked: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Task {
    /// Creates a bare task snapshot with default metadata
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        project_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            description: String::new(),
            project_id: project_id.into(),
            section_id: None,
            parent_id: None,
            labels: Vec::new(),
            priority: Priority::default(),
            due: None,
            checked: false,
            url: None,
        }
    }

    /// Due day, if the task has a parseable due date
    pub fn due_day(&self) -> Option<NaiveDate> {
        self.due.as_ref().and_then(Due::day)
    }

    /// True if the task was due strictly before `today`
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_day().is_some_and(|d| d < today)
    }

    /// True if the task is due on `day`
    pub fn is_due_on(&self, day: NaiveDate) -> bool {
        self.due_day() == Some(day)
    }
}

impl Candidate for Task {
    fn id(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.content
    }
}
