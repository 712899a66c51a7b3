//! Task-related entity definitions.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a string is not one of an enumeration's values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    /// Name of the enumeration.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Urgency of a maintenance task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Must be handled first.
    Critical,
    /// Should be handled soon.
    Important,
    /// Can wait.
    Slight,
}

impl Priority {
    /// All priorities, in rank order.
    pub const ALL: [Priority; 3] = [Priority::Critical, Priority::Important, Priority::Slight];

    /// Returns the stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::Important => "important",
            Priority::Slight => "slight",
        }
    }

    /// Sort weight used when listing tasks. Lower ranks come first.
    pub fn rank(&self) -> i32 {
        match self {
            Priority::Critical => 1,
            Priority::Important => 2,
            Priority::Slight => 3,
        }
    }

    /// Ranks a raw priority value the way the list ordering does: anything
    /// that is neither critical nor important shares the last rank.
    pub fn rank_of(value: &str) -> i32 {
        value.parse::<Priority>().map_or(3, |priority| priority.rank())
    }

    /// Comma-separated list of the accepted values.
    pub fn allowed_values() -> String {
        join(Self::ALL.iter().map(Priority::as_str))
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant {
                kind: "priority",
                value: s.to_string(),
            })
    }
}

/// Whether a maintenance task is still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Work remains.
    Open,
    /// Work finished.
    Done,
}

impl Mode {
    /// All modes.
    pub const ALL: [Mode; 2] = [Mode::Open, Mode::Done];

    /// Returns the stored representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Open => "open",
            Mode::Done => "done",
        }
    }

    /// Comma-separated list of the accepted values.
    pub fn allowed_values() -> String {
        join(Self::ALL.iter().map(Mode::as_str))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant {
                kind: "mode",
                value: s.to_string(),
            })
    }
}

fn join<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values.collect::<Vec<_>>().join(", ")
}

/// A persisted maintenance task.
///
/// `priority` and `mode` hold the stored text as-is. The database enforces
/// the allowed values, so they normally parse into [`Priority`] and [`Mode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier generated by storage.
    pub taskid: i32,
    /// When the task was entered. Set by storage.
    pub entry_date: DateTime<Utc>,
    /// What needs doing.
    pub description: String,
    /// Lower-cased priority.
    pub priority: String,
    /// Lower-cased mode.
    pub mode: String,
    /// Device the task belongs to.
    pub deviceid: i32,
}

impl Task {
    /// Sort weight of this task's priority.
    pub fn priority_rank(&self) -> i32 {
        Priority::rank_of(&self.priority)
    }
}

/// Values for inserting a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// What needs doing.
    pub description: String,
    /// Lower-cased priority.
    pub priority: String,
    /// Lower-cased mode.
    pub mode: String,
    /// Device the task belongs to.
    pub deviceid: i32,
}

impl NewTask {
    /// Creates an insert payload. Priority and mode are lower-cased; whether
    /// they are allowed values is left to storage.
    pub fn new(
        description: impl Into<String>,
        priority: impl AsRef<str>,
        mode: impl AsRef<str>,
        deviceid: i32,
    ) -> Self {
        Self {
            description: description.into(),
            priority: priority.as_ref().to_lowercase(),
            mode: mode.as_ref().to_lowercase(),
            deviceid,
        }
    }
}

/// A partial update of a task's mutable columns.
///
/// Only populated slots are written. `deviceid` and `entry_date` cannot be
/// changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    /// New description.
    pub description: Option<String>,
    /// New lower-cased priority.
    pub priority: Option<String>,
    /// New lower-cased mode.
    pub mode: Option<String>,
}

impl TaskUpdate {
    /// Creates an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority, lower-cased.
    pub fn with_priority(mut self, priority: impl AsRef<str>) -> Self {
        self.priority = Some(priority.as_ref().to_lowercase());
        self
    }

    /// Sets the mode, lower-cased.
    pub fn with_mode(mut self, mode: impl AsRef<str>) -> Self {
        self.mode = Some(mode.as_ref().to_lowercase());
        self
    }

    /// Returns true if no column would change.
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.priority.is_none() && self.mode.is_none()
    }

    /// Applies the populated slots to a task.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(priority) = &self.priority {
            task.priority = priority.clone();
        }
        if let Some(mode) = &self.mode {
            task.mode = mode.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_parse_is_case_insensitive() {
        assert_eq!("CRITICAL".parse::<Priority>(), Ok(Priority::Critical));
        assert_eq!("Important".parse::<Priority>(), Ok(Priority::Important));
        assert_eq!("slight".parse::<Priority>(), Ok(Priority::Slight));
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_priority_rank() {
        assert_eq!(Priority::rank_of("critical"), 1);
        assert_eq!(Priority::rank_of("Important"), 2);
        assert_eq!(Priority::rank_of("slight"), 3);
        assert_eq!(Priority::rank_of("whenever"), 3);
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("OPEN".parse::<Mode>(), Ok(Mode::Open));
        assert_eq!("done".parse::<Mode>(), Ok(Mode::Done));
        let err = "closed".parse::<Mode>().unwrap_err();
        assert_eq!(err.to_string(), "unknown mode: closed");
    }

    #[test]
    fn test_allowed_values() {
        assert_eq!(Priority::allowed_values(), "critical, important, slight");
        assert_eq!(Mode::allowed_values(), "open, done");
    }

    #[test]
    fn test_new_task_lowercases_enumerations() {
        let task = NewTask::new("Replace belt", "CRITICAL", "Open", 4);

        assert_eq!(task.description, "Replace belt");
        assert_eq!(task.priority, "critical");
        assert_eq!(task.mode, "open");
        assert_eq!(task.deviceid, 4);
    }

    #[test]
    fn test_task_update_builder() {
        let update = TaskUpdate::new().with_mode("DONE");

        assert!(!update.is_empty());
        assert_eq!(update.mode, Some("done".to_string()));
        assert!(update.description.is_none());
        assert!(TaskUpdate::new().is_empty());
    }

    #[test]
    fn test_task_update_apply_leaves_other_columns() {
        let mut task = Task {
            taskid: 7,
            entry_date: Utc::now(),
            description: "Oil the press".to_string(),
            priority: "slight".to_string(),
            mode: "open".to_string(),
            deviceid: 2,
        };
        let before = task.clone();

        TaskUpdate::new().with_priority("Important").apply_to(&mut task);

        assert_eq!(task.priority, "important");
        assert_eq!(task.description, before.description);
        assert_eq!(task.mode, before.mode);
        assert_eq!(task.deviceid, before.deviceid);
        assert_eq!(task.entry_date, before.entry_date);
    }

    #[test]
    fn test_task_serialization_field_names() {
        let task = Task {
            taskid: 1,
            entry_date: Utc::now(),
            description: "Check sensors".to_string(),
            priority: "critical".to_string(),
            mode: "open".to_string(),
            deviceid: 3,
        };
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["taskid"], 1);
        assert_eq!(json["priority"], "critical");
        assert_eq!(json["deviceid"], 3);
        assert!(json.get("entry_date").is_some());
    }
}
