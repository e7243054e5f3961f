use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::date_key::DateKey;

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([01][0-9]|2[0-3]):[0-5][0-9]$").expect("valid time regex"));

/// Error type for input that fails validation before reaching the store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("task description is empty")]
    EmptyDescription,
    #[error("invalid time '{0}' (expected HH:MM, 24-hour)")]
    BadTime(String),
    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    BadDate(String),
    #[error("invalid task id '{0}'")]
    BadId(String),
}

/// Stable task identifier (UUID v4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        TaskId(Uuid::new_v4())
    }

    /// Deterministic id for a stored task written without one. Every read of
    /// the same list yields the same ids until they are saved.
    pub fn legacy(date: &DateKey, index: usize, time: &TaskTime, description: &str) -> Self {
        let name = format!("{}/{}/{}/{}", date, index, time, description);
        TaskId(Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()))
    }

    /// First 8 hex digits, used for display and prefix lookup
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }

    /// Whether `prefix` (hyphens ignored, case-insensitive) starts this id
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        let needle: String = prefix
            .chars()
            .filter(|c| *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        !needle.is_empty() && self.0.simple().to_string().starts_with(&needle)
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for TaskId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(TaskId)
            .map_err(|_| ValidationError::BadId(s.to_string()))
    }
}

/// Time of day as zero-padded `HH:MM`, so string order is time order
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskTime(String);

impl TaskTime {
    pub fn parse(s: &str) -> Result<TaskTime, ValidationError> {
        let s = s.trim();
        if TIME_RE.is_match(s) {
            Ok(TaskTime(s.to_string()))
        } else {
            Err(ValidationError::BadTime(s.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TaskTime {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        TaskTime::parse(&s)
    }
}

impl From<TaskTime> for String {
    fn from(t: TaskTime) -> String {
        t.0
    }
}

/// A single task on a day's list.
///
/// Serialized as `{"id", "time", "task", "done"}`; the description is stored
/// under `task`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub time: TaskTime,
    #[serde(rename = "task")]
    pub description: String,
    pub done: bool,
}

impl Task {
    /// Create a new, not yet done task with a fresh id
    pub fn new(time: TaskTime, description: String) -> Self {
        Task {
            id: TaskId::new(),
            time,
            description,
            done: false,
        }
    }

    /// The checkbox glyph shown for this task
    pub fn check_char(&self) -> char {
        if self.done { 'x' } else { ' ' }
    }
}

/// How a caller addresses a task within one date's list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRef {
    /// 0-based position in the time-sorted list
    Index(usize),
    Id(TaskId),
}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskRef::Index(i) => write!(f, "#{}", i),
            TaskRef::Id(id) => write!(f, "{}", id),
        }
    }
}

/// Validated input for adding a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub date: DateKey,
    pub time: TaskTime,
    pub description: String,
}

impl NewTask {
    /// Validate raw user input. The description is trimmed and must not be empty.
    pub fn parse(date: &str, time: &str, description: &str) -> Result<NewTask, ValidationError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        Ok(NewTask {
            date: DateKey::parse(date)?,
            time: TaskTime::parse(time)?,
            description: description.to_string(),
        })
    }
}
