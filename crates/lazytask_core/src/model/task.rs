//! Task domain model.
//!
//! # Responsibility
//! - Define the persisted task record and its wire field names.
//! - Provide deadline parsing and priority defaulting helpers.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `deadline` is stored verbatim; only front ends validate it, through
//!   [`validate_deadline`].
//! - `priority` is free text and never empty once normalized.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Priority applied when the caller omits one or passes an empty label.
pub const DEFAULT_PRIORITY: &str = "Medium";

/// Wire and input format for deadlines.
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

static DEADLINE_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid deadline regex"));

/// Stable identifier for a task, independent of its list position.
pub type TaskId = Uuid;

/// One to-do item.
///
/// Serialized field names match the flat-file format: `task`, `completed`,
/// `deadline`, `priority`. Records written before ids existed get a fresh
/// `id` when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable identity; unchanged by edits and by moves in the list.
    #[serde(default = "new_task_id")]
    pub id: TaskId,
    /// Human-readable description.
    #[serde(rename = "task")]
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    /// ISO `YYYY-MM-DD` date, or `None` for "no deadline".
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: String,
}

impl Task {
    /// Creates a pending task with a generated stable ID.
    ///
    /// # Invariants
    /// - `completed` starts as `false`.
    /// - An empty deadline string is treated as no deadline.
    /// - An omitted or blank priority becomes [`DEFAULT_PRIORITY`].
    pub fn new(
        text: impl Into<String>,
        deadline: Option<String>,
        priority: Option<String>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), text, deadline, priority)
    }

    /// Creates a pending task with a caller-provided stable ID.
    pub fn with_id(
        id: TaskId,
        text: impl Into<String>,
        deadline: Option<String>,
        priority: Option<String>,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            deadline: normalize_deadline(deadline),
            priority: normalize_priority(priority.as_deref()),
        }
    }

    /// Returns whether the task still needs doing.
    pub fn is_pending(&self) -> bool {
        !self.completed
    }

    /// Parses the stored deadline.
    ///
    /// Returns `Ok(None)` when there is no deadline. Stored strings are not
    /// validated on write, so a malformed value surfaces here as an error.
    pub fn deadline_date(&self) -> Result<Option<NaiveDate>, DeadlineError> {
        match self.deadline.as_deref() {
            Some(value) => validate_deadline(value).map(Some),
            None => Ok(None),
        }
    }
}

/// Deadline input rejected by [`validate_deadline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeadlineError {
    /// Input was empty or whitespace.
    Empty,
    /// Input is not shaped like `YYYY-MM-DD`.
    Format(String),
    /// Input is shaped correctly but names no calendar day (e.g. `2025-02-30`).
    Calendar(String),
}

impl Display for DeadlineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "deadline cannot be empty"),
            Self::Format(value) => {
                write!(f, "deadline `{value}` must use the YYYY-MM-DD format")
            }
            Self::Calendar(value) => write!(f, "deadline `{value}` is not a valid date"),
        }
    }
}

impl Error for DeadlineError {}

/// Validates a deadline string typed by a user.
///
/// Front ends call this before handing a deadline to the store; the store
/// itself never does.
pub fn validate_deadline(input: &str) -> Result<NaiveDate, DeadlineError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DeadlineError::Empty);
    }
    if !DEADLINE_SHAPE_RE.is_match(trimmed) {
        return Err(DeadlineError::Format(trimmed.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DEADLINE_FORMAT)
        .map_err(|_| DeadlineError::Calendar(trimmed.to_string()))
}

/// Returns the trimmed priority label, or [`DEFAULT_PRIORITY`] when blank.
pub fn normalize_priority(priority: Option<&str>) -> String {
    match priority.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => DEFAULT_PRIORITY.to_string(),
    }
}

/// Maps an empty deadline string to `None`; other values pass through as-is.
pub fn normalize_deadline(deadline: Option<String>) -> Option<String> {
    deadline.filter(|value| !value.trim().is_empty())
}

fn new_task_id() -> TaskId {
    Uuid::new_v4()
}

fn default_priority() -> String {
    DEFAULT_PRIORITY.to_string()
}
