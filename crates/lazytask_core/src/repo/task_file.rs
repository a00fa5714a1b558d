//! Task list persistence contracts and the JSON flat-file implementation.
//!
//! # Responsibility
//! - Load and save the complete ordered task list.
//! - Keep file layout and JSON encoding inside the persistence boundary.
//!
//! # Invariants
//! - Saves go through a temporary sibling file renamed over the target, so
//!   readers see either the old list or the new one.
//! - Loaded lists never contain two tasks with the same id.

use crate::model::task::{normalize_deadline, normalize_priority, Task, TaskId};
use log::{debug, error, info};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error for task list load/save operations.
#[derive(Debug)]
pub enum RepoError {
    Io(std::io::Error),
    Json(serde_json::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "task file I/O failed: {err}"),
            Self::Json(err) => write!(f, "task file encoding failed: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Repository interface for whole-list task persistence.
pub trait TaskRepository {
    /// Loads the persisted list in stored order.
    ///
    /// Returns an empty list when nothing has been persisted yet.
    fn load(&self) -> RepoResult<Vec<Task>>;

    /// Replaces the persisted list with `tasks`.
    fn save(&mut self, tasks: &[Task]) -> RepoResult<()>;

    /// Human-readable location used in diagnostics.
    fn describe(&self) -> String;
}

/// JSON flat-file task repository.
pub struct JsonFileTaskRepository {
    path: PathBuf,
}

impl JsonFileTaskRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn write_replace(&self, tasks: &[Task]) -> RepoResult<()> {
        let dir = self.parent_dir();
        std::fs::create_dir_all(&dir)?;

        let mut json = serde_json::to_vec_pretty(tasks)?;
        json.push(b'\n');

        let mut staged = NamedTempFile::new_in(&dir)?;
        staged.write_all(&json)?;
        staged.as_file().sync_all()?;
        staged.persist(&self.path).map_err(|err| RepoError::Io(err.error))?;
        Ok(())
    }
}

impl TaskRepository for JsonFileTaskRepository {
    fn load(&self) -> RepoResult<Vec<Task>> {
        let started_at = Instant::now();
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!("event=tasks_load module=repo status=ok source=missing_file count=0");
                return Ok(Vec::new());
            }
            Err(err) => {
                error!(
                    "event=tasks_load module=repo status=error error_code=read_failed error={}",
                    err
                );
                return Err(err.into());
            }
        };

        let tasks = decode_task_list(&raw)?;
        info!(
            "event=tasks_load module=repo status=ok source=file count={} duration_ms={}",
            tasks.len(),
            started_at.elapsed().as_millis()
        );
        Ok(tasks)
    }

    fn save(&mut self, tasks: &[Task]) -> RepoResult<()> {
        let started_at = Instant::now();
        match self.write_replace(tasks) {
            Ok(()) => {
                debug!(
                    "event=tasks_save module=repo status=ok count={} duration_ms={}",
                    tasks.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=tasks_save module=repo status=error count={} duration_ms={} error={}",
                    tasks.len(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory task repository for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryTaskRepository {
    tasks: Vec<Task>,
    save_count: usize,
}

impl MemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with an already-persisted list.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            save_count: 0,
        }
    }

    /// Last saved list.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl TaskRepository for MemoryTaskRepository {
    fn load(&self) -> RepoResult<Vec<Task>> {
        Ok(self.tasks.clone())
    }

    fn save(&mut self, tasks: &[Task]) -> RepoResult<()> {
        self.tasks = tasks.to_vec();
        self.save_count += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

fn decode_task_list(raw: &str) -> RepoResult<Vec<Task>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut tasks: Vec<Task> = serde_json::from_str(raw)?;
    let mut seen = HashSet::<TaskId>::with_capacity(tasks.len());
    for task in &mut tasks {
        // Older writers stored blank fields as `""`.
        task.deadline = normalize_deadline(task.deadline.take());
        task.priority = normalize_priority(Some(task.priority.as_str()));
        if !seen.insert(task.id) {
            return Err(RepoError::InvalidData(format!(
                "duplicate task id `{}`",
                task.id
            )));
        }
    }
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::{decode_task_list, RepoError};

    #[test]
    fn decode_accepts_legacy_records_without_ids() {
        let raw = r#"[
            {"task": "Buy milk", "completed": false, "deadline": "2025-01-10", "priority": "High"},
            {"task": "Call bank", "completed": true, "deadline": null, "priority": "Moyenne"}
        ]"#;

        let tasks = decode_task_list(raw).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].text, "Buy milk");
        assert_eq!(tasks[0].deadline.as_deref(), Some("2025-01-10"));
        assert!(tasks[1].completed);
        assert_eq!(tasks[1].priority, "Moyenne");
        assert_ne!(tasks[0].id, tasks[1].id);
    }

    #[test]
    fn decode_normalizes_blank_deadline_and_priority() {
        let raw = r#"[{"task": "Acheter du pain", "completed": false, "deadline": "", "priority": ""}]"#;

        let tasks = decode_task_list(raw).unwrap();
        assert_eq!(tasks[0].deadline, None);
        assert_eq!(tasks[0].priority, "Medium");
    }

    #[test]
    fn decode_treats_blank_file_as_empty() {
        assert!(decode_task_list("  \n").unwrap().is_empty());
    }

    #[test]
    fn decode_rejects_duplicate_ids() {
        let raw = r#"[
            {"id": "11111111-2222-4333-8444-555555555555", "task": "a", "completed": false, "deadline": null, "priority": "Low"},
            {"id": "11111111-2222-4333-8444-555555555555", "task": "b", "completed": false, "deadline": null, "priority": "Low"}
        ]"#;

        let err = decode_task_list(raw).unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(message) if message.contains("duplicate")));
    }

    #[test]
    fn decode_rejects_non_list_payload() {
        let err = decode_task_list(r#"{"task": "lonely"}"#).unwrap_err();
        assert!(matches!(err, RepoError::Json(_)));
    }
}
