//! Task store use-case service.
//!
//! # Responsibility
//! - Provide create/update/delete/complete/query entry points over the
//!   ordered task list.
//! - Persist the full list after every mutation through a `TaskRepository`.
//!
//! # Invariants
//! - Order is insertion order; deletion shifts later positions down by one.
//! - After every call returns, the in-memory list equals the last
//!   successfully persisted list. A failed save rolls the mutation back.
//! - Unknown positions or ids are reported as errors and never persist.
//! - The store never validates task text or deadline strings.

use crate::model::task::{normalize_deadline, normalize_priority, Task, TaskId};
use crate::repo::task_file::{JsonFileTaskRepository, RepoError, TaskRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type StoreResult<T> = Result<T, StoreError>;

/// Error returned by task store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Persistence failure; the in-memory list was left unchanged.
    Repo(RepoError),
    /// Positional index does not name a task.
    IndexOutOfRange { index: usize, len: usize },
    /// No task carries this id.
    NotFound(TaskId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "task index {index} out of range (len {len})")
            }
            Self::NotFound(id) => write!(f, "task not found: {id}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::IndexOutOfRange { .. } | Self::NotFound(_) => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Replacement values for [`TaskStore::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEdit {
    pub text: String,
    pub deadline: Option<String>,
    /// Omitted or blank falls back to the default priority.
    pub priority: Option<String>,
}

/// Authoritative, persisted collection of task records.
pub struct TaskStore<R: TaskRepository> {
    repo: R,
    tasks: Vec<Task>,
}

impl TaskStore<JsonFileTaskRepository> {
    /// Opens the store backed by a JSON file at `path`.
    ///
    /// A missing or unreadable file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(JsonFileTaskRepository::new(path))
    }

    /// Backing file path.
    pub fn path(&self) -> &std::path::Path {
        self.repo.path()
    }
}

impl<R: TaskRepository> TaskStore<R> {
    /// Creates a store and loads its initial list from `repo`.
    ///
    /// Load failures are logged and leave the store empty; the persisted
    /// file is only touched again on the next mutation.
    pub fn new(repo: R) -> Self {
        let tasks = match repo.load() {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!(
                    "event=store_open module=store status=degraded source={} error={}",
                    repo.describe(),
                    err
                );
                Vec::new()
            }
        };
        info!(
            "event=store_open module=store status=ok count={}",
            tasks.len()
        );
        Self { repo, tasks }
    }

    /// Re-reads the persisted list, replacing the in-memory one.
    ///
    /// Unlike construction, a failed load is returned and the current list
    /// is kept.
    pub fn reload(&mut self) -> StoreResult<()> {
        self.tasks = self.repo.load()?;
        Ok(())
    }

    /// Appends a new pending task and persists.
    ///
    /// # Contract
    /// - `priority` defaults to `Medium` when omitted or blank.
    /// - `text` and `deadline` are stored as given.
    /// - Returns the new task's stable id.
    pub fn create(
        &mut self,
        text: impl Into<String>,
        deadline: Option<String>,
        priority: Option<String>,
    ) -> StoreResult<TaskId> {
        let task = Task::new(text, deadline, priority);
        let id = task.id;
        self.mutate("create", |tasks| {
            tasks.push(task);
            Ok(())
        })?;
        Ok(id)
    }

    /// Overwrites text, deadline and priority at `index`; keeps `completed`.
    pub fn update(&mut self, index: usize, edit: TaskEdit) -> StoreResult<()> {
        self.mutate("update", |tasks| {
            let task = task_at_mut(tasks, index)?;
            apply_edit(task, edit);
            Ok(())
        })
    }

    /// Removes the task at `index` and returns it.
    pub fn delete(&mut self, index: usize) -> StoreResult<Task> {
        self.mutate("delete", |tasks| {
            check_index(tasks, index)?;
            Ok(tasks.remove(index))
        })
    }

    /// Marks the task at `index` completed. Idempotent.
    pub fn complete(&mut self, index: usize) -> StoreResult<()> {
        self.mutate("complete", |tasks| {
            task_at_mut(tasks, index)?.completed = true;
            Ok(())
        })
    }

    /// Same as [`Self::update`], addressed by stable id.
    pub fn update_by_id(&mut self, id: TaskId, edit: TaskEdit) -> StoreResult<()> {
        let index = self.position_of(id).ok_or(StoreError::NotFound(id))?;
        self.update(index, edit)
    }

    /// Same as [`Self::delete`], addressed by stable id.
    pub fn delete_by_id(&mut self, id: TaskId) -> StoreResult<Task> {
        let index = self.position_of(id).ok_or(StoreError::NotFound(id))?;
        self.delete(index)
    }

    /// Same as [`Self::complete`], addressed by stable id.
    pub fn complete_by_id(&mut self, id: TaskId) -> StoreResult<()> {
        let index = self.position_of(id).ok_or(StoreError::NotFound(id))?;
        self.complete(index)
    }

    /// Ordered read-only snapshot of every task.
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    /// Lazily filtered view of tasks with the given completion state.
    pub fn list_by_status(&self, completed: bool) -> impl Iterator<Item = &Task> + '_ {
        self.tasks
            .iter()
            .filter(move |task| task.completed == completed)
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn get_by_id(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Current position of the task with `id`.
    pub fn position_of(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Writes the full in-memory list through the repository.
    pub fn save(&mut self) -> StoreResult<()> {
        self.repo.save(&self.tasks)?;
        Ok(())
    }

    /// Applies `op` to a working copy, persists it, then commits it.
    ///
    /// Nothing is written when `op` fails, and the in-memory list is left
    /// untouched when the save fails.
    fn mutate<T>(
        &mut self,
        op_name: &'static str,
        op: impl FnOnce(&mut Vec<Task>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut working = self.tasks.clone();
        let output = match op(&mut working) {
            Ok(output) => output,
            Err(err) => {
                warn!(
                    "event=task_{} module=store status=rejected error={}",
                    op_name, err
                );
                return Err(err);
            }
        };

        self.repo.save(&working)?;
        self.tasks = working;
        info!(
            "event=task_{} module=store status=ok count={}",
            op_name,
            self.tasks.len()
        );
        Ok(output)
    }
}

fn check_index(tasks: &[Task], index: usize) -> StoreResult<()> {
    if index < tasks.len() {
        Ok(())
    } else {
        Err(StoreError::IndexOutOfRange {
            index,
            len: tasks.len(),
        })
    }
}

fn task_at_mut(tasks: &mut [Task], index: usize) -> StoreResult<&mut Task> {
    check_index(tasks, index)?;
    Ok(&mut tasks[index])
}

fn apply_edit(task: &mut Task, edit: TaskEdit) {
    task.text = edit.text;
    task.deadline = normalize_deadline(edit.deadline);
    task.priority = normalize_priority(edit.priority.as_deref());
}

#[cfg(test)]
mod tests {
    use super::{StoreError, TaskEdit, TaskStore};
    use crate::model::task::Task;
    use crate::repo::task_file::MemoryTaskRepository;

    fn edit(text: &str, deadline: Option<&str>, priority: Option<&str>) -> TaskEdit {
        TaskEdit {
            text: text.to_string(),
            deadline: deadline.map(str::to_string),
            priority: priority.map(str::to_string),
        }
    }

    #[test]
    fn new_store_loads_persisted_list() {
        let seeded = vec![Task::new("seeded", None, Some("Low".to_string()))];
        let store = TaskStore::new(MemoryTaskRepository::with_tasks(seeded.clone()));

        assert_eq!(store.list(), seeded.as_slice());
        assert_eq!(store.repo().save_count(), 0);
    }

    #[test]
    fn every_mutation_saves_once() {
        let mut store = TaskStore::new(MemoryTaskRepository::new());

        store.create("a", None, None).unwrap();
        store.create("b", None, None).unwrap();
        store.complete(0).unwrap();
        store.update(1, edit("b2", None, Some("High"))).unwrap();
        store.delete(0).unwrap();

        assert_eq!(store.repo().save_count(), 5);
        assert_eq!(store.repo().tasks(), store.list());
    }

    #[test]
    fn out_of_range_operations_do_not_save() {
        let mut store = TaskStore::new(MemoryTaskRepository::new());
        store.create("only", None, None).unwrap();

        let err = store.complete(1).unwrap_err();
        assert!(matches!(err, StoreError::IndexOutOfRange { index: 1, len: 1 }));
        assert!(store.update(7, edit("x", None, None)).is_err());
        assert!(store.delete(usize::MAX).is_err());

        assert_eq!(store.repo().save_count(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn update_blank_priority_falls_back_to_default() {
        let mut store = TaskStore::new(MemoryTaskRepository::new());
        store
            .create("report", Some("2025-03-01".to_string()), Some("High".to_string()))
            .unwrap();

        store.update(0, edit("report v2", Some(""), Some(" "))).unwrap();

        let task = store.get(0).unwrap();
        assert_eq!(task.text, "report v2");
        assert_eq!(task.deadline, None);
        assert_eq!(task.priority, "Medium");
    }

    #[test]
    fn id_addressing_survives_deletion_of_earlier_tasks() {
        let mut store = TaskStore::new(MemoryTaskRepository::new());
        let first = store.create("first", None, None).unwrap();
        let second = store.create("second", None, None).unwrap();

        store.delete_by_id(first).unwrap();
        assert_eq!(store.position_of(second), Some(0));

        store.complete_by_id(second).unwrap();
        assert!(store.get_by_id(second).unwrap().completed);

        let err = store.complete_by_id(first).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == first));
    }
}
