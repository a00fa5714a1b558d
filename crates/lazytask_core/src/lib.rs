//! Core domain logic for LazyTask.
//! This crate is the single source of truth for task invariants.

pub mod logging;
pub mod model;
pub mod reminder;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogConfig};
pub use model::task::{
    normalize_priority, validate_deadline, DeadlineError, Task, TaskId, DEADLINE_FORMAT,
    DEFAULT_PRIORITY,
};
pub use reminder::scan::{Reminder, ReminderScanner, ReminderSchedule, DEFAULT_SCAN_INTERVAL};
pub use repo::task_file::{
    JsonFileTaskRepository, MemoryTaskRepository, RepoError, RepoResult, TaskRepository,
};
pub use service::task_store::{StoreError, StoreResult, TaskEdit, TaskStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
