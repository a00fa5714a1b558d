//! Front-end command handlers shared by one-shot subcommands and the menu.
//!
//! # Responsibility
//! - Validate user input (non-empty text, `YYYY-MM-DD` deadlines) before it
//!   reaches the store.
//! - Translate 1-based task numbers into store positions.
//! - Render tasks and reminders as console lines.

use anyhow::{bail, Context};
use chrono::NaiveDateTime;
use lazytask_core::{
    validate_deadline, Reminder, ReminderScanner, StoreError, Task, TaskEdit, TaskRepository,
    TaskStore, DEADLINE_FORMAT,
};
use log::info;
use std::io::Write;

/// Which tasks a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFilter {
    All,
    Completed,
    Pending,
}

impl ListFilter {
    pub fn from_flags(done: bool, pending: bool) -> Self {
        match (done, pending) {
            (true, _) => Self::Completed,
            (_, true) => Self::Pending,
            _ => Self::All,
        }
    }
}

/// Field changes for an edit; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditRequest {
    pub text: Option<String>,
    /// `Some(None)` clears the deadline.
    pub deadline: Option<Option<String>>,
    pub priority: Option<String>,
}

/// Converts a user-facing 1-based number into a store index.
pub fn number_to_index(number: usize) -> Option<usize> {
    number.checked_sub(1)
}

/// `N. [X] text (deadline: D) [priority: P]`
pub fn format_task(number: usize, task: &Task) -> String {
    let status = if task.completed { "[X]" } else { "[ ]" };
    let deadline = match task.deadline.as_deref() {
        Some(deadline) => format!(" (deadline: {deadline})"),
        None => String::new(),
    };
    format!(
        "{number}. {status} {}{deadline} [priority: {}]",
        task.text, task.priority
    )
}

pub fn add<R: TaskRepository>(
    store: &mut TaskStore<R>,
    out: &mut impl Write,
    text: &str,
    deadline: Option<&str>,
    priority: Option<&str>,
) -> anyhow::Result<()> {
    let text = require_text(text)?;
    let deadline = checked_deadline(deadline)?;
    store.create(text, deadline, priority.map(str::to_string))?;

    if let Some(task) = store.list().last() {
        writeln!(out, "Added: {}", format_task(store.len(), task))?;
    }
    Ok(())
}

pub fn list<R: TaskRepository>(
    store: &TaskStore<R>,
    out: &mut impl Write,
    filter: ListFilter,
) -> anyhow::Result<()> {
    let (wanted, empty_message) = match filter {
        ListFilter::All => (None, "No tasks saved."),
        ListFilter::Completed => (Some(true), "No completed tasks."),
        ListFilter::Pending => (Some(false), "No pending tasks."),
    };
    // Numbers are store positions, so `done`/`rm`/`edit` accept them as shown.
    let tasks: Vec<(usize, &Task)> = store
        .list()
        .iter()
        .enumerate()
        .filter(|(_, task)| match wanted {
            Some(completed) => task.completed == completed,
            None => true,
        })
        .collect();

    if tasks.is_empty() {
        writeln!(out, "{empty_message}")?;
        return Ok(());
    }
    for (index, task) in tasks {
        writeln!(out, "{}", format_task(index + 1, task))?;
    }
    Ok(())
}

pub fn edit<R: TaskRepository>(
    store: &mut TaskStore<R>,
    out: &mut impl Write,
    number: usize,
    request: EditRequest,
) -> anyhow::Result<()> {
    let index = resolve_index(store, number)?;
    let current = store
        .get(index)
        .cloned()
        .with_context(|| format!("Invalid task number: {number}"))?;

    let text = match request.text {
        Some(text) => require_text(&text)?,
        None => current.text,
    };
    let deadline = match request.deadline {
        Some(deadline) => checked_deadline(deadline.as_deref())?,
        None => current.deadline,
    };
    let priority = request.priority.or(Some(current.priority));

    store
        .update(
            index,
            TaskEdit {
                text,
                deadline,
                priority,
            },
        )
        .map_err(|err| store_error(err, number))?;

    if let Some(task) = store.get(index) {
        writeln!(out, "Updated: {}", format_task(number, task))?;
    }
    Ok(())
}

pub fn complete<R: TaskRepository>(
    store: &mut TaskStore<R>,
    out: &mut impl Write,
    number: usize,
) -> anyhow::Result<()> {
    let index = resolve_index(store, number)?;
    store
        .complete(index)
        .map_err(|err| store_error(err, number))?;
    if let Some(task) = store.get(index) {
        writeln!(out, "Completed: {}", task.text)?;
    }
    Ok(())
}

pub fn delete<R: TaskRepository>(
    store: &mut TaskStore<R>,
    out: &mut impl Write,
    number: usize,
) -> anyhow::Result<()> {
    let index = resolve_index(store, number)?;
    let removed = store
        .delete(index)
        .map_err(|err| store_error(err, number))?;
    writeln!(out, "Deleted: {}", removed.text)?;
    Ok(())
}

/// Prints reminders for `now`; returns how many were printed.
pub fn remind<R: TaskRepository>(
    store: &TaskStore<R>,
    out: &mut impl Write,
    scanner: &ReminderScanner,
    now: NaiveDateTime,
    quiet_when_empty: bool,
) -> anyhow::Result<usize> {
    let reminders = scanner.scan(now, store.list());
    print_reminders(out, &reminders, quiet_when_empty)?;
    Ok(reminders.len())
}

/// Writes one line per reminder.
pub fn print_reminders(
    out: &mut impl Write,
    reminders: &[Reminder<'_>],
    quiet_when_empty: bool,
) -> anyhow::Result<()> {
    info!(
        "event=reminder_scan module=cli status=ok count={}",
        reminders.len()
    );
    if reminders.is_empty() && !quiet_when_empty {
        writeln!(out, "No upcoming deadlines.")?;
    }
    for reminder in reminders {
        writeln!(out, "{}", reminder.message())?;
    }
    Ok(())
}

fn resolve_index<R: TaskRepository>(store: &TaskStore<R>, number: usize) -> anyhow::Result<usize> {
    match number_to_index(number) {
        Some(index) if index < store.len() => Ok(index),
        _ => bail!("Invalid task number: {number}"),
    }
}

fn require_text(text: &str) -> anyhow::Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        bail!("Task text cannot be empty.");
    }
    Ok(trimmed.to_string())
}

fn checked_deadline(deadline: Option<&str>) -> anyhow::Result<Option<String>> {
    match deadline.map(str::trim) {
        Some(value) if !value.is_empty() => {
            let date = validate_deadline(value)?;
            Ok(Some(date.format(DEADLINE_FORMAT).to_string()))
        }
        _ => Ok(None),
    }
}

fn store_error(err: StoreError, number: usize) -> anyhow::Error {
    match err {
        StoreError::IndexOutOfRange { .. } => anyhow::anyhow!("Invalid task number: {number}"),
        other => anyhow::Error::new(other).context("Could not save tasks"),
    }
}
