//! Interactive numbered menu.
//!
//! Reminder checks run cooperatively: before each prompt the loop polls a
//! `ReminderSchedule`, so no background thread shares the store.

use crate::commands::{self, EditRequest, ListFilter};
use chrono::NaiveDateTime;
use lazytask_core::{ReminderScanner, ReminderSchedule, TaskRepository, TaskStore};
use log::{info, warn};
use std::io::{BufRead, Write};

const MENU: &str = "
--- Task manager ---
1. Add a task
2. Show all tasks
3. Show completed tasks
4. Show pending tasks
5. Edit a task
6. Delete a task
7. Mark a task as completed
8. Check reminders
9. Quit";

const CLEAR_DEADLINE: &str = "-";

/// Runs the menu until the user quits or input ends.
pub fn run<R, I, O>(
    store: &mut TaskStore<R>,
    input: &mut I,
    out: &mut O,
    scanner: &ReminderScanner,
    schedule: &mut ReminderSchedule,
    clock: impl Fn() -> NaiveDateTime,
) -> anyhow::Result<()>
where
    R: TaskRepository,
    I: BufRead,
    O: Write,
{
    info!("event=menu_start module=cli status=ok");
    loop {
        if let Some(reminders) = schedule.poll(scanner, clock(), store.list()) {
            commands::print_reminders(out, &reminders, true)?;
        }

        writeln!(out, "{MENU}")?;
        let Some(choice) = prompt(input, out, "Choose an option: ")? else {
            break;
        };

        let result = match choice.as_str() {
            "1" => add(store, input, out),
            "2" => commands::list(store, out, ListFilter::All),
            "3" => commands::list(store, out, ListFilter::Completed),
            "4" => commands::list(store, out, ListFilter::Pending),
            "5" => edit(store, input, out),
            "6" => with_number(input, out, "Number of the task to delete: ", |n, out| {
                commands::delete(store, out, n)
            }),
            "7" => with_number(input, out, "Number of the task to complete: ", |n, out| {
                commands::complete(store, out, n)
            }),
            "8" => commands::remind(store, out, scanner, clock(), false).map(|_| ()),
            "9" => {
                writeln!(out, "Goodbye!")?;
                break;
            }
            _ => {
                writeln!(out, "Invalid option, please try again.")?;
                Ok(())
            }
        };

        if let Err(err) = result {
            warn!("event=menu_action module=cli status=rejected choice={choice}");
            writeln!(out, "{err:#}")?;
        }
    }
    info!("event=menu_exit module=cli status=ok");
    Ok(())
}

fn add<R: TaskRepository>(
    store: &mut TaskStore<R>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let text = prompt(input, out, "Task: ")?.unwrap_or_default();
    let deadline = prompt(input, out, "Deadline (YYYY-MM-DD) or empty: ")?;
    let priority = prompt(input, out, "Priority (Low, Medium, High): ")?;
    commands::add(
        store,
        out,
        &text,
        deadline.as_deref(),
        priority.as_deref().filter(|value| !value.is_empty()),
    )
}

fn edit<R: TaskRepository>(
    store: &mut TaskStore<R>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let Some(number) = read_number(input, out, "Number of the task to edit: ")? else {
        return Ok(());
    };
    if let Some(task) = commands::number_to_index(number).and_then(|index| store.get(index)) {
        writeln!(out, "Current: {}", commands::format_task(number, task))?;
    }

    let request = EditRequest {
        text: non_empty(prompt(input, out, "New text (empty keeps current): ")?),
        deadline: deadline_change(prompt(
            input,
            out,
            "New deadline YYYY-MM-DD (empty keeps current, - clears): ",
        )?),
        priority: non_empty(prompt(input, out, "New priority (empty keeps current): ")?),
    };
    commands::edit(store, out, number, request)
}

fn with_number<I: BufRead, O: Write>(
    input: &mut I,
    out: &mut O,
    label: &str,
    action: impl FnOnce(usize, &mut O) -> anyhow::Result<()>,
) -> anyhow::Result<()> {
    match read_number(input, out, label)? {
        Some(number) => action(number, out),
        None => Ok(()),
    }
}

/// Reads a task number; prints a hint and returns `None` on bad input.
fn read_number(
    input: &mut impl BufRead,
    out: &mut impl Write,
    label: &str,
) -> anyhow::Result<Option<usize>> {
    let raw = prompt(input, out, label)?.unwrap_or_default();
    match raw.parse::<usize>() {
        Ok(number) => Ok(Some(number)),
        Err(_) => {
            writeln!(out, "Please enter a valid number.")?;
            Ok(None)
        }
    }
}

/// Prints `label` and reads one trimmed line; `None` at end of input.
fn prompt(
    input: &mut impl BufRead,
    out: &mut impl Write,
    label: &str,
) -> anyhow::Result<Option<String>> {
    write!(out, "{label}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Empty keeps the deadline, `-` clears it, anything else replaces it.
fn deadline_change(answer: Option<String>) -> Option<Option<String>> {
    match non_empty(answer)?.as_str() {
        CLEAR_DEADLINE => Some(None),
        value => Some(Some(value.to_string())),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}
