//! Reminder scanning over task snapshots.
//!
//! A task is reminded when it is pending, has a parseable deadline, and the
//! start of its deadline day lies in `[now, now + lookahead]`. Overdue tasks
//! fall outside the window and are not reminded.

use crate::model::task::Task;
use chrono::{NaiveDateTime, NaiveTime, TimeDelta};
use log::debug;
use std::time::Duration;

/// Default lookahead window.
pub const DEFAULT_LOOKAHEAD_HOURS: i64 = 24;

/// Default cadence for periodic scans.
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(60);

/// One task that needs a reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder<'a> {
    /// Position of the task in the scanned sequence.
    pub index: usize,
    pub task: &'a Task,
    /// Start of the deadline day.
    pub due_at: NaiveDateTime,
    /// Time left until `due_at`; never negative.
    pub due_in: TimeDelta,
}

impl Reminder<'_> {
    /// User-facing reminder line.
    pub fn message(&self) -> String {
        let hours = self.due_in.num_hours();
        let when = if hours == 0 {
            "in less than an hour".to_string()
        } else {
            format!("in {hours}h")
        };
        format!(
            "Reminder: task '{}' is due {} ({})",
            self.task.text,
            self.due_at.date(),
            when
        )
    }
}

/// Stateless deadline scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderScanner {
    lookahead: TimeDelta,
}

impl Default for ReminderScanner {
    fn default() -> Self {
        Self {
            lookahead: TimeDelta::hours(DEFAULT_LOOKAHEAD_HOURS),
        }
    }
}

impl ReminderScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scanner with a custom window; negative values are clamped to zero.
    pub fn with_lookahead(lookahead: TimeDelta) -> Self {
        Self {
            lookahead: lookahead.max(TimeDelta::zero()),
        }
    }

    pub fn lookahead(&self) -> TimeDelta {
        self.lookahead
    }

    /// Returns the tasks needing a reminder at `now`, in input order.
    ///
    /// Tasks whose stored deadline does not parse are skipped.
    pub fn scan<'a>(&self, now: NaiveDateTime, tasks: &'a [Task]) -> Vec<Reminder<'a>> {
        // `None` when the window reaches past the last representable instant.
        let window_end = now.checked_add_signed(self.lookahead);
        tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.is_pending())
            .filter_map(|(index, task)| {
                let date = match task.deadline_date() {
                    Ok(Some(date)) => date,
                    Ok(None) => return None,
                    Err(err) => {
                        debug!(
                            "event=reminder_skip module=reminder status=skipped index={} error={}",
                            index, err
                        );
                        return None;
                    }
                };
                let due_at = date.and_time(NaiveTime::MIN);
                let beyond_window = window_end.is_some_and(|end| due_at > end);
                if due_at < now || beyond_window {
                    return None;
                }
                Some(Reminder {
                    index,
                    task,
                    due_at,
                    due_in: due_at - now,
                })
            })
            .collect()
    }
}

/// Cooperative cadence for hosts that re-scan on their own loop.
///
/// Holds only the time of the last run; the scan itself stays stateless.
#[derive(Debug, Clone)]
pub struct ReminderSchedule {
    interval: Duration,
    last_run: Option<NaiveDateTime>,
}

impl Default for ReminderSchedule {
    fn default() -> Self {
        Self::new(DEFAULT_SCAN_INTERVAL)
    }
}

impl ReminderSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True before the first run and once `interval` has elapsed since the
    /// last one. A clock that moved backwards also counts as due.
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        let Some(last_run) = self.last_run else {
            return true;
        };
        match (now - last_run).to_std() {
            Ok(elapsed) => elapsed >= self.interval,
            Err(_) => true,
        }
    }

    pub fn mark_run(&mut self, now: NaiveDateTime) {
        self.last_run = Some(now);
    }

    /// Runs `scanner` when due and records the run.
    pub fn poll<'a>(
        &mut self,
        scanner: &ReminderScanner,
        now: NaiveDateTime,
        tasks: &'a [Task],
    ) -> Option<Vec<Reminder<'a>>> {
        if !self.is_due(now) {
            return None;
        }
        self.mark_run(now);
        Some(scanner.scan(now, tasks))
    }
}
