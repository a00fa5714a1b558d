//! Command-line arguments and runtime configuration.
//!
//! # Responsibility
//! - Parse flags, environment fallbacks and subcommands.
//! - Resolve default task file and log directory locations.

use clap::{Args, Parser, Subcommand};
use lazytask_core::{default_log_level, LogConfig};
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR_NAME: &str = "lazytask";
const TASK_FILE_NAME: &str = "tasks.json";
const LOG_DIR_NAME: &str = "logs";

/// Personal task tracker with deadline reminders.
#[derive(Debug, Parser)]
#[command(name = "lazytask", version, about)]
pub struct Cli {
    /// Task list file.
    #[arg(long, env = "LAZYTASK_FILE", global = true)]
    pub file: Option<PathBuf>,

    /// Directory for rolling log files.
    #[arg(long, env = "LAZYTASK_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error.
    #[arg(long, env = "LAZYTASK_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a task.
    Add {
        text: String,
        /// Deadline as YYYY-MM-DD.
        #[arg(long)]
        deadline: Option<String>,
        /// Priority label (Low, Medium, High, ...).
        #[arg(long)]
        priority: Option<String>,
    },
    /// List tasks.
    List {
        /// Only completed tasks.
        #[arg(long, conflicts_with = "pending")]
        done: bool,
        /// Only pending tasks.
        #[arg(long)]
        pending: bool,
    },
    /// Edit a task; omitted fields keep their current value.
    Edit(EditArgs),
    /// Mark a task completed.
    Done { number: usize },
    /// Delete a task.
    Rm { number: usize },
    /// Print reminders for deadlines within the next 24 hours.
    Remind,
    /// Interactive menu (default).
    Menu {
        /// Seconds between automatic reminder checks.
        #[arg(long, default_value_t = 60)]
        remind_every: u64,
    },
}

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Task number as shown by `list`.
    pub number: usize,
    #[arg(long)]
    pub text: Option<String>,
    /// New deadline as YYYY-MM-DD.
    #[arg(long, conflicts_with = "clear_deadline")]
    pub deadline: Option<String>,
    /// Remove the deadline.
    #[arg(long)]
    pub clear_deadline: bool,
    #[arg(long)]
    pub priority: Option<String>,
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub task_file: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl AppConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        let app_dir = dirs::data_dir().map(|dir| dir.join(APP_DIR_NAME));

        let task_file = cli.file.clone().unwrap_or_else(|| match &app_dir {
            Some(dir) => dir.join(TASK_FILE_NAME),
            None => PathBuf::from(TASK_FILE_NAME),
        });

        let log_dir = cli.log_dir.clone().unwrap_or_else(|| match &app_dir {
            Some(dir) => dir.join(LOG_DIR_NAME),
            None => std::env::temp_dir().join(APP_DIR_NAME).join(LOG_DIR_NAME),
        });

        Self {
            task_file,
            log_level: cli
                .log_level
                .clone()
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: absolutize(&log_dir),
        }
    }

    pub fn log_config(&self) -> Result<LogConfig, String> {
        LogConfig::new(&self.log_level, &self.log_dir)
    }
}

impl Command {
    pub fn remind_interval(&self) -> Option<Duration> {
        match self {
            Self::Menu { remind_every } => Some(Duration::from_secs(*remind_every)),
            _ => None,
        }
    }
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}
