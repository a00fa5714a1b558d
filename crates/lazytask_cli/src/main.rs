//! LazyTask console front end.
//!
//! # Responsibility
//! - Resolve configuration, start logging, and open the one task store.
//! - Dispatch one-shot subcommands or run the interactive menu.

mod cli;
mod commands;
mod menu;

use clap::Parser;
use cli::{AppConfig, Cli, Command};
use commands::{EditRequest, ListFilter};
use lazytask_core::{init_logging, ReminderScanner, ReminderSchedule, TaskStore};
use log::info;
use std::io::{self, Write};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli);

    // Logging failures are non-fatal.
    if let Err(err) = config
        .log_config()
        .and_then(|log_config| init_logging(&log_config))
    {
        eprintln!("warning: logging disabled: {err}");
    }

    let mut store = TaskStore::open(&config.task_file);
    info!(
        "event=cli_start module=cli status=ok version={} count={}",
        lazytask_core::core_version(),
        store.len()
    );

    let scanner = ReminderScanner::new();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let command = cli.command.unwrap_or(Command::Menu { remind_every: 60 });

    match command {
        Command::Add {
            text,
            deadline,
            priority,
        } => commands::add(
            &mut store,
            &mut out,
            &text,
            deadline.as_deref(),
            priority.as_deref(),
        )?,
        Command::List { done, pending } => {
            commands::list(&store, &mut out, ListFilter::from_flags(done, pending))?
        }
        Command::Edit(args) => {
            let deadline = if args.clear_deadline {
                Some(None)
            } else {
                args.deadline.map(Some)
            };
            let request = EditRequest {
                text: args.text,
                deadline,
                priority: args.priority,
            };
            commands::edit(&mut store, &mut out, args.number, request)?
        }
        Command::Done { number } => commands::complete(&mut store, &mut out, number)?,
        Command::Rm { number } => commands::delete(&mut store, &mut out, number)?,
        Command::Remind => {
            commands::remind(&store, &mut out, &scanner, local_now(), false)?;
        }
        menu_command @ Command::Menu { .. } => {
            let interval = menu_command
                .remind_interval()
                .unwrap_or(lazytask_core::DEFAULT_SCAN_INTERVAL);
            let mut schedule = ReminderSchedule::new(interval);
            let stdin = io::stdin();
            let mut input = stdin.lock();
            menu::run(
                &mut store,
                &mut input,
                &mut out,
                &scanner,
                &mut schedule,
                local_now,
            )?;
        }
    }

    out.flush()?;
    Ok(())
}

fn local_now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}
