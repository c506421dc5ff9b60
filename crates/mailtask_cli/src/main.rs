//! `mailtask` executable entry point.
//!
//! # Responsibility
//! - Parse arguments, bootstrap logging and dispatch to command handlers.

mod cli;
mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use commands::{open_context, resolve_db_path};
use mailtask_core::{default_log_level, init_logging};
use std::path::PathBuf;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let log_dir = absolute(log_dir.clone())?;
        let level = match cli.log_level.as_deref() {
            Some(level) => level,
            None => default_log_level(),
        };
        init_logging(level, &log_dir.to_string_lossy())
            .with_context(|| format!("cannot initialize logging in {}", log_dir.display()))?;
    }

    let db_path = resolve_db_path(cli.db)?;

    match cli.command {
        Command::Demo => commands::run_demo(&db_path),
        Command::Sync => commands::run_sync(&open_context(&db_path)?),
        Command::Agenda => commands::run_agenda(&open_context(&db_path)?),
        Command::Task { command } => commands::run_task(&open_context(&db_path)?, command),
        Command::Email { command } => commands::run_email(&open_context(&db_path)?, command),
        Command::Project { command } => commands::run_project(&open_context(&db_path)?, command),
        Command::Calendar { month } => commands::run_calendar(&open_context(&db_path)?, month),
        Command::Hours => commands::run_hours(&open_context(&db_path)?),
        Command::Gantt => commands::run_gantt(&open_context(&db_path)?),
    }
}

fn absolute(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path)
    } else {
        let cwd = std::env::current_dir().context("cannot resolve current directory")?;
        Ok(cwd.join(path))
    }
}
