//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Mail-driven personal task manager.
#[derive(Debug, Parser)]
#[command(name = "mailtask", version, about)]
pub struct Cli {
    /// Database file path (defaults to the user data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Directory for rolling log files; logging is off when unset
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log level for file logging
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reset the database and load the demo dataset
    Demo,

    /// Pull the action-required folder from the demo mailbox
    Sync,

    /// Show stats, the priority list and upcoming deadlines
    Agenda,

    /// Task operations
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },

    /// Email operations
    Email {
        #[command(subcommand)]
        command: EmailCommand,
    },

    /// Project operations
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },

    /// Month calendar with tasks per day
    Calendar {
        /// Month to show as YYYY-MM (defaults to the current month)
        #[arg(long)]
        month: Option<String>,
    },

    /// Available hours for the working day
    Hours,

    /// Project Gantt chart
    Gantt,
}

#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// List tasks
    List(TaskListArgs),

    /// Add a new task
    Add(TaskAddArgs),

    /// Mark a task completed
    Done {
        /// Task id (a unique prefix is enough)
        id: String,
    },

    /// Return a completed task to the active list
    Reopen {
        /// Task id (a unique prefix is enough)
        id: String,
    },

    /// Delete a task permanently
    Delete {
        /// Task id (a unique prefix is enough)
        id: String,
    },

    /// Remove all completed tasks
    ClearCompleted,

    /// Full-text search over title and description
    Search {
        /// The search query
        query: String,

        /// Include completed tasks
        #[arg(long)]
        all: bool,
    },
}

#[derive(Debug, Args)]
pub struct TaskListArgs {
    /// Sort order
    #[arg(short, long, value_enum, default_value = "due")]
    pub sort: SortArg,

    /// Show completed tasks instead of active ones
    #[arg(long)]
    pub completed: bool,

    /// Only tasks in one due bucket
    #[arg(short, long, value_enum)]
    pub bucket: Option<BucketArg>,

    /// Only tasks of one project (id prefix or exact name)
    #[arg(long)]
    pub project: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct TaskAddArgs {
    /// Task title
    pub title: String,

    /// Due date as YYYY-MM-DD
    #[arg(long)]
    pub due: String,

    /// Due time as HH:MM
    #[arg(long)]
    pub time: Option<String>,

    /// Priority
    #[arg(short, long, value_enum, default_value = "medium")]
    pub priority: PriorityArg,

    /// Longer description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Owning project id (a unique prefix is enough)
    #[arg(long)]
    pub project: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum EmailCommand {
    /// List messages from the action-required folder
    List {
        /// Listing filter
        #[arg(short, long, value_enum, default_value = "all")]
        filter: FilterArg,
    },

    /// Mark one message as read
    Read {
        /// Message id
        id: String,
    },

    /// Convert one message (or all unconverted ones) into tasks
    Convert {
        /// Message id; omit together with --all
        id: Option<String>,

        /// Convert every message without a task
        #[arg(long)]
        all: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// List projects with progress and deadline state
    List {
        /// Show the schedule timeline instead of the grid summary
        #[arg(long)]
        timeline: bool,
    },

    /// Create a new project
    Add(ProjectAddArgs),

    /// Mark a milestone completed
    MilestoneDone {
        /// Milestone id
        id: String,
    },

    /// Delete a project; its tasks are detached, not deleted
    Delete {
        /// Project id (a unique prefix is enough)
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct ProjectAddArgs {
    /// Project name
    pub name: String,

    /// Display color as #RRGGBB
    #[arg(long, default_value = "#007AFF")]
    pub color: String,

    /// Longer description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Schedule start as YYYY-MM-DD
    #[arg(long)]
    pub start: Option<String>,

    /// Schedule end as YYYY-MM-DD
    #[arg(long)]
    pub end: Option<String>,

    /// Hard deadline as YYYY-MM-DD
    #[arg(long)]
    pub deadline: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    /// Earliest due date first
    Due,
    /// Most urgent first
    Priority,
    /// Newest first
    Newest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BucketArg {
    Overdue,
    Today,
    Week,
    Later,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PriorityArg {
    Urgent,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    All,
    Unread,
    Flagged,
}
