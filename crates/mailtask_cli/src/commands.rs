//! Command handlers.
//!
//! Handlers open the database, drive core services and print plain-text
//! renderings of the typed view models.

use crate::cli::{
    BucketArg, EmailCommand, FilterArg, PriorityArg, ProjectAddArgs, ProjectCommand, SortArg,
    TaskAddArgs, TaskCommand, TaskListArgs,
};
use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDate, NaiveTime, TimeZone};
use mailtask_core::db::open_db;
use mailtask_core::view::availability::{day_schedule, SegmentKind};
use mailtask_core::view::calendar::month_grid;
use mailtask_core::view::dashboard::{
    dashboard_stats, due_chart, hot_briefing, priority_tasks, upcoming_timeline, DueLabel,
    TimelineLabel,
};
use mailtask_core::view::gantt::{
    deadline_status, gantt_rows, gantt_window, timeline_rows, DeadlineStatus, MilestoneStatus,
    ScheduleHealth,
};
use mailtask_core::{
    body_preview, demo_dataset, seed_demo, sender_initials, search_tasks, ConvertOptions,
    DemoMailbox, DueBucket, EmailFilter, MailService, MeetingRepository, Priority, Project,
    ProjectRepository, ProjectService, SearchQuery, SettingsRepository, SqliteEmailRepository,
    SqliteMeetingRepository, SqliteProjectRepository, SqliteSettingsRepository,
    SqliteTaskRepository, Task, TaskId, TaskListQuery, TaskRepository, TaskService, TaskSort,
};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

const GANTT_TRACK_WIDTH: usize = 60;

/// Shared handler state: an open connection plus the reference clock.
pub struct AppContext {
    pub conn: Connection,
    pub today: NaiveDate,
    pub now_ms: i64,
    pub day_start_ms: i64,
}

/// Resolves the database file location.
pub fn resolve_db_path(arg: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = arg {
        return Ok(path);
    }
    let base = dirs::data_dir().ok_or_else(|| anyhow!("no user data directory available"))?;
    Ok(base.join("mailtask").join("mailtask.db"))
}

/// Opens the database and captures the local reference clock.
pub fn open_context(db_path: &Path) -> Result<AppContext> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create data directory {}", parent.display()))?;
    }
    let conn = open_db(db_path)
        .with_context(|| format!("cannot open database {}", db_path.display()))?;

    let now = Local::now();
    let today = now.date_naive();
    let midnight = today
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow!("cannot construct local midnight"))?;
    let day_start = Local
        .from_local_datetime(&midnight)
        .earliest()
        .ok_or_else(|| anyhow!("ambiguous local midnight"))?;

    Ok(AppContext {
        conn,
        today,
        now_ms: now.timestamp_millis(),
        day_start_ms: day_start.timestamp_millis(),
    })
}

/// `mailtask demo`: reset the database and seed the demo dataset.
pub fn run_demo(db_path: &Path) -> Result<()> {
    if db_path.exists() {
        std::fs::remove_file(db_path)
            .with_context(|| format!("cannot reset database {}", db_path.display()))?;
    }
    let ctx = open_context(db_path)?;

    let tasks = SqliteTaskRepository::try_new(&ctx.conn)?;
    let emails = SqliteEmailRepository::try_new(&ctx.conn)?;
    let projects = SqliteProjectRepository::try_new(&ctx.conn)?;
    let meetings = SqliteMeetingRepository::try_new(&ctx.conn)?;

    let dataset = demo_dataset(ctx.today, ctx.now_ms);
    seed_demo(&tasks, &emails, &projects, &meetings, &dataset)?;

    println!(
        "Demo data loaded: {} emails, {} tasks, {} projects, {} meetings.",
        dataset.emails.len(),
        dataset.tasks.len(),
        dataset.projects.len(),
        dataset.meetings.len()
    );
    Ok(())
}

/// `mailtask sync`: pull the demo mailbox into local storage.
pub fn run_sync(ctx: &AppContext) -> Result<()> {
    let service = MailService::new(SqliteEmailRepository::try_new(&ctx.conn)?);
    let mailbox = DemoMailbox::new(ctx.today, ctx.now_ms);

    let report = service.sync_from(&mailbox)?;
    println!(
        "Synced folder \"{}\": {} fetched, {} new, {} refreshed.",
        report.folder, report.fetched, report.inserted, report.refreshed
    );
    Ok(())
}

/// `mailtask agenda`: stats, priority list and upcoming deadlines.
pub fn run_agenda(ctx: &AppContext) -> Result<()> {
    let tasks = TaskService::new(SqliteTaskRepository::try_new(&ctx.conn)?);
    let active = tasks.list_active(TaskSort::DueDate)?;
    let completed = tasks.list_completed()?;

    let stats = dashboard_stats(&active, &completed, ctx.today, ctx.day_start_ms);
    println!(
        "{}: {} hot, {} pending, {} completed today",
        ctx.today.format("%A, %B %-d"),
        stats.hot,
        stats.pending,
        stats.completed_today
    );

    let settings = SqliteSettingsRepository::try_new(&ctx.conn)?.load_settings()?;
    if settings.daily_notification_enabled {
        // Full briefing, numbered like the daily hot-tasks popup.
        let briefing = hot_briefing(&active, ctx.today);
        if briefing.is_empty() {
            println!("\nAll caught up! No urgent tasks for today.");
        } else {
            println!("\nToday's hot tasks:");
            for entry in &briefing {
                println!(
                    "  {}. [{}] {} ({})",
                    entry.ordinal,
                    entry.task.priority.as_str(),
                    entry.task.title,
                    due_label_text(entry.label)
                );
            }
        }
    } else {
        let hot = priority_tasks(&active, ctx.today, 5);
        if hot.is_empty() {
            println!("\nAll caught up! No urgent tasks for today.");
        } else {
            println!("\nPriority tasks:");
            for entry in &hot {
                println!(
                    "  [{}] {} ({})",
                    entry.task.priority.as_str(),
                    entry.task.title,
                    due_label_text(entry.label)
                );
            }
        }
    }

    let upcoming = upcoming_timeline(&active, ctx.today, 5);
    if !upcoming.is_empty() {
        println!("\nUpcoming deadlines:");
        for row in &upcoming {
            let when = match row.label {
                TimelineLabel::Overdue => "overdue".to_string(),
                TimelineLabel::Today => "today".to_string(),
                TimelineLabel::On(date) => date.format("%b %-d").to_string(),
            };
            println!("  {when:>9}  {}", row.task.title);
        }
    }

    let chart = due_chart(&active, ctx.today);
    println!(
        "\nWorkload: {} overdue / {} today / {} this week / {} later ({} total)",
        chart.overdue, chart.due_today, chart.this_week, chart.later, chart.total
    );
    Ok(())
}

/// `mailtask task ...`
pub fn run_task(ctx: &AppContext, command: TaskCommand) -> Result<()> {
    let repo = SqliteTaskRepository::try_new(&ctx.conn)?;
    let service = TaskService::new(SqliteTaskRepository::try_new(&ctx.conn)?);

    match command {
        TaskCommand::List(args) => list_tasks(ctx, &service, &args),
        TaskCommand::Add(args) => add_task(ctx, &service, &args),
        TaskCommand::Done { id } => {
            let task_id = resolve_task_id(&repo, &id)?;
            service.complete_task(task_id, ctx.now_ms)?;
            println!("Task completed.");
            Ok(())
        }
        TaskCommand::Reopen { id } => {
            let task_id = resolve_task_id(&repo, &id)?;
            service.reopen_task(task_id)?;
            println!("Task reopened.");
            Ok(())
        }
        TaskCommand::Delete { id } => {
            let task_id = resolve_task_id(&repo, &id)?;
            service.delete_task(task_id)?;
            println!("Task deleted.");
            Ok(())
        }
        TaskCommand::ClearCompleted => {
            let removed = service.clear_completed()?;
            println!("Removed {removed} completed task(s).");
            Ok(())
        }
        TaskCommand::Search { query, all } => {
            let mut search = SearchQuery::new(query);
            search.include_completed = all;
            let hits = search_tasks(&ctx.conn, &search)?;
            if hits.is_empty() {
                println!("No matching tasks.");
            }
            for hit in hits {
                println!("{}  {}  {}", short_id(hit.task_id), hit.title, hit.snippet);
            }
            Ok(())
        }
    }
}

fn list_tasks(
    ctx: &AppContext,
    service: &TaskService<SqliteTaskRepository<'_>>,
    args: &TaskListArgs,
) -> Result<()> {
    let bucket = args.bucket.map(|bucket| match bucket {
        BucketArg::Overdue => DueBucket::Overdue,
        BucketArg::Today => DueBucket::DueToday,
        BucketArg::Week => DueBucket::ThisWeek,
        BucketArg::Later => DueBucket::Later,
    });

    let mut tasks = if args.completed {
        service.list_completed()?
    } else if let Some(project) = &args.project {
        let projects = SqliteProjectRepository::try_new(&ctx.conn)?;
        service.list_for_project(resolve_project_id(&projects, project)?)?
    } else if let Some(bucket) = bucket {
        service.list_in_bucket(bucket, ctx.today)?
    } else {
        let sort = match args.sort {
            SortArg::Due => TaskSort::DueDate,
            SortArg::Priority => TaskSort::Priority,
            SortArg::Newest => TaskSort::CreatedAt,
        };
        service.list_active(sort)?
    };

    // Project and completed listings can still narrow to one bucket.
    if args.completed || args.project.is_some() {
        if let Some(bucket) = bucket {
            tasks.retain(|task| task.due_bucket(ctx.today) == bucket);
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks.");
        return Ok(());
    }
    for task in &tasks {
        let time = task
            .due_time
            .map(|t| t.format(" %H:%M").to_string())
            .unwrap_or_default();
        let marker = if task.completed {
            "x"
        } else if task.is_overdue(ctx.today) {
            "!"
        } else {
            " "
        };
        let mail = if task.email_id.is_some() { " @mail" } else { "" };
        println!(
            "{marker} {}  {:<6}  {}{time}  {}{mail}",
            short_id(task.uuid),
            task.priority.as_str(),
            task.due_date,
            task.title
        );
    }
    Ok(())
}

fn add_task(
    ctx: &AppContext,
    service: &TaskService<SqliteTaskRepository<'_>>,
    args: &TaskAddArgs,
) -> Result<()> {
    let due_date: NaiveDate = args
        .due
        .parse()
        .with_context(|| format!("invalid due date `{}`, expected YYYY-MM-DD", args.due))?;

    let mut task = Task::new(
        args.title.clone(),
        due_date,
        priority_from_arg(args.priority),
        ctx.now_ms,
    );
    if let Some(time) = &args.time {
        task.due_time = Some(
            NaiveTime::parse_from_str(time, "%H:%M")
                .with_context(|| format!("invalid due time `{time}`, expected HH:MM"))?,
        );
    }
    if let Some(description) = &args.description {
        task.description = description.clone();
    }
    if let Some(project) = &args.project {
        let projects = SqliteProjectRepository::try_new(&ctx.conn)?;
        task.project_id = Some(resolve_project_id(&projects, project)?);
    }

    let id = service.create_task(&task)?;
    println!("Task {} created.", short_id(id));
    Ok(())
}

/// `mailtask email ...`
pub fn run_email(ctx: &AppContext, command: EmailCommand) -> Result<()> {
    let tasks = SqliteTaskRepository::try_new(&ctx.conn)?;
    let service = MailService::new(SqliteEmailRepository::try_new(&ctx.conn)?);

    match command {
        EmailCommand::List { filter } => {
            let filter = match filter {
                FilterArg::All => EmailFilter::All,
                FilterArg::Unread => EmailFilter::Unread,
                FilterArg::Flagged => EmailFilter::Flagged,
            };
            let overview = service.list_overview(&tasks, filter)?;
            if overview.is_empty() {
                println!("No emails. Run `mailtask sync` first.");
                return Ok(());
            }
            for entry in &overview {
                let email = &entry.email;
                let read = if email.is_read { " " } else { "*" };
                let flag = if email.is_flagged() { "!" } else { " " };
                let converted = if entry.task_id.is_some() { " -> task" } else { "" };
                println!(
                    "{read}{flag} [{:<2}] {}  {} <{}>{converted}",
                    sender_initials(&email.from_name),
                    email.id,
                    email.from_name,
                    email.from_address
                );
                println!("       {}", email.subject);
                if let Some(preview) = body_preview(&email.body) {
                    println!("       {preview}");
                }
            }
            Ok(())
        }
        EmailCommand::Read { id } => {
            service.mark_read(&id)?;
            println!("Email {id} marked as read.");
            Ok(())
        }
        EmailCommand::Convert { id, all } => {
            let settings = SqliteSettingsRepository::try_new(&ctx.conn)?.load_settings()?;
            let options = ConvertOptions {
                today: ctx.today,
                now_ms: ctx.now_ms,
                default_priority: settings.default_priority,
            };

            match (id, all) {
                (Some(id), false) => {
                    let task = service.convert_to_task(&tasks, &id, &options)?;
                    println!(
                        "Created task {} \"{}\" due {}.",
                        short_id(task.uuid),
                        task.title,
                        task.due_date
                    );
                    Ok(())
                }
                (None, true) => {
                    let created = service.convert_all(&tasks, &options)?;
                    println!("Converted {} email(s) to tasks.", created.len());
                    Ok(())
                }
                _ => bail!("pass either an email id or --all"),
            }
        }
    }
}

/// `mailtask project ...`
pub fn run_project(ctx: &AppContext, command: ProjectCommand) -> Result<()> {
    let repo = SqliteProjectRepository::try_new(&ctx.conn)?;
    let tasks = SqliteTaskRepository::try_new(&ctx.conn)?;
    let service = ProjectService::new(SqliteProjectRepository::try_new(&ctx.conn)?);

    match command {
        ProjectCommand::List { timeline } => {
            let projects = service.list_projects()?;
            if projects.is_empty() {
                println!("No projects yet.");
                return Ok(());
            }
            if timeline {
                print_project_timeline(ctx, &tasks, &projects)?;
            } else {
                print_project_grid(ctx, &service, &tasks, &projects)?;
            }
            Ok(())
        }
        ProjectCommand::Add(args) => {
            let mut project = Project::new(args.name.clone(), args.color.clone(), ctx.now_ms);
            if let Some(description) = &args.description {
                project.description = description.clone();
            }
            project.start_date = parse_opt_date(args.start.as_deref())?;
            project.end_date = parse_opt_date(args.end.as_deref())?;
            project.deadline = parse_opt_date(args.deadline.as_deref())?;

            let id = service.create_project(&project)?;
            println!("Project {} created.", short_id(id));
            Ok(())
        }
        ProjectCommand::MilestoneDone { id } => {
            let milestone_id = resolve_milestone_id(&repo, &id)?;
            service.set_milestone_completed(milestone_id, true)?;
            println!("Milestone completed.");
            Ok(())
        }
        ProjectCommand::Delete { id } => {
            let project_id = resolve_project_id(&repo, &id)?;
            let detached = service.delete_project(project_id)?;
            println!("Project deleted; {detached} task(s) detached.");
            Ok(())
        }
    }
}

fn parse_opt_date(value: Option<&str>) -> Result<Option<NaiveDate>> {
    value
        .map(|text| {
            text.parse()
                .with_context(|| format!("invalid date `{text}`, expected YYYY-MM-DD"))
        })
        .transpose()
}

fn resolve_milestone_id(
    repo: &SqliteProjectRepository<'_>,
    input: &str,
) -> Result<uuid::Uuid> {
    if let Ok(id) = input.parse() {
        return Ok(id);
    }

    let candidates: Vec<uuid::Uuid> = repo
        .list_projects()?
        .iter()
        .flat_map(|project| project.milestones.iter())
        .filter(|milestone| milestone.uuid.to_string().starts_with(input))
        .map(|milestone| milestone.uuid)
        .collect();

    match candidates.as_slice() {
        [id] => Ok(*id),
        [] => bail!("no milestone matches id `{input}`"),
        _ => bail!("id `{input}` is ambiguous, give more characters"),
    }
}

fn print_project_grid(
    ctx: &AppContext,
    service: &ProjectService<SqliteProjectRepository<'_>>,
    tasks: &SqliteTaskRepository<'_>,
    projects: &[Project],
) -> Result<()> {
    for project in projects {
        let progress = service.progress(tasks, project.uuid)?;
        println!(
            "{}  {}  {}/{} tasks done ({}%)",
            short_id(project.uuid),
            project.name,
            progress.completed,
            progress.total(),
            progress.percent
        );
        if let Some(deadline) = project.deadline {
            let text = match deadline_status(deadline, ctx.today) {
                DeadlineStatus::OverdueBy(days) => format!("overdue by {days} day(s)"),
                DeadlineStatus::DueToday => "due today".to_string(),
                DeadlineStatus::Soon(days) => format!("{days} day(s) left"),
                DeadlineStatus::Later(date) => date.format("%b %-d, %Y").to_string(),
            };
            println!("      deadline: {text}");
        }
        for milestone in &project.milestones {
            let mark = if milestone.completed {
                "x"
            } else if milestone.date < ctx.today {
                "!"
            } else {
                " "
            };
            println!("      [{mark}] {}  {}", milestone.date, milestone.name);
        }
    }
    Ok(())
}

fn print_project_timeline(
    ctx: &AppContext,
    tasks: &SqliteTaskRepository<'_>,
    projects: &[Project],
) -> Result<()> {
    let active = tasks.list_tasks(&TaskListQuery::default())?;
    let completed = tasks.list_tasks(&TaskListQuery {
        completed: true,
        sort: TaskSort::CompletedAt,
        ..TaskListQuery::default()
    })?;

    for row in timeline_rows(projects, &active, &completed, ctx.today) {
        let health = match row.health {
            ScheduleHealth::OnTrack => "on track",
            ScheduleHealth::AtRisk => "at risk",
            ScheduleHealth::Behind => "behind schedule",
            ScheduleHealth::Completed => "completed",
            ScheduleHealth::Unscheduled => "no schedule set",
        };
        println!("{}  {}% complete ({health})", row.name, row.progress.percent);
        if let Some(summary) = row.summary {
            let remaining = if summary.remaining_days > 0 {
                format!("{} day(s) remaining", summary.remaining_days)
            } else if summary.remaining_days == 0 {
                "ends today".to_string()
            } else {
                "schedule ended".to_string()
            };
            println!(
                "      {} of {} day(s) elapsed, {remaining}",
                summary.elapsed_days, summary.total_days
            );
        }
    }
    Ok(())
}

/// `mailtask calendar`
pub fn run_calendar(ctx: &AppContext, month: Option<String>) -> Result<()> {
    let anchor = match month {
        Some(value) => parse_month(&value)?,
        None => ctx.today,
    };

    let tasks = SqliteTaskRepository::try_new(&ctx.conn)?;
    let active = tasks.list_tasks(&TaskListQuery::default())?;
    let grid = month_grid(&active, anchor, ctx.today);

    println!("{:^42}", grid.label);
    println!("{:^6}{:^6}{:^6}{:^6}{:^6}{:^6}{:^6}", "Su", "Mo", "Tu", "We", "Th", "Fr", "Sa");
    for week in grid.cells.chunks(7) {
        let mut line = String::new();
        for cell in week {
            let day = if cell.in_month {
                let marker = if cell.is_today { "*" } else { " " };
                if cell.total > 0 {
                    format!("{}{marker}({})", cell.date.format("%-d"), cell.total)
                } else {
                    format!("{}{marker}", cell.date.format("%-d"))
                }
            } else {
                String::new()
            };
            line.push_str(&format!("{day:^6}"));
        }
        println!("{}", line.trim_end());
    }

    let mut listed = false;
    for cell in grid.cells.iter().filter(|cell| cell.in_month) {
        if cell.entries.is_empty() {
            continue;
        }
        if !listed {
            println!();
            listed = true;
        }
        let titles: Vec<&str> = cell
            .entries
            .iter()
            .map(|entry| entry.title.as_str())
            .collect();
        let more = if cell.overflow > 0 {
            format!(" +{} more", cell.overflow)
        } else {
            String::new()
        };
        println!("{}: {}{more}", cell.date.format("%b %-d"), titles.join(", "));
    }
    Ok(())
}

/// `mailtask hours`
pub fn run_hours(ctx: &AppContext) -> Result<()> {
    let meetings = SqliteMeetingRepository::try_new(&ctx.conn)?.list_meetings()?;
    let schedule = day_schedule(&meetings);

    for row in &schedule.rows {
        let mut track = vec!['-'; 30];
        let mut titles = Vec::new();
        for segment in &row.segments {
            if let SegmentKind::Meeting { title } = &segment.kind {
                let from = segment.offset_minutes as usize;
                let to = (segment.offset_minutes + segment.length_minutes) as usize;
                for slot in track.iter_mut().take(to).skip(from) {
                    *slot = '#';
                }
                titles.push(title.as_str());
            }
        }
        let track: String = track.into_iter().collect();
        if titles.is_empty() {
            println!("{:>8}  {track}", row.label);
        } else {
            println!("{:>8}  {track}  {}", row.label, titles.join(", "));
        }
    }

    println!(
        "\nAvailable: {:.1}h   Meetings: {:.1}h",
        schedule.available_hours(),
        schedule.meeting_hours()
    );
    Ok(())
}

/// `mailtask gantt`
pub fn run_gantt(ctx: &AppContext) -> Result<()> {
    let tasks = SqliteTaskRepository::try_new(&ctx.conn)?;
    let projects = SqliteProjectRepository::try_new(&ctx.conn)?.list_projects()?;
    if projects.is_empty() {
        println!("No projects yet.");
        return Ok(());
    }

    let active = tasks.list_tasks(&TaskListQuery::default())?;
    let completed = tasks.list_tasks(&TaskListQuery {
        completed: true,
        sort: TaskSort::CompletedAt,
        ..TaskListQuery::default()
    })?;

    let window = gantt_window(ctx.today);
    let labels: Vec<String> = window
        .months
        .iter()
        .map(|month| {
            if month.is_current {
                format!("[{}]", month.label)
            } else {
                month.label.clone()
            }
        })
        .collect();
    println!("{:<24}{}", "", labels.join("  "));

    for row in gantt_rows(&projects, &active, &completed, &window, ctx.today) {
        let mut track = vec!['.'; GANTT_TRACK_WIDTH];
        if let Some(bar) = &row.bar {
            let from = percent_to_col(bar.start_percent);
            let to = percent_to_col(bar.start_percent + bar.width_percent).max(from + 1);
            for slot in track.iter_mut().take(to.min(GANTT_TRACK_WIDTH)).skip(from) {
                *slot = '=';
            }
        }
        for milestone in &row.milestones {
            let col = percent_to_col(milestone.percent).min(GANTT_TRACK_WIDTH - 1);
            track[col] = match milestone.status {
                MilestoneStatus::Completed => 'o',
                MilestoneStatus::Overdue => 'x',
                MilestoneStatus::Pending => '^',
            };
        }
        if let Some(percent) = row.deadline_percent {
            let col = percent_to_col(percent).min(GANTT_TRACK_WIDTH - 1);
            track[col] = '!';
        }
        if let Some(percent) = window.today_percent {
            let col = percent_to_col(percent).min(GANTT_TRACK_WIDTH - 1);
            track[col] = '|';
        }

        let track: String = track.into_iter().collect();
        println!(
            "{:<22}  {track}  {}% ({} tasks)",
            clip(&row.name, 22),
            row.progress.percent,
            row.progress.total()
        );
    }

    println!("\nLegend: = schedule   | today   ! deadline   ^ milestone   o done   x overdue");
    Ok(())
}

fn percent_to_col(percent: f64) -> usize {
    ((percent / 100.0) * GANTT_TRACK_WIDTH as f64).floor() as usize
}

fn clip(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let head: String = value.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

fn short_id(id: TaskId) -> String {
    id.to_string().chars().take(8).collect()
}

fn due_label_text(label: DueLabel) -> &'static str {
    match label {
        DueLabel::Overdue => "overdue",
        DueLabel::DueToday => "due today",
    }
}

fn priority_from_arg(arg: PriorityArg) -> Priority {
    match arg {
        PriorityArg::Urgent => Priority::Urgent,
        PriorityArg::High => Priority::High,
        PriorityArg::Medium => Priority::Medium,
        PriorityArg::Low => Priority::Low,
    }
}

fn parse_month(value: &str) -> Result<NaiveDate> {
    let (year, month) = value
        .split_once('-')
        .ok_or_else(|| anyhow!("invalid month `{value}`, expected YYYY-MM"))?;
    let year: i32 = year
        .parse()
        .with_context(|| format!("invalid year in `{value}`"))?;
    let month: u32 = month
        .parse()
        .with_context(|| format!("invalid month in `{value}`"))?;
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| anyhow!("invalid month `{value}`, expected YYYY-MM"))
}

fn resolve_task_id(repo: &SqliteTaskRepository<'_>, input: &str) -> Result<TaskId> {
    if let Ok(id) = input.parse() {
        return Ok(id);
    }

    let mut candidates = Vec::new();
    for completed in [false, true] {
        let tasks = repo.list_tasks(&TaskListQuery {
            completed,
            ..TaskListQuery::default()
        })?;
        candidates.extend(
            tasks
                .into_iter()
                .filter(|task| task.uuid.to_string().starts_with(input)),
        );
    }

    match candidates.as_slice() {
        [task] => Ok(task.uuid),
        [] => bail!("no task matches id `{input}`"),
        _ => bail!("id `{input}` is ambiguous, give more characters"),
    }
}

fn resolve_project_id(repo: &SqliteProjectRepository<'_>, input: &str) -> Result<uuid::Uuid> {
    if let Ok(id) = input.parse() {
        return Ok(id);
    }

    let candidates: Vec<Project> = repo
        .list_projects()?
        .into_iter()
        .filter(|project| {
            project.uuid.to_string().starts_with(input) || project.name == input
        })
        .collect();

    match candidates.as_slice() {
        [project] => Ok(project.uuid),
        [] => bail!("no project matches `{input}`"),
        _ => bail!("`{input}` is ambiguous, give more characters"),
    }
}
