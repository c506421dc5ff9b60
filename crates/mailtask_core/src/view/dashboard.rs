//! Headline dashboard computations.
//!
//! # Responsibility
//! - Compute the stat tiles, sidebar badges, priority list, hot-task
//!   briefing, upcoming timeline and due-date chart.
//!
//! # Invariants
//! - "Hot" means due on or before the reference day.
//! - Priority ordering is urgent, high, medium, low; ties break on due date.

use crate::model::task::{DueBucket, Task};
use chrono::NaiveDate;

const DAY_MS: i64 = 86_400_000;

/// Headline tile counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    /// Active tasks due on or before the reference day.
    pub hot: u32,
    /// All active tasks.
    pub pending: u32,
    /// Tasks completed during the reference day.
    pub completed_today: u32,
}

/// Computes the stat tiles.
///
/// `day_start_ms` is the epoch-millisecond start of the reference day in the
/// caller's timezone; completions within the following 24 hours count as
/// today's.
pub fn dashboard_stats(
    active: &[Task],
    completed: &[Task],
    today: NaiveDate,
    day_start_ms: i64,
) -> DashboardStats {
    let hot = active
        .iter()
        .filter(|task| task.due_date <= today)
        .count() as u32;
    let completed_today = completed
        .iter()
        .filter(|task| {
            task.completed_at
                .is_some_and(|at| at >= day_start_ms && at < day_start_ms + DAY_MS)
        })
        .count() as u32;

    DashboardStats {
        hot,
        pending: active.len() as u32,
        completed_today,
    }
}

/// Sidebar badge counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeCounts {
    pub emails: u32,
    pub tasks: u32,
    pub overdue: u32,
    pub due_today: u32,
    pub this_week: u32,
    pub projects: u32,
}

/// Computes the sidebar badges from active tasks and entity counts.
pub fn badge_counts(
    active: &[Task],
    email_count: u32,
    project_count: u32,
    today: NaiveDate,
) -> BadgeCounts {
    let mut overdue = 0;
    let mut due_today = 0;
    let mut this_week = 0;

    for task in active {
        match task.due_bucket(today) {
            DueBucket::Overdue => overdue += 1,
            DueBucket::DueToday => due_today += 1,
            DueBucket::ThisWeek => this_week += 1,
            DueBucket::Later => {}
        }
    }

    BadgeCounts {
        emails: email_count,
        tasks: active.len() as u32,
        overdue,
        due_today,
        this_week,
        projects: project_count,
    }
}

/// Urgency label for tasks that made the hot set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueLabel {
    Overdue,
    DueToday,
}

/// One entry of the priority list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityEntry {
    pub task: Task,
    pub label: DueLabel,
}

/// Returns the top `limit` tasks due on or before `today`.
///
/// Ordering is priority rank first, then due date, then stable id.
pub fn priority_tasks(active: &[Task], today: NaiveDate, limit: usize) -> Vec<PriorityEntry> {
    let mut hot: Vec<&Task> = active
        .iter()
        .filter(|task| task.due_date <= today)
        .collect();
    hot.sort_by_key(|task| (task.priority.rank(), task.due_date, task.uuid));

    hot.into_iter()
        .take(limit)
        .map(|task| PriorityEntry {
            label: due_label(task, today),
            task: task.clone(),
        })
        .collect()
}

/// One line of the daily hot-task briefing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotTask {
    /// 1-based position in the briefing.
    pub ordinal: usize,
    pub task: Task,
    pub label: DueLabel,
}

/// Returns the full hot set with ordinal numbering for the daily briefing.
pub fn hot_briefing(active: &[Task], today: NaiveDate) -> Vec<HotTask> {
    priority_tasks(active, today, active.len())
        .into_iter()
        .enumerate()
        .map(|(index, entry)| HotTask {
            ordinal: index + 1,
            task: entry.task,
            label: entry.label,
        })
        .collect()
}

/// Date label for upcoming-deadline rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineLabel {
    Overdue,
    Today,
    On(NaiveDate),
}

/// One row of the upcoming-deadlines timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub task: Task,
    pub label: TimelineLabel,
}

/// Returns the next `limit` tasks ordered by due date.
pub fn upcoming_timeline(active: &[Task], today: NaiveDate, limit: usize) -> Vec<TimelineEntry> {
    let mut upcoming: Vec<&Task> = active.iter().collect();
    upcoming.sort_by_key(|task| (task.due_date, task.priority.rank(), task.uuid));

    upcoming
        .into_iter()
        .take(limit)
        .map(|task| {
            let label = if task.is_overdue(today) {
                TimelineLabel::Overdue
            } else if task.is_due_today(today) {
                TimelineLabel::Today
            } else {
                TimelineLabel::On(task.due_date)
            };
            TimelineEntry {
                task: task.clone(),
                label,
            }
        })
        .collect()
}

/// Due-date distribution for the workload chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DueChart {
    pub overdue: u32,
    pub due_today: u32,
    pub this_week: u32,
    pub later: u32,
    pub total: u32,
}

/// Buckets active tasks by due date for the workload chart.
pub fn due_chart(active: &[Task], today: NaiveDate) -> DueChart {
    let mut chart = DueChart {
        total: active.len() as u32,
        ..DueChart::default()
    };

    for task in active {
        match task.due_bucket(today) {
            DueBucket::Overdue => chart.overdue += 1,
            DueBucket::DueToday => chart.due_today += 1,
            DueBucket::ThisWeek => chart.this_week += 1,
            DueBucket::Later => chart.later += 1,
        }
    }

    chart
}

fn due_label(task: &Task, today: NaiveDate) -> DueLabel {
    if task.is_overdue(today) {
        DueLabel::Overdue
    } else {
        DueLabel::DueToday
    }
}
