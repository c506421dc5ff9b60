//! Project timeline and Gantt computations.
//!
//! # Responsibility
//! - Compute the five-month Gantt window, per-project bars and markers.
//! - Compute schedule summaries, deadline status and schedule health for
//!   the project timeline view.
//!
//! # Invariants
//! - The window spans the 1st of last month through the last day of the
//!   month three ahead of the reference month.
//! - All percent offsets are relative to the window and clamped to
//!   `[0, 100]`; markers outside the window are dropped.

use crate::model::project::{Project, ProjectId};
use crate::model::task::Task;
use crate::service::project_service::ProjectProgress;
use crate::view::calendar::shift_month;
use chrono::{Datelike, Days, NaiveDate};

/// One month column of the Gantt header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GanttMonth {
    pub first_day: NaiveDate,
    /// Display label, e.g. `Aug 2026`.
    pub label: String,
    pub is_current: bool,
}

/// Date window all Gantt percentages are relative to.
#[derive(Debug, Clone, PartialEq)]
pub struct GanttWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_days: i64,
    pub months: Vec<GanttMonth>,
    /// Position of the today line, when it falls inside the window.
    pub today_percent: Option<f64>,
}

/// Computes the Gantt window around the month containing `today`.
pub fn gantt_window(today: NaiveDate) -> GanttWindow {
    let current_first = today - Days::new(u64::from(today.day()) - 1);
    let start = shift_month(current_first, -1);
    // Last day of month +3: first day of month +4, minus one day.
    let end = shift_month(current_first, 4) - Days::new(1);
    let total_days = (end - start).num_days().max(1);

    let months = (-1..=3)
        .map(|delta| {
            let first_day = shift_month(current_first, delta);
            GanttMonth {
                first_day,
                label: first_day.format("%b %Y").to_string(),
                is_current: delta == 0,
            }
        })
        .collect();

    let today_percent = window_percent(start, total_days, today);

    GanttWindow {
        start,
        end,
        total_days,
        months,
        today_percent,
    }
}

/// Horizontal project bar inside the window.
#[derive(Debug, Clone, PartialEq)]
pub struct GanttBar {
    pub start_percent: f64,
    pub width_percent: f64,
}

/// Milestone marker state on the Gantt row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MilestoneStatus {
    Completed,
    Overdue,
    Pending,
}

/// One milestone marker positioned inside the window.
#[derive(Debug, Clone, PartialEq)]
pub struct GanttMilestoneMarker {
    pub name: String,
    pub date: NaiveDate,
    pub percent: f64,
    pub status: MilestoneStatus,
}

/// One project row of the Gantt chart.
#[derive(Debug, Clone, PartialEq)]
pub struct GanttRow {
    pub project_id: ProjectId,
    pub name: String,
    pub color: String,
    pub progress: ProjectProgress,
    /// Schedule bar, present when the project has a window overlapping the
    /// chart.
    pub bar: Option<GanttBar>,
    pub deadline_percent: Option<f64>,
    pub milestones: Vec<GanttMilestoneMarker>,
}

/// Computes one Gantt row per project.
pub fn gantt_rows(
    projects: &[Project],
    active: &[Task],
    completed: &[Task],
    window: &GanttWindow,
    today: NaiveDate,
) -> Vec<GanttRow> {
    projects
        .iter()
        .map(|project| {
            let bar = project
                .start_date
                .zip(project.end_date)
                .and_then(|(start, end)| bar_for(window, start, end));

            let deadline_percent = project
                .deadline
                .and_then(|deadline| window_percent(window.start, window.total_days, deadline));

            let milestones = project
                .milestones
                .iter()
                .filter_map(|milestone| {
                    let percent =
                        window_percent(window.start, window.total_days, milestone.date)?;
                    let status = if milestone.completed {
                        MilestoneStatus::Completed
                    } else if milestone.date < today {
                        MilestoneStatus::Overdue
                    } else {
                        MilestoneStatus::Pending
                    };
                    Some(GanttMilestoneMarker {
                        name: milestone.name.clone(),
                        date: milestone.date,
                        percent,
                        status,
                    })
                })
                .collect();

            GanttRow {
                project_id: project.uuid,
                name: project.name.clone(),
                color: project.color.clone(),
                progress: project_progress(project.uuid, active, completed),
                bar,
                deadline_percent,
                milestones,
            }
        })
        .collect()
}

/// Elapsed/remaining arithmetic for one schedule window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleSummary {
    pub total_days: i64,
    pub elapsed_days: i64,
    /// Negative once the end date has passed.
    pub remaining_days: i64,
    /// Share of schedule time spent, clamped to `[0, 100]`.
    pub time_progress_percent: f64,
}

/// Computes the schedule summary for a start..end window.
pub fn schedule_summary(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> ScheduleSummary {
    let total_days = (end - start).num_days();
    let remaining_days = (end - today).num_days();
    let elapsed_days = (total_days - remaining_days).max(0);

    let time_progress_percent = if total_days <= 0 {
        if today >= start {
            100.0
        } else {
            0.0
        }
    } else {
        let raw = (today - start).num_days() as f64 / total_days as f64 * 100.0;
        raw.clamp(0.0, 100.0)
    };

    ScheduleSummary {
        total_days,
        elapsed_days,
        remaining_days,
        time_progress_percent,
    }
}

/// Whether a project is keeping up with its schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleHealth {
    OnTrack,
    /// Time progress leads task progress by more than 10 points.
    AtRisk,
    /// Past the end date with open tasks, or time leads tasks by more than
    /// 20 points.
    Behind,
    /// Past the end date with everything done.
    Completed,
    /// No schedule window set.
    Unscheduled,
}

/// Classifies schedule health from time progress vs. task progress.
pub fn schedule_health(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    task_progress_percent: u8,
    today: NaiveDate,
) -> ScheduleHealth {
    let (Some(start), Some(end)) = (start, end) else {
        return ScheduleHealth::Unscheduled;
    };

    let summary = schedule_summary(start, end, today);
    let task_progress = f64::from(task_progress_percent);

    if today > end {
        if task_progress_percent < 100 {
            ScheduleHealth::Behind
        } else {
            ScheduleHealth::Completed
        }
    } else if summary.time_progress_percent > task_progress + 20.0 {
        ScheduleHealth::Behind
    } else if summary.time_progress_percent > task_progress + 10.0 {
        ScheduleHealth::AtRisk
    } else {
        ScheduleHealth::OnTrack
    }
}

/// Deadline proximity for project cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineStatus {
    /// Deadline passed this many days ago.
    OverdueBy(i64),
    DueToday,
    /// Within the next seven days.
    Soon(i64),
    /// Further out; render the date itself.
    Later(NaiveDate),
}

/// Classifies a deadline relative to `today`.
pub fn deadline_status(deadline: NaiveDate, today: NaiveDate) -> DeadlineStatus {
    let days = (deadline - today).num_days();
    if days < 0 {
        DeadlineStatus::OverdueBy(-days)
    } else if days == 0 {
        DeadlineStatus::DueToday
    } else if days <= 7 {
        DeadlineStatus::Soon(days)
    } else {
        DeadlineStatus::Later(deadline)
    }
}

/// One project row of the timeline view.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineRow {
    pub project_id: ProjectId,
    pub name: String,
    pub color: String,
    pub progress: ProjectProgress,
    pub summary: Option<ScheduleSummary>,
    pub health: ScheduleHealth,
}

/// Computes one timeline row per project.
pub fn timeline_rows(
    projects: &[Project],
    active: &[Task],
    completed: &[Task],
    today: NaiveDate,
) -> Vec<TimelineRow> {
    projects
        .iter()
        .map(|project| {
            let progress = project_progress(project.uuid, active, completed);
            let summary = project
                .start_date
                .zip(project.end_date)
                .map(|(start, end)| schedule_summary(start, end, today));
            let health = schedule_health(
                project.start_date,
                project.end_date,
                progress.percent,
                today,
            );

            TimelineRow {
                project_id: project.uuid,
                name: project.name.clone(),
                color: project.color.clone(),
                progress,
                summary,
                health,
            }
        })
        .collect()
}

fn project_progress(project_id: ProjectId, active: &[Task], completed: &[Task]) -> ProjectProgress {
    let active_count = active
        .iter()
        .filter(|task| task.project_id == Some(project_id))
        .count() as u32;
    let completed_count = completed
        .iter()
        .filter(|task| task.project_id == Some(project_id))
        .count() as u32;
    ProjectProgress::from_counts(active_count, completed_count)
}

fn bar_for(window: &GanttWindow, start: NaiveDate, end: NaiveDate) -> Option<GanttBar> {
    let bar_start = (start - window.start).num_days().max(0);
    let bar_end = (end - window.start).num_days();
    let bar_width = (bar_end - bar_start).min(window.total_days - bar_start);

    let start_percent = bar_start as f64 / window.total_days as f64 * 100.0;
    let width_percent = bar_width as f64 / window.total_days as f64 * 100.0;

    if width_percent > 0.0 && start_percent < 100.0 {
        Some(GanttBar {
            start_percent,
            width_percent,
        })
    } else {
        None
    }
}

fn window_percent(start: NaiveDate, total_days: i64, date: NaiveDate) -> Option<f64> {
    let offset = (date - start).num_days();
    let percent = offset as f64 / total_days as f64 * 100.0;
    if (0.0..=100.0).contains(&percent) {
        Some(percent)
    } else {
        None
    }
}
