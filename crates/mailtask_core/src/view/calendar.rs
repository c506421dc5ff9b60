//! Month-grid calendar computation.
//!
//! # Responsibility
//! - Build the six-week month grid with per-day task entries.
//!
//! # Invariants
//! - The grid always holds exactly 42 cells, Sunday-first.
//! - At most three entries render per day; the rest collapse into an
//!   overflow count.

use crate::model::task::{Priority, Task, TaskId};
use chrono::{Datelike, Days, NaiveDate};

/// Cells per grid: six full weeks.
pub const GRID_CELLS: usize = 42;

/// Entries shown per day before collapsing into the overflow count.
pub const MAX_DAY_ENTRIES: usize = 3;

const TITLE_CHARS: usize = 15;

/// One task chip inside a day cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayEntry {
    pub task_id: TaskId,
    /// Title truncated to 15 characters with an ellipsis.
    pub title: String,
    pub priority: Priority,
}

/// One cell of the month grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// Whether the cell belongs to the anchor month (vs. leading/trailing
    /// fill days).
    pub in_month: bool,
    pub is_today: bool,
    pub entries: Vec<DayEntry>,
    /// Tasks beyond [`MAX_DAY_ENTRIES`].
    pub overflow: u32,
    /// Total tasks due on this day.
    pub total: u32,
}

/// Six-week calendar grid for one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    /// First day of the anchor month.
    pub month: NaiveDate,
    /// Display label, e.g. `August 2026`.
    pub label: String,
    pub cells: Vec<CalendarCell>,
}

impl MonthGrid {
    /// First day of the previous month, for navigation.
    pub fn prev_month(&self) -> NaiveDate {
        shift_month(self.month, -1)
    }

    /// First day of the next month, for navigation.
    pub fn next_month(&self) -> NaiveDate {
        shift_month(self.month, 1)
    }
}

/// Builds the grid for the month containing `anchor`.
///
/// Only active tasks should be passed in; completed tasks do not appear on
/// the calendar.
pub fn month_grid(tasks: &[Task], anchor: NaiveDate, today: NaiveDate) -> MonthGrid {
    let first_of_month = anchor - Days::new(u64::from(anchor.day()) - 1);
    let leading = first_of_month.weekday().num_days_from_sunday();
    let grid_start = first_of_month - Days::new(u64::from(leading));

    let cells = (0..GRID_CELLS)
        .map(|index| {
            let date = grid_start + Days::new(index as u64);
            let day_tasks: Vec<&Task> =
                tasks.iter().filter(|task| task.due_date == date).collect();
            let total = day_tasks.len() as u32;
            let entries = day_tasks
                .into_iter()
                .take(MAX_DAY_ENTRIES)
                .map(|task| DayEntry {
                    task_id: task.uuid,
                    title: truncate_title(&task.title),
                    priority: task.priority,
                })
                .collect();

            CalendarCell {
                date,
                in_month: date.month() == first_of_month.month()
                    && date.year() == first_of_month.year(),
                is_today: date == today,
                entries,
                overflow: total.saturating_sub(MAX_DAY_ENTRIES as u32),
                total,
            }
        })
        .collect();

    MonthGrid {
        month: first_of_month,
        label: first_of_month.format("%B %Y").to_string(),
        cells,
    }
}

/// Shifts a first-of-month date by whole months.
pub fn shift_month(first_of_month: NaiveDate, delta: i32) -> NaiveDate {
    let zero_based = first_of_month.year() * 12 + first_of_month.month() as i32 - 1 + delta;
    let year = zero_based.div_euclid(12);
    let month = zero_based.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(first_of_month)
}

fn truncate_title(title: &str) -> String {
    let truncated: String = title.chars().take(TITLE_CHARS).collect();
    if title.chars().count() > TITLE_CHARS {
        format!("{truncated}...")
    } else {
        truncated
    }
}
