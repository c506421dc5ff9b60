use chrono::{Datelike, NaiveDate, Weekday};
use mailtask_core::view::calendar::{month_grid, GRID_CELLS, MAX_DAY_ENTRIES};
use mailtask_core::{Priority, Task};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn task(title: &str, due: NaiveDate) -> Task {
    Task::new(title, due, Priority::Medium, 0)
}

#[test]
fn grid_has_42_sunday_first_cells() {
    // August 2026 starts on a Saturday: six leading July days.
    let grid = month_grid(&[], day(2026, 8, 15), day(2026, 8, 7));

    assert_eq!(grid.label, "August 2026");
    assert_eq!(grid.month, day(2026, 8, 1));
    assert_eq!(grid.cells.len(), GRID_CELLS);
    assert_eq!(grid.cells[0].date, day(2026, 7, 26));
    assert_eq!(grid.cells[0].date.weekday(), Weekday::Sun);
    assert!(!grid.cells[0].in_month);
    assert_eq!(grid.cells[6].date, day(2026, 8, 1));
    assert!(grid.cells[6].in_month);

    // Trailing cells run into September.
    let last = grid.cells.last().unwrap();
    assert_eq!(last.date, day(2026, 9, 5));
    assert!(!last.in_month);
}

#[test]
fn today_is_highlighted_only_in_its_month() {
    let grid = month_grid(&[], day(2026, 8, 15), day(2026, 8, 7));
    let today_cells: Vec<_> = grid.cells.iter().filter(|cell| cell.is_today).collect();
    assert_eq!(today_cells.len(), 1);
    assert_eq!(today_cells[0].date, day(2026, 8, 7));

    let other_month = month_grid(&[], day(2026, 9, 15), day(2026, 8, 7));
    assert!(other_month.cells.iter().all(|cell| !cell.is_today));
}

#[test]
fn day_entries_truncate_titles_and_overflow() {
    let due = day(2026, 8, 10);
    let tasks = vec![
        task("short", due),
        task("a very long task title indeed", due),
        task("third", due),
        task("fourth", due),
        task("fifth", due),
    ];

    let grid = month_grid(&tasks, day(2026, 8, 1), day(2026, 8, 7));
    let cell = grid
        .cells
        .iter()
        .find(|cell| cell.date == due)
        .expect("cell for the 10th");

    assert_eq!(cell.total, 5);
    assert_eq!(cell.entries.len(), MAX_DAY_ENTRIES);
    assert_eq!(cell.overflow, 2);
    assert_eq!(cell.entries[0].title, "short");
    assert_eq!(cell.entries[1].title, "a very long tas...");
}

#[test]
fn tasks_outside_grid_do_not_leak_in() {
    let tasks = vec![task("far future", day(2027, 1, 5))];
    let grid = month_grid(&tasks, day(2026, 8, 1), day(2026, 8, 7));
    assert!(grid.cells.iter().all(|cell| cell.entries.is_empty()));
}

#[test]
fn navigation_steps_by_whole_months() {
    let grid = month_grid(&[], day(2026, 1, 20), day(2026, 8, 7));
    assert_eq!(grid.prev_month(), day(2025, 12, 1));
    assert_eq!(grid.next_month(), day(2026, 2, 1));
}

#[test]
fn leading_days_count_matches_weekday_of_first() {
    // February 2026 starts on a Sunday: no leading fill days.
    let grid = month_grid(&[], day(2026, 2, 10), day(2026, 8, 7));
    assert_eq!(grid.cells[0].date, day(2026, 2, 1));
    assert!(grid.cells[0].in_month);
}
