use chrono::{NaiveDate, NaiveTime};
use mailtask_core::db::migrations::latest_version;
use mailtask_core::db::open_db_in_memory;
use mailtask_core::{
    Priority, RepoError, SqliteTaskRepository, Task, TaskListQuery, TaskRepository, TaskService,
    TaskSort,
};
use rusqlite::Connection;
use uuid::Uuid;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn task(title: &str, due: NaiveDate, priority: Priority, created_at: i64) -> Task {
    Task::new(title, due, priority, created_at)
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let mut original = task("submit report", day(2026, 8, 10), Priority::High, 100);
    original.description = "quarterly numbers".to_string();
    original.due_time = NaiveTime::from_hms_opt(17, 0, 0);
    let id = repo.create_task(&original).unwrap();

    let loaded = repo.get_task(id).unwrap().unwrap();
    assert_eq!(loaded, original);
}

#[test]
fn update_existing_task() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let mut original = task("draft", day(2026, 8, 10), Priority::Medium, 100);
    repo.create_task(&original).unwrap();

    original.title = "final".to_string();
    original.priority = Priority::Urgent;
    original.due_date = day(2026, 8, 9);
    repo.update_task(&original).unwrap();

    let loaded = repo.get_task(original.uuid).unwrap().unwrap();
    assert_eq!(loaded.title, "final");
    assert_eq!(loaded.priority, Priority::Urgent);
    assert_eq!(loaded.due_date, day(2026, 8, 9));
}

#[test]
fn update_not_found_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let missing = task("missing", day(2026, 8, 10), Priority::Low, 0);
    let err = repo.update_task(&missing).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == missing.uuid));
}

#[test]
fn complete_moves_task_between_listings() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let open_task = task("stay open", day(2026, 8, 10), Priority::Medium, 100);
    let done_task = task("finish me", day(2026, 8, 10), Priority::Medium, 100);
    repo.create_task(&open_task).unwrap();
    repo.create_task(&done_task).unwrap();

    repo.complete_task(done_task.uuid, 9_000).unwrap();

    let active = repo.list_tasks(&TaskListQuery::default()).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].uuid, open_task.uuid);

    let completed = repo
        .list_tasks(&TaskListQuery {
            completed: true,
            sort: TaskSort::CompletedAt,
            ..TaskListQuery::default()
        })
        .unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].uuid, done_task.uuid);
    assert_eq!(completed[0].completed_at, Some(9_000));
}

#[test]
fn complete_is_idempotent_and_keeps_first_timestamp() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let item = task("t", day(2026, 8, 10), Priority::Low, 0);
    repo.create_task(&item).unwrap();

    repo.complete_task(item.uuid, 1_000).unwrap();
    repo.complete_task(item.uuid, 2_000).unwrap();

    let loaded = repo.get_task(item.uuid).unwrap().unwrap();
    assert_eq!(loaded.completed_at, Some(1_000));

    repo.reopen_task(item.uuid).unwrap();
    let reopened = repo.get_task(item.uuid).unwrap().unwrap();
    assert!(!reopened.completed);
    assert_eq!(reopened.completed_at, None);
}

#[test]
fn clear_completed_reports_removed_count() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    for index in 0..3 {
        let item = task("done", day(2026, 8, 10), Priority::Low, index);
        repo.create_task(&item).unwrap();
        repo.complete_task(item.uuid, 1_000 + index).unwrap();
    }
    let open_task = task("open", day(2026, 8, 10), Priority::Low, 0);
    repo.create_task(&open_task).unwrap();

    assert_eq!(repo.clear_completed().unwrap(), 3);
    assert_eq!(repo.clear_completed().unwrap(), 0);
    assert!(repo.get_task(open_task.uuid).unwrap().is_some());
}

#[test]
fn sort_modes_order_as_documented() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let mut low = task("low", day(2026, 8, 12), Priority::Low, 300);
    let mut urgent = task("urgent", day(2026, 8, 11), Priority::Urgent, 100);
    let mut medium = task("medium", day(2026, 8, 10), Priority::Medium, 200);
    repo.create_task(&low).unwrap();
    repo.create_task(&urgent).unwrap();
    repo.create_task(&medium).unwrap();

    let by_due = repo
        .list_tasks(&TaskListQuery {
            sort: TaskSort::DueDate,
            ..TaskListQuery::default()
        })
        .unwrap();
    assert_eq!(titles(&by_due), vec!["medium", "urgent", "low"]);

    let by_priority = repo
        .list_tasks(&TaskListQuery {
            sort: TaskSort::Priority,
            ..TaskListQuery::default()
        })
        .unwrap();
    assert_eq!(titles(&by_priority), vec!["urgent", "medium", "low"]);

    let newest = repo
        .list_tasks(&TaskListQuery {
            sort: TaskSort::CreatedAt,
            ..TaskListQuery::default()
        })
        .unwrap();
    assert_eq!(titles(&newest), vec!["low", "medium", "urgent"]);

    // Timed tasks come before all-day tasks on the same date.
    low.due_date = day(2026, 8, 10);
    low.due_time = None;
    medium.due_time = NaiveTime::from_hms_opt(9, 0, 0);
    urgent.due_date = day(2026, 8, 10);
    urgent.due_time = NaiveTime::from_hms_opt(17, 0, 0);
    repo.update_task(&low).unwrap();
    repo.update_task(&medium).unwrap();
    repo.update_task(&urgent).unwrap();

    let same_day = repo
        .list_tasks(&TaskListQuery {
            sort: TaskSort::DueDate,
            ..TaskListQuery::default()
        })
        .unwrap();
    assert_eq!(titles(&same_day), vec!["medium", "urgent", "low"]);
}

#[test]
fn project_filter_limits_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    // Stand-in project id; tasks reference it without FK enforcement on
    // insert order because the column is nullable.
    let project_id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO projects (uuid, name, color, created_at)
         VALUES (?1, 'p', '#007AFF', 0);",
        [project_id.to_string()],
    )
    .unwrap();

    let mut linked = task("in project", day(2026, 8, 10), Priority::Low, 0);
    linked.project_id = Some(project_id);
    let loose = task("no project", day(2026, 8, 10), Priority::Low, 0);
    repo.create_task(&linked).unwrap();
    repo.create_task(&loose).unwrap();

    let rows = repo
        .list_tasks(&TaskListQuery {
            project: Some(project_id),
            ..TaskListQuery::default()
        })
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].uuid, linked.uuid);
}

#[test]
fn find_task_for_email_returns_linked_task() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let mut converted = task("from email", day(2026, 8, 10), Priority::High, 0);
    converted.email_id = Some("demo-email-1".to_string());
    converted.email_subject = Some("subject".to_string());
    repo.create_task(&converted).unwrap();

    assert_eq!(
        repo.find_task_for_email("demo-email-1").unwrap(),
        Some(converted.uuid)
    );
    assert_eq!(repo.find_task_for_email("demo-email-2").unwrap(), None);
}

#[test]
fn validation_failure_blocks_create_and_update() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let mut invalid = task("ok", day(2026, 8, 10), Priority::Low, 0);
    invalid.title = "  ".to_string();
    assert!(matches!(
        repo.create_task(&invalid).unwrap_err(),
        RepoError::InvalidTask(_)
    ));

    let mut valid = task("ok", day(2026, 8, 10), Priority::Low, 0);
    repo.create_task(&valid).unwrap();
    valid.completed = true;
    assert!(matches!(
        repo.update_task(&valid).unwrap_err(),
        RepoError::InvalidTask(_)
    ));
}

#[test]
fn service_wraps_repository_calls() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let service = TaskService::new(repo);

    let mut item = task("via service", day(2026, 8, 10), Priority::Medium, 0);
    let id = service.create_task(&item).unwrap();

    item.title = "via service, renamed".to_string();
    service.update_task(&item).unwrap();
    let fetched = service.get_task(id).unwrap().unwrap();
    assert_eq!(fetched.title, "via service, renamed");

    service.complete_task(id, 1_000).unwrap();
    assert_eq!(service.list_active(TaskSort::DueDate).unwrap().len(), 0);
    assert_eq!(service.list_completed().unwrap().len(), 1);
}

#[test]
fn service_bucket_and_project_listings() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn).unwrap());
    let today = day(2026, 8, 7);

    let project_id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO projects (uuid, name, color, created_at)
         VALUES (?1, 'p', '#007AFF', 0);",
        [project_id.to_string()],
    )
    .unwrap();

    let overdue = task("overdue", day(2026, 8, 5), Priority::Low, 0);
    let mut in_project = task("in project", day(2026, 8, 12), Priority::High, 0);
    in_project.project_id = Some(project_id);
    service.create_task(&overdue).unwrap();
    service.create_task(&in_project).unwrap();

    let bucket = service
        .list_in_bucket(mailtask_core::DueBucket::Overdue, today)
        .unwrap();
    assert_eq!(bucket.len(), 1);
    assert_eq!(bucket[0].uuid, overdue.uuid);

    let scoped = service.list_for_project(project_id).unwrap();
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].uuid, in_project.uuid);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteTaskRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteTaskRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("tasks"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE tasks (
            uuid TEXT PRIMARY KEY NOT NULL,
            title TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteTaskRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "tasks",
            column: "description"
        })
    ));
}

fn titles(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|task| task.title.as_str()).collect()
}
