use chrono::NaiveDate;
use mailtask_core::db::open_db_in_memory;
use mailtask_core::{
    search_tasks, Priority, SearchError, SearchQuery, SqliteTaskRepository, Task, TaskRepository,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn task(title: &str, description: &str, created_at: i64) -> Task {
    let mut task = Task::new(title, day(2026, 8, 10), Priority::Medium, created_at);
    task.description = description.to_string();
    task
}

#[test]
fn search_matches_title_and_description() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let by_title = task("Review budget numbers", "", 100);
    let by_description = task("Follow up", "waiting on budget approval", 200);
    let unrelated = task("Book flights", "conference travel", 300);
    repo.create_task(&by_title).unwrap();
    repo.create_task(&by_description).unwrap();
    repo.create_task(&unrelated).unwrap();

    let hits = search_tasks(&conn, &SearchQuery::new("budget")).unwrap();
    let ids: Vec<_> = hits.iter().map(|hit| hit.task_id).collect();
    assert_eq!(hits.len(), 2);
    assert!(ids.contains(&by_title.uuid));
    assert!(ids.contains(&by_description.uuid));
}

#[test]
fn blank_query_returns_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    repo.create_task(&task("anything", "", 0)).unwrap();

    assert!(search_tasks(&conn, &SearchQuery::new("   ")).unwrap().is_empty());
}

#[test]
fn completed_tasks_are_hidden_unless_requested() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let done = task("budget archive", "", 100);
    repo.create_task(&done).unwrap();
    repo.complete_task(done.uuid, 1_000).unwrap();

    assert!(search_tasks(&conn, &SearchQuery::new("budget"))
        .unwrap()
        .is_empty());

    let mut query = SearchQuery::new("budget");
    query.include_completed = true;
    let hits = search_tasks(&conn, &query).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].task_id, done.uuid);
}

#[test]
fn updated_task_text_is_reindexed() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let mut item = task("old wording", "", 100);
    repo.create_task(&item).unwrap();

    item.title = "new phrasing".to_string();
    repo.update_task(&item).unwrap();

    assert!(search_tasks(&conn, &SearchQuery::new("wording"))
        .unwrap()
        .is_empty());
    assert_eq!(
        search_tasks(&conn, &SearchQuery::new("phrasing"))
            .unwrap()
            .len(),
        1
    );

    repo.delete_task(item.uuid).unwrap();
    assert!(search_tasks(&conn, &SearchQuery::new("phrasing"))
        .unwrap()
        .is_empty());
}

#[test]
fn quoted_terms_protect_against_fts_syntax() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    repo.create_task(&task("parens (urgent) fix", "", 100)).unwrap();

    // Un-escaped this would be an FTS5 syntax error.
    let hits = search_tasks(&conn, &SearchQuery::new("(urgent)")).unwrap();
    assert_eq!(hits.len(), 1);
}

#[test]
fn raw_syntax_errors_surface_as_invalid_query() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    repo.create_task(&task("anything", "", 0)).unwrap();

    let mut query = SearchQuery::new("AND AND (");
    query.raw_fts_syntax = true;
    let err = search_tasks(&conn, &query).unwrap_err();
    assert!(matches!(err, SearchError::InvalidQuery { .. }));
}

#[test]
fn limit_caps_results() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    for index in 0..5 {
        repo.create_task(&task(&format!("budget item {index}"), "", index))
            .unwrap();
    }

    let mut query = SearchQuery::new("budget");
    query.limit = 2;
    assert_eq!(search_tasks(&conn, &query).unwrap().len(), 2);

    query.limit = 0;
    assert!(search_tasks(&conn, &query).unwrap().is_empty());
}
