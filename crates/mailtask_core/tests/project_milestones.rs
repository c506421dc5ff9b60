use chrono::NaiveDate;
use mailtask_core::db::open_db_in_memory;
use mailtask_core::{
    DeadlineType, Milestone, Priority, Project, ProjectRepository, ProjectService, RepoError,
    SqliteProjectRepository, SqliteTaskRepository, Task, TaskListQuery, TaskRepository,
};
use uuid::Uuid;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn sample_project() -> Project {
    let mut project = Project::new("Q4 Launch", "#007AFF", 1_000);
    project.description = "ship the launch".to_string();
    project.start_date = Some(day(2026, 8, 1));
    project.end_date = Some(day(2026, 9, 30));
    project.deadline = Some(day(2026, 9, 15));
    project.milestones = vec![
        Milestone::new(DeadlineType::Ifr, "", day(2026, 8, 20)),
        Milestone::new(DeadlineType::Custom, "Dry run", day(2026, 9, 1)),
    ];
    project
}

#[test]
fn create_and_get_roundtrip_with_milestones() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::try_new(&conn).unwrap();

    let project = sample_project();
    let id = repo.create_project(&project).unwrap();

    let loaded = repo.get_project(id).unwrap().unwrap();
    assert_eq!(loaded, project);
    assert_eq!(loaded.milestones[0].name, "IFR");
    assert_eq!(loaded.milestones[1].name, "Dry run");
}

#[test]
fn update_replaces_milestone_list() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::try_new(&conn).unwrap();

    let mut project = sample_project();
    repo.create_project(&project).unwrap();

    project.name = "Q4 Launch v2".to_string();
    project.milestones = vec![Milestone::new(
        DeadlineType::Final,
        "",
        day(2026, 9, 30),
    )];
    repo.update_project(&project).unwrap();

    let loaded = repo.get_project(project.uuid).unwrap().unwrap();
    assert_eq!(loaded.name, "Q4 Launch v2");
    assert_eq!(loaded.milestones.len(), 1);
    assert_eq!(loaded.milestones[0].deadline_type, DeadlineType::Final);
}

#[test]
fn update_missing_project_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::try_new(&conn).unwrap();

    let project = sample_project();
    let err = repo.update_project(&project).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == project.uuid));
}

#[test]
fn milestone_completion_toggle_persists() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::try_new(&conn).unwrap();

    let project = sample_project();
    repo.create_project(&project).unwrap();
    let milestone_id = project.milestones[0].uuid;

    repo.set_milestone_completed(milestone_id, true).unwrap();
    let loaded = repo.get_project(project.uuid).unwrap().unwrap();
    assert!(loaded.milestones[0].completed);
    assert!(!loaded.milestones[1].completed);

    let err = repo
        .set_milestone_completed(Uuid::new_v4(), true)
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn delete_project_detaches_tasks_and_removes_milestones() {
    let conn = open_db_in_memory().unwrap();

    let project = sample_project();
    let active_id;
    let done_id;
    {
        let projects = SqliteProjectRepository::try_new(&conn).unwrap();
        projects.create_project(&project).unwrap();
    }
    {
        let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
        let mut active = Task::new("active", day(2026, 8, 10), Priority::High, 0);
        active.project_id = Some(project.uuid);
        active_id = tasks.create_task(&active).unwrap();

        let mut done = Task::new("done", day(2026, 8, 10), Priority::Low, 0);
        done.project_id = Some(project.uuid);
        done_id = tasks.create_task(&done).unwrap();
        tasks.complete_task(done_id, 500).unwrap();
    }

    let detached = {
        let projects = SqliteProjectRepository::try_new(&conn).unwrap();
        projects.delete_project(project.uuid).unwrap()
    };
    assert_eq!(detached, 2, "active and completed tasks are both detached");

    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
    let active = tasks.get_task(active_id).unwrap().unwrap();
    assert_eq!(active.project_id, None);
    let done = tasks.get_task(done_id).unwrap().unwrap();
    assert_eq!(done.project_id, None);

    let orphan_milestones: i64 = conn
        .query_row("SELECT COUNT(*) FROM milestones;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(orphan_milestones, 0);
}

#[test]
fn delete_missing_project_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::try_new(&conn).unwrap();

    let err = repo.delete_project(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn list_projects_in_creation_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::try_new(&conn).unwrap();

    let first = Project::new("first", "#007AFF", 100);
    let second = Project::new("second", "#34C759", 200);
    repo.create_project(&second).unwrap();
    repo.create_project(&first).unwrap();

    let names: Vec<_> = repo
        .list_projects()
        .unwrap()
        .into_iter()
        .map(|project| project.name)
        .collect();
    assert_eq!(names, vec!["first", "second"]);
}

#[test]
fn invalid_project_is_rejected_before_persistence() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteProjectRepository::try_new(&conn).unwrap();

    let mut project = sample_project();
    project.color = "blue".to_string();
    assert!(matches!(
        repo.create_project(&project).unwrap_err(),
        RepoError::InvalidProject(_)
    ));

    let mut reversed = sample_project();
    reversed.start_date = Some(day(2026, 9, 30));
    reversed.end_date = Some(day(2026, 8, 1));
    assert!(matches!(
        repo.create_project(&reversed).unwrap_err(),
        RepoError::InvalidProject(_)
    ));
}

#[test]
fn service_wraps_repository_and_computes_progress() {
    let conn = open_db_in_memory().unwrap();
    let service = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();

    let mut project = sample_project();
    let id = service.create_project(&project).unwrap();

    project.description = "revised scope".to_string();
    service.update_project(&project).unwrap();
    let loaded = service.get_project(id).unwrap().unwrap();
    assert_eq!(loaded.description, "revised scope");
    assert_eq!(service.list_projects().unwrap().len(), 1);

    let mut open_task = Task::new("open", day(2026, 8, 10), Priority::High, 0);
    open_task.project_id = Some(id);
    tasks.create_task(&open_task).unwrap();
    let mut done_task = Task::new("done", day(2026, 8, 10), Priority::Low, 0);
    done_task.project_id = Some(id);
    tasks.create_task(&done_task).unwrap();
    tasks.complete_task(done_task.uuid, 500).unwrap();

    let progress = service.progress(&tasks, id).unwrap();
    assert_eq!(progress.active, 1);
    assert_eq!(progress.completed, 1);
    assert_eq!(progress.percent, 50);

    service
        .set_milestone_completed(project.milestones[0].uuid, true)
        .unwrap();
    let loaded = service.get_project(id).unwrap().unwrap();
    assert!(loaded.milestones[0].completed);
}

#[test]
fn tasks_detached_by_project_delete_keep_project_queries_empty() {
    let conn = open_db_in_memory().unwrap();

    let project = sample_project();
    {
        let projects = SqliteProjectRepository::try_new(&conn).unwrap();
        projects.create_project(&project).unwrap();
    }
    {
        let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
        let mut linked = Task::new("linked", day(2026, 8, 10), Priority::High, 0);
        linked.project_id = Some(project.uuid);
        tasks.create_task(&linked).unwrap();
    }
    {
        let projects = SqliteProjectRepository::try_new(&conn).unwrap();
        projects.delete_project(project.uuid).unwrap();
    }

    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
    let rows = tasks
        .list_tasks(&TaskListQuery {
            project: Some(project.uuid),
            ..TaskListQuery::default()
        })
        .unwrap();
    assert!(rows.is_empty());
}
