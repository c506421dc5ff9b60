use chrono::{NaiveDate, NaiveTime};
use mailtask_core::db::open_db_in_memory;
use mailtask_core::{
    ConvertOptions, DemoMailbox, EmailFilter, EmailMessage, EmailRepository, Importance,
    MailService, MailServiceError, Priority, SqliteEmailRepository, SqliteTaskRepository,
    TaskRepository,
};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn message(id: &str, importance: Importance) -> EmailMessage {
    EmailMessage {
        id: id.to_string(),
        subject: format!("subject {id}"),
        from_name: "John Smith".to_string(),
        from_address: "john@acme.com".to_string(),
        received_at: 1_700_000_000_000,
        body: "please handle".to_string(),
        is_read: false,
        importance,
    }
}

fn options() -> ConvertOptions {
    ConvertOptions {
        today: day(2026, 8, 7),
        now_ms: 1_700_000_000_000,
        default_priority: Priority::Medium,
    }
}

#[test]
fn upsert_refreshes_content_but_preserves_read_flag() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmailRepository::try_new(&conn).unwrap();

    let original = message("m1", Importance::Normal);
    assert!(repo.upsert_email(&original).unwrap());
    repo.mark_read("m1").unwrap();

    let mut resynced = message("m1", Importance::High);
    resynced.subject = "updated subject".to_string();
    assert!(!repo.upsert_email(&resynced).unwrap());

    let loaded = repo.get_email("m1").unwrap().unwrap();
    assert_eq!(loaded.subject, "updated subject");
    assert_eq!(loaded.importance, Importance::High);
    assert!(loaded.is_read, "re-sync must not clear the read flag");
}

#[test]
fn filters_select_unread_and_flagged() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmailRepository::try_new(&conn).unwrap();

    repo.upsert_email(&message("m1", Importance::High)).unwrap();
    repo.upsert_email(&message("m2", Importance::Normal)).unwrap();
    repo.upsert_email(&message("m3", Importance::Low)).unwrap();
    repo.mark_read("m2").unwrap();

    assert_eq!(repo.list_emails(EmailFilter::All).unwrap().len(), 3);

    let unread: Vec<_> = repo
        .list_emails(EmailFilter::Unread)
        .unwrap()
        .into_iter()
        .map(|email| email.id)
        .collect();
    assert_eq!(unread, vec!["m1", "m3"]);

    let flagged: Vec<_> = repo
        .list_emails(EmailFilter::Flagged)
        .unwrap()
        .into_iter()
        .map(|email| email.id)
        .collect();
    assert_eq!(flagged, vec!["m1"]);
}

#[test]
fn sync_from_demo_mailbox_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let service = MailService::new(SqliteEmailRepository::try_new(&conn).unwrap());
    let mailbox = DemoMailbox::new(day(2026, 8, 7), 1_700_000_000_000);

    let first = service.sync_from(&mailbox).unwrap();
    assert_eq!(first.folder, "Action Required");
    assert_eq!(first.fetched, 5);
    assert_eq!(first.inserted, 5);
    assert_eq!(first.refreshed, 0);

    let second = service.sync_from(&mailbox).unwrap();
    assert_eq!(second.fetched, 5);
    assert_eq!(second.inserted, 0);
    assert_eq!(second.refreshed, 5);

    assert_eq!(service.list_emails(EmailFilter::All).unwrap().len(), 5);
}

#[test]
fn convert_sets_defaults_from_message() {
    let conn = open_db_in_memory().unwrap();
    let emails = SqliteEmailRepository::try_new(&conn).unwrap();
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
    let service = MailService::new(emails);

    service
        .sync_from(&DemoMailbox::new(day(2026, 8, 7), 1_700_000_000_000))
        .unwrap();

    // demo-email-1 is high importance.
    let task = service
        .convert_to_task(&tasks, "demo-email-1", &options())
        .unwrap();
    assert_eq!(task.due_date, day(2026, 8, 8));
    assert_eq!(task.due_time, NaiveTime::from_hms_opt(17, 0, 0));
    assert_eq!(task.priority, Priority::High);
    assert_eq!(task.email_id.as_deref(), Some("demo-email-1"));
    assert!(task.email_subject.is_some());

    // demo-email-2 is normal importance and falls back to the default.
    let fallback = service
        .convert_to_task(&tasks, "demo-email-2", &options())
        .unwrap();
    assert_eq!(fallback.priority, Priority::Medium);

    let stored = tasks.get_task(task.uuid).unwrap().unwrap();
    assert_eq!(stored.description, task.description);
}

#[test]
fn convert_twice_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let emails = SqliteEmailRepository::try_new(&conn).unwrap();
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
    let service = MailService::new(emails);

    service
        .sync_from(&DemoMailbox::new(day(2026, 8, 7), 1_700_000_000_000))
        .unwrap();
    let task = service
        .convert_to_task(&tasks, "demo-email-1", &options())
        .unwrap();

    let err = service
        .convert_to_task(&tasks, "demo-email-1", &options())
        .unwrap_err();
    match err {
        MailServiceError::AlreadyConverted { email_id, task_id } => {
            assert_eq!(email_id, "demo-email-1");
            assert_eq!(task_id, task.uuid);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn convert_missing_email_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let emails = SqliteEmailRepository::try_new(&conn).unwrap();
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
    let service = MailService::new(emails);

    let err = service
        .convert_to_task(&tasks, "missing", &options())
        .unwrap_err();
    assert!(matches!(err, MailServiceError::EmailNotFound(id) if id == "missing"));
}

#[test]
fn convert_all_skips_already_converted() {
    let conn = open_db_in_memory().unwrap();
    let emails = SqliteEmailRepository::try_new(&conn).unwrap();
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
    let service = MailService::new(emails);

    service
        .sync_from(&DemoMailbox::new(day(2026, 8, 7), 1_700_000_000_000))
        .unwrap();
    service
        .convert_to_task(&tasks, "demo-email-3", &options())
        .unwrap();

    let created = service.convert_all(&tasks, &options()).unwrap();
    assert_eq!(created.len(), 4);

    // Every email now has exactly one task.
    for email in service.list_emails(EmailFilter::All).unwrap() {
        assert!(tasks.find_task_for_email(&email.id).unwrap().is_some());
    }

    let nothing_left = service.convert_all(&tasks, &options()).unwrap();
    assert!(nothing_left.is_empty());
}

#[test]
fn overview_marks_converted_messages() {
    let conn = open_db_in_memory().unwrap();
    let emails = SqliteEmailRepository::try_new(&conn).unwrap();
    let tasks = SqliteTaskRepository::try_new(&conn).unwrap();
    let service = MailService::new(emails);

    service
        .sync_from(&DemoMailbox::new(day(2026, 8, 7), 1_700_000_000_000))
        .unwrap();
    service
        .convert_to_task(&tasks, "demo-email-1", &options())
        .unwrap();

    let overview = service.list_overview(&tasks, EmailFilter::All).unwrap();
    assert_eq!(overview.len(), 5);
    let converted: Vec<_> = overview
        .iter()
        .filter(|entry| entry.task_id.is_some())
        .map(|entry| entry.email.id.as_str())
        .collect();
    assert_eq!(converted, vec!["demo-email-1"]);
}
