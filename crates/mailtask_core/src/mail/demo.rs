//! Built-in demo mailbox and dataset.
//!
//! # Responsibility
//! - Provide a deterministic stand-in for a cloud mailbox so every flow can
//!   run without credentials.
//! - Seed a representative working set: emails, tasks, projects with
//!   milestones, and a day of meetings.
//!
//! # Invariants
//! - All dates are derived from the injected `today`, never from the clock.
//! - Message ids are stable across fetches.

use crate::mail::{MailSource, MailSourceError};
use crate::model::email::{EmailMessage, Importance};
use crate::model::meeting::Meeting;
use crate::model::project::{DeadlineType, Milestone, Project};
use crate::model::settings::DEFAULT_ACTION_REQUIRED_FOLDER;
use crate::model::task::{Priority, Task};
use crate::repo::email_repo::EmailRepository;
use crate::repo::meeting_repo::MeetingRepository;
use crate::repo::project_repo::ProjectRepository;
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoResult;
use chrono::{Days, NaiveDate, NaiveTime};

const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 86_400_000;

/// Demo stand-in for a cloud mailbox.
#[derive(Debug, Clone)]
pub struct DemoMailbox {
    today: NaiveDate,
    now_ms: i64,
}

impl DemoMailbox {
    /// Creates a mailbox anchored to the given reference day and timestamp.
    pub fn new(today: NaiveDate, now_ms: i64) -> Self {
        Self { today, now_ms }
    }
}

impl MailSource for DemoMailbox {
    fn source_id(&self) -> &str {
        "demo"
    }

    fn folder_name(&self) -> &str {
        DEFAULT_ACTION_REQUIRED_FOLDER
    }

    fn fetch_action_required(&self) -> Result<Vec<EmailMessage>, MailSourceError> {
        Ok(demo_emails(self.now_ms))
    }
}

/// Full demo working set.
#[derive(Debug, Clone)]
pub struct DemoDataset {
    pub emails: Vec<EmailMessage>,
    /// Active and completed tasks, linked to projects and emails.
    pub tasks: Vec<Task>,
    pub projects: Vec<Project>,
    pub meetings: Vec<Meeting>,
}

/// Builds the demo dataset relative to `today` / `now_ms`.
pub fn demo_dataset(today: NaiveDate, now_ms: i64) -> DemoDataset {
    let emails = demo_emails(now_ms);
    let projects = demo_projects(today, now_ms);
    let tasks = demo_tasks(today, now_ms, &projects, &emails);
    let meetings = demo_meetings();

    DemoDataset {
        emails,
        tasks,
        projects,
        meetings,
    }
}

/// Loads one demo dataset into empty storage.
///
/// Callers are expected to start from a freshly created database; ids are
/// generated per dataset and inserts are not idempotent.
pub fn seed_demo<T, E, P, M>(
    tasks: &T,
    emails: &E,
    projects: &P,
    meetings: &M,
    dataset: &DemoDataset,
) -> RepoResult<()>
where
    T: TaskRepository,
    E: EmailRepository,
    P: ProjectRepository,
    M: MeetingRepository,
{
    for project in &dataset.projects {
        projects.create_project(project)?;
    }
    for task in &dataset.tasks {
        tasks.create_task(task)?;
    }
    for email in &dataset.emails {
        emails.upsert_email(email)?;
    }
    for meeting in &dataset.meetings {
        meetings.create_meeting(meeting)?;
    }
    Ok(())
}

fn demo_emails(now_ms: i64) -> Vec<EmailMessage> {
    vec![
        EmailMessage {
            id: "demo-email-1".to_string(),
            subject: "URGENT: Contract Review Required by EOD".to_string(),
            from_name: "John Smith".to_string(),
            from_address: "john.smith@acme.com".to_string(),
            received_at: now_ms - DAY_MS,
            body: "Please review the attached contract and provide your \
                   approval by end of day. This is critical for the Q4 \
                   project launch."
                .to_string(),
            is_read: false,
            importance: Importance::High,
        },
        EmailMessage {
            id: "demo-email-2".to_string(),
            subject: "Project Update Meeting - Action Items".to_string(),
            from_name: "Sarah Johnson".to_string(),
            from_address: "sarah.j@company.com".to_string(),
            received_at: now_ms - 3 * HOUR_MS,
            body: "Following up on today's meeting. Please complete the \
                   action items assigned to you by Friday."
                .to_string(),
            is_read: true,
            importance: Importance::Normal,
        },
        EmailMessage {
            id: "demo-email-3".to_string(),
            subject: "Budget Approval Needed".to_string(),
            from_name: "Finance Team".to_string(),
            from_address: "finance@company.com".to_string(),
            received_at: now_ms - 5 * HOUR_MS,
            body: "Your budget request for the new equipment is pending \
                   approval. Please provide additional justification."
                .to_string(),
            is_read: false,
            importance: Importance::High,
        },
        EmailMessage {
            id: "demo-email-4".to_string(),
            subject: "Client Presentation Feedback Request".to_string(),
            from_name: "Mike Williams".to_string(),
            from_address: "mike.w@client.com".to_string(),
            received_at: now_ms - DAY_MS,
            body: "Could you please review the presentation deck and send \
                   your feedback by tomorrow?"
                .to_string(),
            is_read: true,
            importance: Importance::Normal,
        },
        EmailMessage {
            id: "demo-email-5".to_string(),
            subject: "Security Training Completion Required".to_string(),
            from_name: "HR Department".to_string(),
            from_address: "hr@company.com".to_string(),
            received_at: now_ms - 3 * DAY_MS,
            body: "This is a reminder to complete your annual security \
                   training by the deadline."
                .to_string(),
            is_read: true,
            importance: Importance::Normal,
        },
    ]
}

fn demo_projects(today: NaiveDate, now_ms: i64) -> Vec<Project> {
    let mut launch = Project::new("Q4 Product Launch", "#007AFF", now_ms - 7 * DAY_MS);
    launch.description = "Launch new product features for Q4".to_string();
    launch.start_date = Some(today - Days::new(14));
    launch.end_date = Some(today + Days::new(14));
    launch.deadline = Some(today + Days::new(5));
    launch.milestones = vec![
        completed(Milestone::new(
            DeadlineType::Ifr,
            "",
            today - Days::new(7),
        )),
        Milestone::new(DeadlineType::Ifc, "", today + Days::new(3)),
        Milestone::new(DeadlineType::Final, "", today + Days::new(14)),
    ];

    let mut onboarding = Project::new("Client Onboarding", "#34C759", now_ms - 14 * DAY_MS);
    onboarding.description = "Onboard new enterprise clients".to_string();
    onboarding.start_date = Some(today - Days::new(7));
    onboarding.end_date = Some(today + Days::new(28));
    onboarding.milestones = vec![
        completed(Milestone::new(
            DeadlineType::Ifp,
            "",
            today - Days::new(5),
        )),
        Milestone::new(DeadlineType::Ifa, "", today + Days::new(7)),
    ];

    let mut compliance = Project::new("Security Compliance", "#FF9500", now_ms - 28 * DAY_MS);
    compliance.description = "Annual security training and compliance tasks".to_string();
    compliance.start_date = Some(today);
    compliance.end_date = Some(today + Days::new(21));
    compliance.deadline = Some(today + Days::new(14));
    compliance.milestones = vec![
        Milestone::new(DeadlineType::Review, "", today + Days::new(7)),
        Milestone::new(DeadlineType::Approval, "", today + Days::new(14)),
    ];

    vec![launch, onboarding, compliance]
}

fn demo_tasks(
    today: NaiveDate,
    now_ms: i64,
    projects: &[Project],
    emails: &[EmailMessage],
) -> Vec<Task> {
    let tomorrow = today + Days::new(1);
    let yesterday = today - Days::new(1);
    let next_week = today + Days::new(5);

    let mut tasks = vec![
        linked_task(
            "Review and sign contract for Q4 project",
            "Urgent contract review needed for the Q4 project launch",
            today,
            at(17, 0),
            Priority::Urgent,
            now_ms - DAY_MS,
            projects.first(),
            emails.first(),
        ),
        linked_task(
            "Complete project meeting action items",
            "Action items from the project update meeting",
            tomorrow,
            at(12, 0),
            Priority::High,
            now_ms,
            projects.first(),
            emails.get(1),
        ),
        linked_task(
            "Submit budget justification",
            "Provide additional justification for equipment budget request",
            yesterday,
            at(9, 0),
            Priority::High,
            now_ms,
            projects.get(1),
            emails.get(2),
        ),
        linked_task(
            "Review client presentation deck",
            "Review and provide feedback on the presentation",
            tomorrow,
            at(18, 0),
            Priority::Medium,
            now_ms - DAY_MS,
            None,
            emails.get(3),
        ),
        linked_task(
            "Complete security training",
            "Annual security training completion required",
            next_week,
            at(23, 59),
            Priority::Low,
            now_ms,
            projects.get(2),
            emails.get(4),
        ),
    ];

    let mut done = linked_task(
        "Respond to vendor inquiry",
        "Reply to vendor about pricing questions",
        yesterday,
        at(14, 0),
        Priority::Medium,
        now_ms - 2 * DAY_MS,
        projects.get(1),
        None,
    );
    done.complete(now_ms - DAY_MS);
    tasks.push(done);

    tasks
}

fn demo_meetings() -> Vec<Meeting> {
    vec![
        Meeting::new("Team Standup", at(9, 0), at(9, 30)),
        Meeting::new("Project Review", at(10, 30), at(11, 30)),
        Meeting::new("Client Call", at(13, 0), at(14, 0)),
    ]
}

#[allow(clippy::too_many_arguments)]
fn linked_task(
    title: &str,
    description: &str,
    due_date: NaiveDate,
    due_time: NaiveTime,
    priority: Priority,
    created_at: i64,
    project: Option<&Project>,
    email: Option<&EmailMessage>,
) -> Task {
    let mut task = Task::new(title, due_date, priority, created_at);
    task.description = description.to_string();
    task.due_time = Some(due_time);
    task.project_id = project.map(|project| project.uuid);
    task.email_id = email.map(|email| email.id.clone());
    task.email_subject = email.map(|email| email.subject.clone());
    task
}

fn completed(mut milestone: Milestone) -> Milestone {
    milestone.completed = true;
    milestone
}

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}
