//! Mail ingest and conversion use-case service.
//!
//! # Responsibility
//! - Pull candidate messages from a mail source into local storage.
//! - Convert messages into tasks with the configured defaults.
//! - Derive listing projections (sender initials, body preview).
//!
//! # Invariants
//! - Sync never overwrites the local read flag of an existing message.
//! - One task per source email; repeat conversion is rejected.
//! - Converted tasks default to tomorrow 17:00 and inherit `high` priority
//!   from high-importance mail.

use crate::mail::{MailSource, MailSourceError};
use crate::model::email::{EmailId, EmailMessage};
use crate::model::task::{Priority, Task, TaskId};
use crate::repo::email_repo::{EmailFilter, EmailRepository};
use crate::repo::task_repo::TaskRepository;
use crate::repo::{RepoError, RepoResult};
use chrono::{Days, NaiveDate, NaiveTime};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+").expect("valid url regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

const BODY_PREVIEW_CHARS: usize = 120;

/// Service error for mail use-cases.
#[derive(Debug)]
pub enum MailServiceError {
    /// Target message does not exist locally.
    EmailNotFound(EmailId),
    /// Message already has a task; ids identify both sides.
    AlreadyConverted { email_id: EmailId, task_id: TaskId },
    /// Mail source failure during sync.
    Source(MailSourceError),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for MailServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmailNotFound(id) => write!(f, "email not found: {id}"),
            Self::AlreadyConverted { email_id, task_id } => {
                write!(f, "email {email_id} already converted to task {task_id}")
            }
            Self::Source(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent mail state: {details}")
            }
        }
    }
}

impl Error for MailServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Source(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for MailServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::EmailNotFound(id) => Self::EmailNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<MailSourceError> for MailServiceError {
    fn from(value: MailSourceError) -> Self {
        Self::Source(value)
    }
}

/// Outcome of one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Folder the messages came from.
    pub folder: String,
    pub fetched: u32,
    /// Messages seen for the first time.
    pub inserted: u32,
    /// Messages already known and refreshed in place.
    pub refreshed: u32,
}

/// Conversion parameters resolved by the caller.
#[derive(Debug, Clone, Copy)]
pub struct ConvertOptions {
    /// Reference day; converted tasks are due the day after.
    pub today: NaiveDate,
    /// Creation timestamp for the new task, epoch milliseconds.
    pub now_ms: i64,
    /// Priority for messages without high importance.
    pub default_priority: Priority,
}

/// One message plus its conversion state, for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailOverview {
    pub email: EmailMessage,
    /// Task created from this message, if any.
    pub task_id: Option<TaskId>,
}

/// Mail service facade over repository implementations.
pub struct MailService<R: EmailRepository> {
    repo: R,
}

impl<R: EmailRepository> MailService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Pulls the action-required folder from `source` into local storage.
    ///
    /// Existing messages are refreshed without touching their read flag.
    pub fn sync_from(&self, source: &dyn MailSource) -> Result<SyncReport, MailServiceError> {
        let messages = source.fetch_action_required()?;
        let fetched = messages.len() as u32;
        let mut inserted = 0u32;

        for message in &messages {
            if self.repo.upsert_email(message)? {
                inserted += 1;
            }
        }

        let report = SyncReport {
            folder: source.folder_name().to_string(),
            fetched,
            inserted,
            refreshed: fetched - inserted,
        };
        info!(
            "event=mail_sync module=mail status=ok source={} folder={} fetched={} inserted={}",
            source.source_id(),
            report.folder,
            report.fetched,
            report.inserted
        );
        Ok(report)
    }

    /// Lists messages under the given filter, newest first.
    pub fn list_emails(&self, filter: EmailFilter) -> RepoResult<Vec<EmailMessage>> {
        self.repo.list_emails(filter)
    }

    /// Lists messages with their conversion state, newest first.
    pub fn list_overview<T: TaskRepository>(
        &self,
        tasks: &T,
        filter: EmailFilter,
    ) -> RepoResult<Vec<EmailOverview>> {
        let emails = self.repo.list_emails(filter)?;
        let mut overview = Vec::with_capacity(emails.len());
        for email in emails {
            let task_id = tasks.find_task_for_email(&email.id)?;
            overview.push(EmailOverview { email, task_id });
        }
        Ok(overview)
    }

    /// Gets one message by external id.
    pub fn get_email(&self, id: &str) -> RepoResult<Option<EmailMessage>> {
        self.repo.get_email(id)
    }

    /// Marks one message as read.
    pub fn mark_read(&self, id: &str) -> RepoResult<()> {
        self.repo.mark_read(id)
    }

    /// Converts one message into a task.
    ///
    /// # Contract
    /// - Task title/description come from subject/body.
    /// - Due date is the day after `options.today`, at 17:00.
    /// - High-importance mail yields `Priority::High`; everything else uses
    ///   `options.default_priority`.
    /// - The email link and a subject snapshot are recorded on the task.
    pub fn convert_to_task<T: TaskRepository>(
        &self,
        tasks: &T,
        email_id: &str,
        options: &ConvertOptions,
    ) -> Result<Task, MailServiceError> {
        let email = self
            .repo
            .get_email(email_id)?
            .ok_or_else(|| MailServiceError::EmailNotFound(email_id.to_string()))?;

        if let Some(task_id) = tasks.find_task_for_email(email_id)? {
            return Err(MailServiceError::AlreadyConverted {
                email_id: email_id.to_string(),
                task_id,
            });
        }

        let task = task_from_email(&email, options);
        let task_id = tasks.create_task(&task)?;
        info!(
            "event=mail_convert module=mail status=ok email_id={email_id} task_id={task_id}"
        );
        Ok(task)
    }

    /// Converts every message that has no task yet.
    ///
    /// Returns the newly created tasks; already-converted messages are
    /// skipped silently.
    pub fn convert_all<T: TaskRepository>(
        &self,
        tasks: &T,
        options: &ConvertOptions,
    ) -> Result<Vec<Task>, MailServiceError> {
        let mut created = Vec::new();
        for email in self.repo.list_emails(EmailFilter::All)? {
            if tasks.find_task_for_email(&email.id)?.is_some() {
                continue;
            }
            let task = task_from_email(&email, options);
            tasks.create_task(&task)?;
            created.push(task);
        }
        info!(
            "event=mail_convert_all module=mail status=ok created={}",
            created.len()
        );
        Ok(created)
    }
}

fn task_from_email(email: &EmailMessage, options: &ConvertOptions) -> Task {
    let priority = if email.is_flagged() {
        Priority::High
    } else {
        options.default_priority
    };

    let mut task = Task::new(
        email.subject.clone(),
        options.today + Days::new(1),
        priority,
        options.now_ms,
    );
    task.description = email.body.clone();
    task.due_time = NaiveTime::from_hms_opt(17, 0, 0);
    task.email_id = Some(email.id.clone());
    task.email_subject = Some(email.subject.clone());
    task
}

/// Derives a short plain-text preview from a message body.
///
/// Rules:
/// - URLs are dropped, whitespace is collapsed.
/// - The first 120 characters are retained.
pub fn body_preview(body: &str) -> Option<String> {
    let without_urls = URL_RE.replace_all(body, " ");
    let normalized = WHITESPACE_RE.replace_all(&without_urls, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.chars().take(BODY_PREVIEW_CHARS).collect())
    }
}

/// Derives up to two uppercase initials from a sender display name.
pub fn sender_initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}
