//! Core domain logic for mailtask.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod mail;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use mail::demo::{demo_dataset, seed_demo, DemoDataset, DemoMailbox};
pub use mail::{MailSource, MailSourceError};
pub use model::email::{EmailId, EmailMessage, EmailValidationError, Importance};
pub use model::meeting::{Meeting, MeetingId, MeetingValidationError};
pub use model::project::{
    DeadlineType, Milestone, MilestoneId, Project, ProjectId, ProjectValidationError,
};
pub use model::settings::{Settings, SettingsValidationError, DEFAULT_ACTION_REQUIRED_FOLDER};
pub use model::task::{DueBucket, Priority, Task, TaskId, TaskValidationError};
pub use repo::email_repo::{EmailFilter, EmailRepository, SqliteEmailRepository};
pub use repo::meeting_repo::{MeetingRepository, SqliteMeetingRepository};
pub use repo::project_repo::{ProjectRepository, SqliteProjectRepository};
pub use repo::settings_repo::{SettingsRepository, SqliteSettingsRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskListQuery, TaskRepository, TaskSort};
pub use repo::{RepoError, RepoResult};
pub use search::fts::{search_tasks, SearchError, SearchHit, SearchQuery, SearchResult};
pub use service::mail_service::{
    body_preview, sender_initials, ConvertOptions, EmailOverview, MailService, MailServiceError,
    SyncReport,
};
pub use service::project_service::{ProjectProgress, ProjectService};
pub use service::task_service::TaskService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
