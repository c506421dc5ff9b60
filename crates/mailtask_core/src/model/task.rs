//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical to-do record shared by list/calendar/dashboard
//!   views.
//! - Provide lifecycle helpers for completion state and due-date bucketing.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another task.
//! - `title` is never blank.
//! - `completed_at` is set if and only if `completed` is true.

use chrono::{Days, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a task.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TaskId = Uuid;

/// Urgency level used for sorting and dashboard rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort rank. Lower rank means more urgent.
    pub fn rank(self) -> u8 {
        match self {
            Self::Urgent => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    /// Stable storage/wire token for this priority.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Parses one storage/wire token.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "urgent" => Some(Self::Urgent),
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Due-date classification relative to a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueBucket {
    /// Due date is strictly before the reference day.
    Overdue,
    /// Due date equals the reference day.
    DueToday,
    /// Due date falls within the next seven days.
    ThisWeek,
    /// Due date is further out.
    Later,
}

/// Validation failures for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Nil UUID would break stable-identity guarantees.
    NilUuid,
    /// Title must contain at least one non-whitespace character.
    BlankTitle,
    /// `completed` and `completed_at` disagree.
    CompletionStateMismatch,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilUuid => write!(f, "task uuid must not be nil"),
            Self::BlankTitle => write!(f, "task title must not be blank"),
            Self::CompletionStateMismatch => write!(
                f,
                "completed_at must be set exactly when completed is true"
            ),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical to-do record.
///
/// Email-origin fields stay optional so manually created tasks and converted
/// tasks share one storage shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskWire")]
pub struct Task {
    /// Stable global ID used for linking and auditing.
    pub uuid: TaskId,
    pub title: String,
    pub description: String,
    /// Calendar day the task is due.
    pub due_date: NaiveDate,
    /// Optional time-of-day deadline on `due_date`.
    pub due_time: Option<NaiveTime>,
    pub priority: Priority,
    /// Owning project, if any. Cleared when the project is deleted.
    pub project_id: Option<Uuid>,
    /// External id of the source email, if the task was converted from one.
    pub email_id: Option<String>,
    /// Subject snapshot taken at conversion time.
    pub email_subject: Option<String>,
    /// Creation timestamp in epoch milliseconds.
    pub created_at: i64,
    pub completed: bool,
    /// Completion timestamp in epoch milliseconds.
    pub completed_at: Option<i64>,
}

/// Wire shadow used to validate tasks during deserialization.
#[derive(Deserialize)]
struct TaskWire {
    uuid: TaskId,
    title: String,
    description: String,
    due_date: NaiveDate,
    due_time: Option<NaiveTime>,
    priority: Priority,
    project_id: Option<Uuid>,
    email_id: Option<String>,
    email_subject: Option<String>,
    created_at: i64,
    completed: bool,
    completed_at: Option<i64>,
}

impl TryFrom<TaskWire> for Task {
    type Error = TaskValidationError;

    fn try_from(wire: TaskWire) -> Result<Self, Self::Error> {
        let task = Task {
            uuid: wire.uuid,
            title: wire.title,
            description: wire.description,
            due_date: wire.due_date,
            due_time: wire.due_time,
            priority: wire.priority,
            project_id: wire.project_id,
            email_id: wire.email_id,
            email_subject: wire.email_subject,
            created_at: wire.created_at,
            completed: wire.completed,
            completed_at: wire.completed_at,
        };
        task.validate()?;
        Ok(task)
    }
}

impl Task {
    /// Creates a new active task with a generated stable ID.
    pub fn new(
        title: impl Into<String>,
        due_date: NaiveDate,
        priority: Priority,
        created_at: i64,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            due_date,
            due_time: None,
            priority,
            project_id: None,
            email_id: None,
            email_subject: None,
            created_at,
            completed: false,
            completed_at: None,
        }
    }

    /// Creates a task with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(
        uuid: TaskId,
        title: impl Into<String>,
        due_date: NaiveDate,
        priority: Priority,
        created_at: i64,
    ) -> Result<Self, TaskValidationError> {
        let mut task = Self::new(title, due_date, priority, created_at);
        task.uuid = uuid;
        task.validate()?;
        Ok(task)
    }

    /// Checks all record-level invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.uuid.is_nil() {
            return Err(TaskValidationError::NilUuid);
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::BlankTitle);
        }
        if self.completed != self.completed_at.is_some() {
            return Err(TaskValidationError::CompletionStateMismatch);
        }
        Ok(())
    }

    /// Marks this task completed at the given timestamp.
    pub fn complete(&mut self, completed_at: i64) {
        self.completed = true;
        self.completed_at = Some(completed_at);
    }

    /// Returns this task to the active list.
    pub fn reopen(&mut self) {
        self.completed = false;
        self.completed_at = None;
    }

    /// Returns whether the due date is strictly before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date < today
    }

    /// Returns whether the due date equals `today`.
    pub fn is_due_today(&self, today: NaiveDate) -> bool {
        self.due_date == today
    }

    /// Classifies the due date relative to `today`.
    ///
    /// `ThisWeek` covers the seven days after `today`, matching the
    /// dashboard badge semantics.
    pub fn due_bucket(&self, today: NaiveDate) -> DueBucket {
        let end_of_week = today + Days::new(7);
        if self.due_date < today {
            DueBucket::Overdue
        } else if self.due_date == today {
            DueBucket::DueToday
        } else if self.due_date <= end_of_week {
            DueBucket::ThisWeek
        } else {
            DueBucket::Later
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DueBucket, Priority, Task};
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn priority_rank_orders_urgent_first() {
        assert!(Priority::Urgent.rank() < Priority::High.rank());
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
    }

    #[test]
    fn due_bucket_boundaries() {
        let today = day(2026, 8, 7);
        let mut task = Task::new("t", today, Priority::Medium, 0);

        task.due_date = day(2026, 8, 6);
        assert_eq!(task.due_bucket(today), DueBucket::Overdue);
        task.due_date = today;
        assert_eq!(task.due_bucket(today), DueBucket::DueToday);
        task.due_date = day(2026, 8, 14);
        assert_eq!(task.due_bucket(today), DueBucket::ThisWeek);
        task.due_date = day(2026, 8, 15);
        assert_eq!(task.due_bucket(today), DueBucket::Later);
    }
}
