//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD and lifecycle APIs over canonical `tasks` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Task::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Completion and reopen are idempotent; the first completion timestamp
//!   wins.

use crate::model::project::ProjectId;
use crate::model::task::{Priority, Task, TaskId};
use crate::repo::{
    bool_to_int, ensure_schema_ready, format_time, int_to_bool, parse_date, parse_time,
    parse_uuid, RepoError, RepoResult, RequiredTable,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    description,
    due_date,
    due_time,
    priority,
    project_uuid,
    email_id,
    email_subject,
    created_at,
    completed,
    completed_at
FROM tasks";

const REQUIRED_TABLES: &[RequiredTable] = &[RequiredTable {
    name: "tasks",
    columns: &[
        "uuid",
        "title",
        "description",
        "due_date",
        "due_time",
        "priority",
        "project_uuid",
        "email_id",
        "email_subject",
        "created_at",
        "completed",
        "completed_at",
    ],
}];

/// Sort modes for task listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskSort {
    /// Earliest due date first; time-less tasks sort after timed ones on the
    /// same day.
    #[default]
    DueDate,
    /// Most urgent priority first.
    Priority,
    /// Newest first.
    CreatedAt,
    /// Most recently completed first.
    CompletedAt,
}

impl TaskSort {
    fn order_clause(self) -> &'static str {
        match self {
            Self::DueDate => " ORDER BY due_date ASC, IFNULL(due_time, '99:99') ASC, uuid ASC",
            Self::Priority => {
                " ORDER BY CASE priority
                    WHEN 'urgent' THEN 0
                    WHEN 'high' THEN 1
                    WHEN 'medium' THEN 2
                    ELSE 3
                  END ASC, due_date ASC, uuid ASC"
            }
            Self::CreatedAt => " ORDER BY created_at DESC, uuid ASC",
            Self::CompletedAt => " ORDER BY completed_at DESC, uuid ASC",
        }
    }
}

/// Query options for listing tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskListQuery {
    /// `false` lists active tasks, `true` lists completed ones.
    pub completed: bool,
    /// Optional owning-project filter.
    pub project: Option<ProjectId>,
    pub sort: TaskSort,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for task CRUD and lifecycle operations.
pub trait TaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
    /// Marks one task completed. Idempotent; keeps the first timestamp.
    fn complete_task(&self, id: TaskId, completed_at: i64) -> RepoResult<()>;
    /// Returns one task to the active list. Idempotent.
    fn reopen_task(&self, id: TaskId) -> RepoResult<()>;
    /// Deletes all completed tasks and returns how many were removed.
    fn clear_completed(&self) -> RepoResult<u32>;
    /// Finds the task created from the given source email, if any.
    fn find_task_for_email(&self, email_id: &str) -> RepoResult<Option<TaskId>>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (
                uuid,
                title,
                description,
                due_date,
                due_time,
                priority,
                project_uuid,
                email_id,
                email_subject,
                created_at,
                completed,
                completed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
            params![
                task.uuid.to_string(),
                task.title.as_str(),
                task.description.as_str(),
                task.due_date.to_string(),
                task.due_time.map(format_time),
                task.priority.as_str(),
                task.project_id.map(|id| id.to_string()),
                task.email_id.as_deref(),
                task.email_subject.as_deref(),
                task.created_at,
                bool_to_int(task.completed),
                task.completed_at,
            ],
        )?;

        Ok(task.uuid)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                title = ?1,
                description = ?2,
                due_date = ?3,
                due_time = ?4,
                priority = ?5,
                project_uuid = ?6,
                email_id = ?7,
                email_subject = ?8,
                completed = ?9,
                completed_at = ?10
             WHERE uuid = ?11;",
            params![
                task.title.as_str(),
                task.description.as_str(),
                task.due_date.to_string(),
                task.due_time.map(format_time),
                task.priority.as_str(),
                task.project_id.map(|id| id.to_string()),
                task.email_id.as_deref(),
                task.email_subject.as_deref(),
                bool_to_int(task.completed),
                task.completed_at,
                task.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(task.uuid));
        }

        Ok(())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE completed = ?");
        let mut bind_values: Vec<Value> = vec![Value::Integer(bool_to_int(query.completed))];

        if let Some(project) = query.project {
            sql.push_str(" AND project_uuid = ?");
            bind_values.push(Value::Text(project.to_string()));
        }

        sql.push_str(query.sort.order_clause());

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn complete_task(&self, id: TaskId, completed_at: i64) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                completed = 1,
                completed_at = COALESCE(completed_at, ?2)
             WHERE uuid = ?1;",
            params![id.to_string(), completed_at],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn reopen_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                completed = 0,
                completed_at = NULL
             WHERE uuid = ?1;",
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn clear_completed(&self) -> RepoResult<u32> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE completed = 1;", [])?;
        Ok(changed as u32)
    }

    fn find_task_for_email(&self, email_id: &str) -> RepoResult<Option<TaskId>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid
             FROM tasks
             WHERE email_id = ?1
             ORDER BY created_at ASC
             LIMIT 1;",
        )?;

        let mut rows = stmt.query([email_id])?;
        if let Some(row) = rows.next()? {
            let uuid_text: String = row.get(0)?;
            return Ok(Some(parse_uuid(&uuid_text, "tasks.uuid")?));
        }

        Ok(None)
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "tasks.uuid")?;

    let due_date_text: String = row.get("due_date")?;
    let due_date = parse_date(&due_date_text, "tasks.due_date")?;

    let due_time = match row.get::<_, Option<String>>("due_time")? {
        Some(value) => Some(parse_time(&value, "tasks.due_time")?),
        None => None,
    };

    let priority_text: String = row.get("priority")?;
    let priority = Priority::parse(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid priority `{priority_text}` in tasks.priority"
        ))
    })?;

    let project_id = match row.get::<_, Option<String>>("project_uuid")? {
        Some(value) => Some(parse_uuid(&value, "tasks.project_uuid")?),
        None => None,
    };

    let completed = int_to_bool(row.get("completed")?, "tasks.completed")?;

    let task = Task {
        uuid,
        title: row.get("title")?,
        description: row.get("description")?,
        due_date,
        due_time,
        priority,
        project_id,
        email_id: row.get("email_id")?,
        email_subject: row.get("email_subject")?,
        created_at: row.get("created_at")?,
        completed,
        completed_at: row.get("completed_at")?,
    };
    task.validate()?;
    Ok(task)
}
