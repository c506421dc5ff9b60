//! Project/milestone repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist projects together with their ordered milestone lists.
//! - Own the detach-tasks logic that runs when a project is deleted.
//!
//! # Invariants
//! - Milestone lists are replaced as one unit inside a transaction.
//! - Deleting a project removes its milestones and nulls `project_uuid` on
//!   referencing tasks; tasks themselves are never deleted.

use crate::model::project::{DeadlineType, Milestone, MilestoneId, Project, ProjectId};
use crate::repo::{
    bool_to_int, ensure_schema_ready, int_to_bool, parse_date, parse_uuid, RepoError, RepoResult,
    RequiredTable,
};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const PROJECT_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    description,
    color,
    start_date,
    end_date,
    deadline,
    created_at
FROM projects";

const REQUIRED_TABLES: &[RequiredTable] = &[
    RequiredTable {
        name: "projects",
        columns: &[
            "uuid",
            "name",
            "description",
            "color",
            "start_date",
            "end_date",
            "deadline",
            "created_at",
        ],
    },
    RequiredTable {
        name: "milestones",
        columns: &[
            "uuid",
            "project_uuid",
            "name",
            "deadline_type",
            "date",
            "completed",
            "position",
        ],
    },
    RequiredTable {
        name: "tasks",
        columns: &["uuid", "project_uuid"],
    },
];

/// Repository interface for project and milestone persistence.
pub trait ProjectRepository {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId>;
    /// Replaces the project row and its full milestone list.
    fn update_project(&self, project: &Project) -> RepoResult<()>;
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    fn list_projects(&self) -> RepoResult<Vec<Project>>;
    /// Deletes one project and returns how many tasks were detached from it.
    fn delete_project(&self, id: ProjectId) -> RepoResult<u32>;
    fn set_milestone_completed(
        &self,
        milestone_id: MilestoneId,
        completed: bool,
    ) -> RepoResult<()>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn, REQUIRED_TABLES)?;
        Ok(Self { conn })
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId> {
        project.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO projects (
                uuid,
                name,
                description,
                color,
                start_date,
                end_date,
                deadline,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                project.uuid.to_string(),
                project.name.as_str(),
                project.description.as_str(),
                project.color.as_str(),
                project.start_date.map(|date| date.to_string()),
                project.end_date.map(|date| date.to_string()),
                project.deadline.map(|date| date.to_string()),
                project.created_at,
            ],
        )?;
        insert_milestones_in_tx(&tx, project)?;
        tx.commit()?;

        Ok(project.uuid)
    }

    fn update_project(&self, project: &Project) -> RepoResult<()> {
        project.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE projects
             SET
                name = ?1,
                description = ?2,
                color = ?3,
                start_date = ?4,
                end_date = ?5,
                deadline = ?6
             WHERE uuid = ?7;",
            params![
                project.name.as_str(),
                project.description.as_str(),
                project.color.as_str(),
                project.start_date.map(|date| date.to_string()),
                project.end_date.map(|date| date.to_string()),
                project.deadline.map(|date| date.to_string()),
                project.uuid.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(project.uuid));
        }

        tx.execute(
            "DELETE FROM milestones WHERE project_uuid = ?1;",
            [project.uuid.to_string()],
        )?;
        insert_milestones_in_tx(&tx, project)?;
        tx.commit()?;

        Ok(())
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            let mut project = parse_project_row(row)?;
            project.milestones = load_milestones(self.conn, id)?;
            project.validate()?;
            return Ok(Some(project));
        }

        Ok(None)
    }

    fn list_projects(&self) -> RepoResult<Vec<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} ORDER BY created_at ASC, uuid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut projects = Vec::new();

        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        drop(rows);
        drop(stmt);

        for project in &mut projects {
            project.milestones = load_milestones(self.conn, project.uuid)?;
            project.validate()?;
        }

        Ok(projects)
    }

    fn delete_project(&self, id: ProjectId) -> RepoResult<u32> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let detached = tx.execute(
            "UPDATE tasks SET project_uuid = NULL WHERE project_uuid = ?1;",
            [id.to_string()],
        )?;
        tx.execute(
            "DELETE FROM milestones WHERE project_uuid = ?1;",
            [id.to_string()],
        )?;
        let removed = tx.execute("DELETE FROM projects WHERE uuid = ?1;", [id.to_string()])?;

        if removed == 0 {
            return Err(RepoError::NotFound(id));
        }

        tx.commit()?;
        Ok(detached as u32)
    }

    fn set_milestone_completed(
        &self,
        milestone_id: MilestoneId,
        completed: bool,
    ) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE milestones SET completed = ?1 WHERE uuid = ?2;",
            params![bool_to_int(completed), milestone_id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(milestone_id));
        }

        Ok(())
    }
}

fn insert_milestones_in_tx(tx: &Transaction<'_>, project: &Project) -> RepoResult<()> {
    for (position, milestone) in project.milestones.iter().enumerate() {
        tx.execute(
            "INSERT INTO milestones (
                uuid,
                project_uuid,
                name,
                deadline_type,
                date,
                completed,
                position
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                milestone.uuid.to_string(),
                project.uuid.to_string(),
                milestone.name.as_str(),
                milestone.deadline_type.code(),
                milestone.date.to_string(),
                bool_to_int(milestone.completed),
                position as i64,
            ],
        )?;
    }
    Ok(())
}

fn load_milestones(conn: &Connection, project_id: ProjectId) -> RepoResult<Vec<Milestone>> {
    let mut stmt = conn.prepare(
        "SELECT uuid, name, deadline_type, date, completed
         FROM milestones
         WHERE project_uuid = ?1
         ORDER BY position ASC, date ASC;",
    )?;

    let mut rows = stmt.query([project_id.to_string()])?;
    let mut milestones = Vec::new();
    while let Some(row) = rows.next()? {
        milestones.push(parse_milestone_row(row)?);
    }

    Ok(milestones)
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "projects.uuid")?;

    Ok(Project {
        uuid,
        name: row.get("name")?,
        description: row.get("description")?,
        color: row.get("color")?,
        start_date: parse_optional_date(row, "start_date", "projects.start_date")?,
        end_date: parse_optional_date(row, "end_date", "projects.end_date")?,
        deadline: parse_optional_date(row, "deadline", "projects.deadline")?,
        created_at: row.get("created_at")?,
        milestones: Vec::new(),
    })
}

fn parse_milestone_row(row: &Row<'_>) -> RepoResult<Milestone> {
    let uuid_text: String = row.get("uuid")?;
    let uuid = parse_uuid(&uuid_text, "milestones.uuid")?;

    let type_text: String = row.get("deadline_type")?;
    let deadline_type = DeadlineType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid deadline type `{type_text}` in milestones.deadline_type"
        ))
    })?;

    let date_text: String = row.get("date")?;
    let date = parse_date(&date_text, "milestones.date")?;

    Ok(Milestone {
        uuid,
        name: row.get("name")?,
        deadline_type,
        date,
        completed: int_to_bool(row.get("completed")?, "milestones.completed")?,
    })
}

fn parse_optional_date(
    row: &Row<'_>,
    column: &str,
    context: &str,
) -> RepoResult<Option<chrono::NaiveDate>> {
    match row.get::<_, Option<String>>(column)? {
        Some(value) => Ok(Some(parse_date(&value, context)?)),
        None => Ok(None),
    }
}
