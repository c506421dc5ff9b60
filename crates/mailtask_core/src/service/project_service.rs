//! Project use-case service.
//!
//! # Responsibility
//! - Provide project/milestone CRUD entry points for core callers.
//! - Compute task-completion progress per project.
//!
//! # Invariants
//! - Deleting a project detaches its tasks; the detach count is surfaced to
//!   callers so they can confirm destructive intent.

use crate::model::project::{MilestoneId, Project, ProjectId};
use crate::repo::project_repo::ProjectRepository;
use crate::repo::task_repo::{TaskListQuery, TaskRepository, TaskSort};
use crate::repo::RepoResult;
use log::info;

/// Task-completion tally for one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectProgress {
    pub active: u32,
    pub completed: u32,
    /// Completed share in whole percent, 0 when the project has no tasks.
    pub percent: u8,
}

impl ProjectProgress {
    /// Builds a tally from raw counts.
    pub fn from_counts(active: u32, completed: u32) -> Self {
        let total = active + completed;
        let percent = if total == 0 {
            0
        } else {
            ((f64::from(completed) / f64::from(total)) * 100.0).round() as u8
        };
        Self {
            active,
            completed,
            percent,
        }
    }

    pub fn total(&self) -> u32 {
        self.active + self.completed
    }
}

/// Use-case service wrapper for project operations.
pub struct ProjectService<R: ProjectRepository> {
    repo: R,
}

impl<R: ProjectRepository> ProjectService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a new project, milestones included.
    pub fn create_project(&self, project: &Project) -> RepoResult<ProjectId> {
        let id = self.repo.create_project(project)?;
        info!("event=project_create module=project status=ok project_id={id}");
        Ok(id)
    }

    /// Replaces a project row and its full milestone list.
    pub fn update_project(&self, project: &Project) -> RepoResult<()> {
        self.repo.update_project(project)
    }

    /// Gets one project by ID.
    pub fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        self.repo.get_project(id)
    }

    /// Lists projects in creation order.
    pub fn list_projects(&self) -> RepoResult<Vec<Project>> {
        self.repo.list_projects()
    }

    /// Deletes one project and returns how many tasks were detached.
    pub fn delete_project(&self, id: ProjectId) -> RepoResult<u32> {
        let detached = self.repo.delete_project(id)?;
        info!(
            "event=project_delete module=project status=ok project_id={id} detached_tasks={detached}"
        );
        Ok(detached)
    }

    /// Toggles one milestone's completed flag.
    pub fn set_milestone_completed(
        &self,
        milestone_id: MilestoneId,
        completed: bool,
    ) -> RepoResult<()> {
        self.repo.set_milestone_completed(milestone_id, completed)
    }

    /// Computes the task-completion tally for one project.
    pub fn progress<T: TaskRepository>(
        &self,
        tasks: &T,
        project_id: ProjectId,
    ) -> RepoResult<ProjectProgress> {
        let active = tasks.list_tasks(&TaskListQuery {
            project: Some(project_id),
            sort: TaskSort::DueDate,
            ..TaskListQuery::default()
        })?;
        let completed = tasks.list_tasks(&TaskListQuery {
            completed: true,
            project: Some(project_id),
            sort: TaskSort::CompletedAt,
            ..TaskListQuery::default()
        })?;
        Ok(ProjectProgress::from_counts(
            active.len() as u32,
            completed.len() as u32,
        ))
    }
}
