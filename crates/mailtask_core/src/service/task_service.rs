//! Task use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD and lifecycle entry points for core callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.

use crate::model::task::{DueBucket, Task, TaskId};
use crate::repo::task_repo::{TaskListQuery, TaskRepository, TaskSort};
use crate::repo::RepoResult;
use chrono::NaiveDate;
use log::info;

/// Use-case service wrapper for task operations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a new task through repository persistence.
    pub fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        let id = self.repo.create_task(task)?;
        info!("event=task_create module=task status=ok task_id={id}");
        Ok(id)
    }

    /// Updates an existing task by stable ID.
    ///
    /// Returns repository-level not-found or validation errors unchanged.
    pub fn update_task(&self, task: &Task) -> RepoResult<()> {
        self.repo.update_task(task)
    }

    /// Gets one task by ID.
    pub fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        self.repo.get_task(id)
    }

    /// Lists active tasks in the given sort order.
    pub fn list_active(&self, sort: TaskSort) -> RepoResult<Vec<Task>> {
        self.repo.list_tasks(&TaskListQuery {
            sort,
            ..TaskListQuery::default()
        })
    }

    /// Lists completed tasks, most recently completed first.
    pub fn list_completed(&self) -> RepoResult<Vec<Task>> {
        self.repo.list_tasks(&TaskListQuery {
            completed: true,
            sort: TaskSort::CompletedAt,
            ..TaskListQuery::default()
        })
    }

    /// Lists active tasks whose due date falls into `bucket` relative to
    /// `today`, sorted by priority.
    pub fn list_in_bucket(&self, bucket: DueBucket, today: NaiveDate) -> RepoResult<Vec<Task>> {
        let tasks = self.list_active(TaskSort::Priority)?;
        Ok(tasks
            .into_iter()
            .filter(|task| task.due_bucket(today) == bucket)
            .collect())
    }

    /// Lists active tasks belonging to one project, sorted by priority.
    pub fn list_for_project(&self, project_id: uuid::Uuid) -> RepoResult<Vec<Task>> {
        self.repo.list_tasks(&TaskListQuery {
            project: Some(project_id),
            sort: TaskSort::Priority,
            ..TaskListQuery::default()
        })
    }

    /// Marks one task completed at the given timestamp.
    pub fn complete_task(&self, id: TaskId, completed_at: i64) -> RepoResult<()> {
        self.repo.complete_task(id, completed_at)?;
        info!("event=task_complete module=task status=ok task_id={id}");
        Ok(())
    }

    /// Returns one task to the active list.
    pub fn reopen_task(&self, id: TaskId) -> RepoResult<()> {
        self.repo.reopen_task(id)
    }

    /// Deletes one task permanently.
    pub fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        self.repo.delete_task(id)
    }

    /// Deletes all completed tasks and returns how many were removed.
    pub fn clear_completed(&self) -> RepoResult<u32> {
        let removed = self.repo.clear_completed()?;
        info!("event=task_clear_completed module=task status=ok removed={removed}");
        Ok(removed)
    }
}
