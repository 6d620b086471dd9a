//! Task handler
//!
//! Bridges the HTTP routes with the injected TaskRepository. Every method
//! performs exactly one repository call.

use std::sync::Arc;

use task_core::{error::Result, NewTask, Task, TaskError, TaskFilter, TaskRepository};

use crate::dto::{CreateTaskRequest, ListTasksQuery};

/// Task handler shared by every route through the router state
#[derive(Clone)]
pub struct TaskHandler {
    repository: Arc<dyn TaskRepository>,
}

impl TaskHandler {
    /// Create new task handler
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self { repository }
    }

    /// Get a clone of the repository Arc
    pub fn repository(&self) -> Arc<dyn TaskRepository> {
        self.repository.clone()
    }

    pub async fn list_tasks(&self, query: ListTasksQuery) -> Result<Vec<Task>> {
        let filter = TaskFilter::from(query);
        self.repository.list(filter).await
    }

    /// Create a task; a missing title is rejected like a blank one
    pub async fn create_task(&self, request: CreateTaskRequest) -> Result<Task> {
        let title = request
            .title
            .ok_or_else(|| TaskError::empty_field("title"))?;
        self.repository
            .create(NewTask::new(title, request.category))
            .await
    }

    pub async fn toggle_task(&self, raw_id: &str) -> Result<Task> {
        let id = parse_task_id(raw_id)?;
        self.repository.toggle(id).await
    }

    pub async fn delete_task(&self, raw_id: &str) -> Result<()> {
        let id = parse_task_id(raw_id)?;
        self.repository.delete(id).await
    }

    pub async fn health_check(&self) -> Result<()> {
        self.repository.health_check().await
    }
}

/// Parse a path segment as a task id.
///
/// A segment that is not an integer cannot name a task, so it is reported
/// as not found.
pub fn parse_task_id(raw_id: &str) -> Result<i64> {
    raw_id
        .parse::<i64>()
        .map_err(|_| TaskError::NotFound(format!("Task with ID '{raw_id}' not found")))
}
