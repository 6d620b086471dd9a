use async_trait::async_trait;
use crate::{
    error::Result,
    models::{NewTask, Task, TaskFilter},
};

/// Repository trait for task persistence and retrieval operations
///
/// This trait is the single storage interface the web layer talks to; the
/// relational and in-memory backends are swapped behind it.
/// Implementations must be thread-safe and support concurrent access.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// List tasks ordered by ascending id
    ///
    /// # Arguments
    /// * `filter` - The filter criteria to apply
    ///
    /// # Returns
    /// * `Ok(Vec<Task>)` - The matching tasks (may be empty)
    /// * `Err(TaskError::Database)` - If the query fails
    /// * `Err(TaskError::Connection)` - If the database cannot be reached
    async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>>;

    /// Create a new task
    ///
    /// # Arguments
    /// * `task` - The new task data; the title is trimmed and a blank category dropped
    ///
    /// # Returns
    /// * `Ok(Task)` - The created task with its assigned ID and `done = false`
    /// * `Err(TaskError::Validation)` - If the title is empty or whitespace-only
    /// * `Err(TaskError::Database)` - If the database operation fails
    async fn create(&self, task: NewTask) -> Result<Task>;

    /// Flip the completion flag of a task
    ///
    /// # Returns
    /// * `Ok(Task)` - The task after the flip
    /// * `Err(TaskError::NotFound)` - If no task has that ID
    /// * `Err(TaskError::Database)` - If the database operation fails
    async fn toggle(&self, id: i64) -> Result<Task>;

    /// Remove a task
    ///
    /// # Returns
    /// * `Ok(())` - The task was removed
    /// * `Err(TaskError::NotFound)` - If no task has that ID
    /// * `Err(TaskError::Database)` - If the database operation fails
    async fn delete(&self, id: i64) -> Result<()>;

    /// Get repository health status for monitoring
    ///
    /// # Returns
    /// * `Ok(())` - Repository is healthy and reachable
    /// * `Err(TaskError::Connection)` / `Err(TaskError::Database)` - Repository is unhealthy
    async fn health_check(&self) -> Result<()>;
}
