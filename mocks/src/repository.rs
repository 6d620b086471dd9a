//! Mock implementation of TaskRepository trait
//!
//! Provides a thread-safe mock repository with:
//! - Error injection capabilities
//! - Call tracking for verification
//! - Realistic behavior simulation

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};
use task_core::{NewTask, Result, Task, TaskError, TaskFilter, TaskRepository, TaskValidator};

/// Mock implementation of TaskRepository for testing
///
/// Clones share the same state, so a test can keep a handle while the code
/// under test owns another.
#[derive(Clone)]
pub struct MockTaskRepository {
    tasks: Arc<Mutex<BTreeMap<i64, Task>>>,
    next_id: Arc<AtomicI64>,
    error_injection: Arc<Mutex<Option<TaskError>>>,
    sticky_error: Arc<Mutex<Option<TaskError>>>,
    call_history: Arc<Mutex<Vec<String>>>,
}

impl Default for MockTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTaskRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::with_next_id(1)
    }

    /// Create mock repository with pre-populated tasks
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let max_id = tasks.iter().map(|task| task.id).max().unwrap_or(0);
        let repo = Self::with_next_id(max_id + 1);
        {
            let mut map = repo.tasks.lock();
            for task in tasks {
                map.insert(task.id, task);
            }
        }
        repo
    }

    /// Create mock repository with specific starting ID
    pub fn with_next_id(next_id: i64) -> Self {
        Self {
            tasks: Arc::new(Mutex::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(next_id)),
            error_injection: Arc::new(Mutex::new(None)),
            sticky_error: Arc::new(Mutex::new(None)),
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Inject error for next operation
    pub fn inject_error(&self, error: TaskError) {
        *self.error_injection.lock() = Some(error);
    }

    /// Fail every operation with `error` until [`clear_error`](Self::clear_error)
    pub fn fail_always(&self, error: TaskError) {
        *self.sticky_error.lock() = Some(error);
    }

    /// Clear error injection
    pub fn clear_error(&self) {
        *self.error_injection.lock() = None;
        *self.sticky_error.lock() = None;
    }

    /// Get history of called methods
    pub fn call_history(&self) -> Vec<String> {
        self.call_history.lock().clone()
    }

    /// Clear call history
    pub fn clear_history(&self) {
        self.call_history.lock().clear();
    }

    /// Snapshot of stored tasks in id order
    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.lock().values().cloned().collect()
    }

    /// Assert method was called
    pub fn assert_called(&self, method: &str) {
        let history = self.call_history.lock();
        assert!(
            history.iter().any(|call| call.contains(method)),
            "Method '{}' was not called. Call history: {:?}",
            method,
            *history
        );
    }

    /// Assert method was never called
    pub fn assert_not_called(&self, method: &str) {
        let history = self.call_history.lock();
        assert!(
            !history.iter().any(|call| call.contains(method)),
            "Method '{}' was called unexpectedly. Call history: {:?}",
            method,
            *history
        );
    }

    /// Check if an error should be injected, consuming one-shot errors
    fn check_error_injection(&self) -> Result<()> {
        if let Some(error) = self.error_injection.lock().take() {
            return Err(error);
        }
        if let Some(error) = self.sticky_error.lock().clone() {
            return Err(error);
        }
        Ok(())
    }

    /// Record method call in history
    fn record_call(&self, method: &str) {
        self.call_history.lock().push(format!("{method}()"));
    }

    /// Record method call with parameters in history
    fn record_call_with_params(&self, method: &str, params: &str) {
        self.call_history.lock().push(format!("{method}({params})"));
    }
}

#[async_trait]
impl TaskRepository for MockTaskRepository {
    async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>> {
        self.record_call_with_params("list", &format!("category={:?}", filter.category));

        // Check for error injection
        self.check_error_injection()?;

        let tasks = self.tasks.lock();
        Ok(tasks
            .values()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect())
    }

    async fn create(&self, task: NewTask) -> Result<Task> {
        self.record_call_with_params("create", &format!("title={}", task.title));

        // Check for error injection
        self.check_error_injection()?;

        let task = TaskValidator::normalize_new_task(task)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = Task::new(id, task.title, task.category);

        self.tasks.lock().insert(id, created.clone());

        Ok(created)
    }

    async fn toggle(&self, id: i64) -> Result<Task> {
        self.record_call_with_params("toggle", &format!("id={id}"));

        // Check for error injection
        self.check_error_injection()?;

        let mut tasks = self.tasks.lock();
        let task = tasks
            .get_mut(&id)
            .ok_or_else(|| TaskError::not_found_id(id))?;
        task.done = !task.done;

        Ok(task.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.record_call_with_params("delete", &format!("id={id}"));

        // Check for error injection
        self.check_error_injection()?;

        self.tasks
            .lock()
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| TaskError::not_found_id(id))
    }

    async fn health_check(&self) -> Result<()> {
        self.record_call("health_check");

        // Check for error injection
        self.check_error_injection()?;

        // Mock always reports healthy
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_one_shot_error_is_consumed() {
        let repo = MockTaskRepository::new();
        repo.inject_error(TaskError::Database("boom".to_string()));

        assert!(repo.health_check().await.is_err());
        assert!(repo.health_check().await.is_ok());
    }

    #[tokio::test]
    async fn test_sticky_error_until_cleared() {
        let repo = MockTaskRepository::new();
        repo.fail_always(TaskError::Connection("down".to_string()));

        assert!(repo.list(TaskFilter::all()).await.is_err());
        assert!(repo.list(TaskFilter::all()).await.is_err());

        repo.clear_error();
        assert!(repo.list(TaskFilter::all()).await.is_ok());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let repo = MockTaskRepository::new();
        let handle = repo.clone();

        repo.create(NewTask::new("Shared", None)).await.unwrap();
        assert_eq!(handle.tasks().len(), 1);
        handle.assert_called("create(title=Shared)");
    }
}
