//! Process-local task storage.
//!
//! Selected with `storage.backend = "memory"`. Contents are lost on restart.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use task_core::{
    error::{Result, TaskError},
    models::{NewTask, Task, TaskFilter},
    repository::TaskRepository,
    validation::TaskValidator,
};

/// Titles loaded by [`InMemoryTaskRepository::seeded`]
pub const SAMPLE_TASKS: [&str; 3] = [
    "Dockerize a full-stack app",
    "Set up Jenkins pipeline",
    "Deploy app on AWS EC2",
];

/// In-memory implementation of the TaskRepository trait
///
/// Tasks live in a vector kept in ascending id order. Ids come from a
/// counter that only moves forward, so an id is never handed out twice.
#[derive(Debug)]
pub struct InMemoryTaskRepository {
    tasks: Mutex<Vec<Task>>,
    next_id: AtomicI64,
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Start from existing tasks; new ids continue after the largest one
    pub fn with_tasks(mut tasks: Vec<Task>) -> Self {
        tasks.sort_by_key(|task| task.id);
        let next_id = tasks.last().map_or(1, |task| task.id + 1);
        Self {
            tasks: Mutex::new(tasks),
            next_id: AtomicI64::new(next_id),
        }
    }

    /// Repository preloaded with [`SAMPLE_TASKS`], none of them done
    pub fn seeded() -> Self {
        let tasks = SAMPLE_TASKS
            .iter()
            .zip(1..)
            .map(|(title, id)| Task::new(id, title.to_string(), None))
            .collect();
        Self::with_tasks(tasks)
    }

    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>> {
        let tasks = self.tasks.lock();
        Ok(tasks
            .iter()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect())
    }

    async fn create(&self, task: NewTask) -> Result<Task> {
        let task = TaskValidator::normalize_new_task(task)?;

        let mut tasks = self.tasks.lock();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = Task::new(id, task.title, task.category);
        tasks.push(created.clone());
        Ok(created)
    }

    async fn toggle(&self, id: i64) -> Result<Task> {
        let mut tasks = self.tasks.lock();
        let task = tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| TaskError::not_found_id(id))?;
        task.done = !task.done;
        Ok(task.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut tasks = self.tasks.lock();
        let position = tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| TaskError::not_found_id(id))?;
        tasks.remove(position);
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
