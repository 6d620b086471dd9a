//! Builder pattern implementations for easy test data construction
//!
//! Provides fluent builders for:
//! - Task construction with sensible defaults
//! - NewTask payloads
//! - Filter construction for query testing

use task_core::{NewTask, Task, TaskFilter};

/// Builder for constructing Task instances in tests
pub struct TaskBuilder {
    task: Task,
}

impl Default for TaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskBuilder {
    /// Create new builder with default values
    pub fn new() -> Self {
        Self {
            task: Task::new(1, "Test Task".to_string(), None),
        }
    }

    /// Set task ID
    pub fn with_id(mut self, id: i64) -> Self {
        self.task.id = id;
        self
    }

    /// Set task title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.task.title = title.into();
        self
    }

    /// Set completion flag
    pub fn with_done(mut self, done: bool) -> Self {
        self.task.done = done;
        self
    }

    /// Set task category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.task.category = Some(category.into());
        self
    }

    /// Build the final Task
    pub fn build(self) -> Task {
        self.task
    }
}

/// Builder for constructing NewTask instances in tests
pub struct NewTaskBuilder {
    new_task: NewTask,
}

impl Default for NewTaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NewTaskBuilder {
    /// Create new builder with default values
    pub fn new() -> Self {
        Self {
            new_task: NewTask::new("New Test Task", None),
        }
    }

    /// Set task title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.new_task.title = title.into();
        self
    }

    /// Set task category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.new_task.category = Some(category.into());
        self
    }

    /// Build the final NewTask
    pub fn build(self) -> NewTask {
        self.new_task
    }
}

/// Builder for constructing TaskFilter instances in tests
#[derive(Default)]
pub struct TaskFilterBuilder {
    filter: TaskFilter,
}

impl TaskFilterBuilder {
    /// Create new builder matching every task
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by exact category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.filter.category = Some(category.into());
        self
    }

    /// Build the final TaskFilter
    pub fn build(self) -> TaskFilter {
        self.filter
    }
}
