use serde::{Deserialize, Serialize};

/// A single to-do record.
///
/// Tasks form a flat list: no task references another. The `id` is assigned
/// by the storage layer and never reused, `title` and `category` are fixed at
/// creation, and `done` only changes through a toggle.
///
/// # Examples
///
/// ```rust
/// use task_core::models::Task;
///
/// let task = Task::new(7, "Write tests".to_string(), None);
/// assert!(!task.done);
///
/// let toggled = task.toggled();
/// assert!(toggled.done);
/// assert_eq!(toggled.toggled(), task);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Storage-assigned identifier
    pub id: i64,
    /// Trimmed, non-empty title
    pub title: String,
    /// Completion flag
    pub done: bool,
    /// Optional free-form grouping, serialized as `null` when absent
    pub category: Option<String>,
}

impl Task {
    /// Create a task that has not been completed yet
    pub fn new(id: i64, title: String, category: Option<String>) -> Self {
        Self {
            id,
            title,
            done: false,
            category,
        }
    }

    /// Copy of this task with `done` flipped
    pub fn toggled(&self) -> Self {
        Self {
            done: !self.done,
            ..self.clone()
        }
    }
}

/// Data transfer object for creating new tasks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NewTask {
    /// Requested title, trimmed before it is stored
    pub title: String,
    /// Optional category; blank values are stored as absent
    #[serde(default)]
    pub category: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, category: Option<String>) -> Self {
        Self {
            title: title.into(),
            category,
        }
    }
}

/// Filter criteria for listing tasks
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TaskFilter {
    /// Exact, case-sensitive category match
    pub category: Option<String>,
}

impl TaskFilter {
    /// Filter that keeps every task
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter on an exact category value
    pub fn by_category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
        }
    }

    /// Check whether a task passes this filter.
    ///
    /// A task without a category never matches a category filter.
    pub fn matches(&self, task: &Task) -> bool {
        match &self.category {
            Some(wanted) => task.category.as_deref() == Some(wanted.as_str()),
            None => true,
        }
    }
}
