//! Custom assertion helpers for testing
//!
//! Provides specialized assertions for:
//! - Task equality with clear error messages
//! - Collection-based assertions

use task_core::Task;

/// Assert tasks are equal field by field
pub fn assert_task_equals(actual: &Task, expected: &Task) {
    assert_eq!(actual.id, expected.id, "Task IDs don't match");
    assert_eq!(actual.title, expected.title, "Task titles don't match");
    assert_eq!(actual.done, expected.done, "Task done flags don't match");
    assert_eq!(actual.category, expected.category, "Task categories don't match");
}

/// Assert task matches partial criteria
pub fn assert_task_matches(task: &Task, matcher: &TaskMatcher) {
    if let Some(expected_id) = matcher.id {
        assert_eq!(task.id, expected_id, "Task ID doesn't match expected");
    }
    if let Some(ref expected_title) = matcher.title {
        assert_eq!(task.title, *expected_title, "Task title doesn't match expected");
    }
    if let Some(expected_done) = matcher.done {
        assert_eq!(task.done, expected_done, "Task done flag doesn't match expected");
    }
    if let Some(ref expected_category) = matcher.category {
        assert_eq!(
            task.category, *expected_category,
            "Task category doesn't match expected"
        );
    }
}

/// Assert task list contains a task with the given title
pub fn assert_contains_task_with_title(tasks: &[Task], title: &str) {
    assert!(
        tasks.iter().any(|t| t.title == title),
        "Expected to find task with title '{}' in task list, but it wasn't found. Available titles: {:?}",
        title,
        tasks.iter().map(|t| &t.title).collect::<Vec<_>>()
    );
}

/// Assert tasks are in strictly ascending id order
pub fn assert_tasks_sorted_by_id(tasks: &[Task]) {
    for window in tasks.windows(2) {
        assert!(
            window[0].id < window[1].id,
            "Tasks are not sorted by ascending id. Task {} ('{}') comes before {} ('{}')",
            window[0].id,
            window[0].title,
            window[1].id,
            window[1].title
        );
    }
}

/// Flexible task matcher for partial assertions
#[derive(Debug, Default)]
pub struct TaskMatcher {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub done: Option<bool>,
    pub category: Option<Option<String>>,
}

impl TaskMatcher {
    /// Create a new empty matcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Match tasks with specific ID
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Match tasks with specific title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Match tasks with specific done flag
    pub fn with_done(mut self, done: bool) -> Self {
        self.done = Some(done);
        self
    }

    /// Match tasks with specific category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(Some(category.into()));
        self
    }

    /// Match tasks without a category
    pub fn without_category(mut self) -> Self {
        self.category = Some(None);
        self
    }
}
