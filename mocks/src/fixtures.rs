//! Standard test fixtures for consistent testing
//!
//! Provides pre-built test data including:
//! - Standard tasks with and without a category
//! - Edge case titles
//! - Bulk task generators

use task_core::{NewTask, Task};

/// Create a basic test task with sensible defaults
pub fn create_test_task() -> Task {
    Task::new(1, "Test Task".to_string(), None)
}

/// Create a test task in the given category
pub fn create_test_task_with_category(category: &str) -> Task {
    Task::new(1, "Categorized Task".to_string(), Some(category.to_string()))
}

/// Create a completed test task
pub fn create_done_task() -> Task {
    create_test_task().toggled()
}

/// Create multiple unique tasks with ascending ids
pub fn create_test_tasks(count: usize) -> Vec<Task> {
    (1..=count)
        .map(|i| {
            // Spread across two categories plus uncategorized
            let category = match i % 3 {
                0 => None,
                1 => Some("devops".to_string()),
                _ => Some("docs".to_string()),
            };
            let mut task = Task::new(i as i64, format!("Test Task {i}"), category);
            task.done = i % 2 == 0;
            task
        })
        .collect()
}

/// Create a standard NewTask for creation tests
pub fn create_new_task() -> NewTask {
    NewTask::new("New Test Task", None)
}

/// Create a NewTask carrying a category
pub fn create_new_task_with_category(category: &str) -> NewTask {
    NewTask::new("New Categorized Task", Some(category.to_string()))
}

/// Titles the service must reject
pub fn invalid_titles() -> Vec<&'static str> {
    vec!["", " ", "   ", "\t", "\n", " \t\r\n "]
}

/// Titles that are valid but awkward to store or render
pub fn edge_case_titles() -> Vec<String> {
    vec![
        "x".to_string(),
        "Ünïcödé tâsk ✅".to_string(),
        "<script>alert('x')</script>".to_string(),
        "Robert'); DROP TABLE tasks;--".to_string(),
        "a".repeat(1000),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_tasks_have_unique_ids() {
        let tasks = create_test_tasks(9);
        assert_eq!(tasks.len(), 9);
        assert!(tasks.windows(2).all(|pair| pair[0].id < pair[1].id));
        assert_eq!(tasks.iter().filter(|t| t.category.is_none()).count(), 3);
    }

    #[test]
    fn test_done_fixture() {
        assert!(create_done_task().done);
        assert!(!create_test_task().done);
    }
}
