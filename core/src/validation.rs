use crate::{
    error::{Result, TaskError},
    models::NewTask,
};

/// Validation utilities for task operations
pub struct TaskValidator;

impl TaskValidator {
    /// Validate a task title
    ///
    /// Titles must contain at least one non-whitespace character.
    ///
    /// # Returns
    /// * `Ok(())` - If the title is usable
    /// * `Err(TaskError::Validation)` - If the title is empty or whitespace-only
    pub fn validate_title(title: &str) -> Result<()> {
        if title.trim().is_empty() {
            return Err(TaskError::empty_field("title"));
        }
        Ok(())
    }

    /// Validate a new task before it reaches storage
    pub fn validate_new_task(task: &NewTask) -> Result<()> {
        Self::validate_title(&task.title)
    }

    /// Validate and normalize a new task.
    ///
    /// The title is trimmed, and a category that is empty after trimming is
    /// dropped so it is stored as absent. Every backend calls this before
    /// inserting, which keeps the stored data identical across backends.
    ///
    /// ```rust
    /// use task_core::{models::NewTask, validation::TaskValidator};
    ///
    /// let task = TaskValidator::normalize_new_task(NewTask::new("  Ship it  ", Some(" ".into()))).unwrap();
    /// assert_eq!(task.title, "Ship it");
    /// assert_eq!(task.category, None);
    /// ```
    pub fn normalize_new_task(task: NewTask) -> Result<NewTask> {
        Self::validate_new_task(&task)?;

        let category = task
            .category
            .filter(|category| !category.trim().is_empty());

        Ok(NewTask {
            title: task.title.trim().to_string(),
            category,
        })
    }
}
