use thiserror::Error;

/// Result type alias for task operations
pub type Result<T> = std::result::Result<T, TaskError>;

/// Error types for the task list service.
///
/// These errors cover every failure mode of the repository and connection
/// layers. Each variant maps to an HTTP status code so the web layer can
/// turn them into responses without inspecting messages.
///
/// # Examples
///
/// ```rust
/// use task_core::error::TaskError;
///
/// let not_found = TaskError::not_found_id(42);
/// assert!(not_found.is_not_found());
/// assert_eq!(not_found.status_code(), 404);
///
/// let blank = TaskError::empty_field("title");
/// assert!(blank.is_validation());
/// assert_eq!(blank.status_code(), 400);
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Task not found by the given identifier
    #[error("Task not found: {0}")]
    NotFound(String),

    /// Validation error with details
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or malformed required setting
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Database still unreachable after every connection attempt
    #[error("Connection error: {0}")]
    Connection(String),

    /// Database operation error
    #[error("Database error: {0}")]
    Database(String),

    /// Internal system error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TaskError {
    /// Create a not found error for a task ID
    pub fn not_found_id(id: i64) -> Self {
        Self::NotFound(format!("Task with ID {id} not found"))
    }

    /// Create a validation error for empty field
    pub fn empty_field(field: &str) -> Self {
        Self::Validation(format!("Field '{field}' cannot be empty"))
    }

    /// Create a configuration error for a required setting that is unset
    pub fn missing_setting(name: &str) -> Self {
        Self::Configuration(format!("{name} is not set"))
    }

    /// Check if this error indicates a not found condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, TaskError::NotFound(_))
    }

    /// Check if this error indicates a validation problem
    pub fn is_validation(&self) -> bool {
        matches!(self, TaskError::Validation(_))
    }

    /// Check if this error indicates a database problem
    pub fn is_database(&self) -> bool {
        matches!(self, TaskError::Database(_) | TaskError::Connection(_))
    }

    /// Check if this error indicates a configuration problem
    pub fn is_configuration(&self) -> bool {
        matches!(self, TaskError::Configuration(_))
    }

    /// Convert to appropriate HTTP status code equivalent
    pub fn status_code(&self) -> u16 {
        match self {
            TaskError::NotFound(_) => 404,
            TaskError::Validation(_) => 400,
            TaskError::Configuration(_) => 500,
            TaskError::Connection(_) => 500,
            TaskError::Database(_) => 500,
            TaskError::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = TaskError::not_found_id(42);
        assert_eq!(error, TaskError::NotFound("Task with ID 42 not found".to_string()));
        assert!(error.is_not_found());
        assert_eq!(error.status_code(), 404);

        let error = TaskError::empty_field("title");
        assert_eq!(error, TaskError::Validation("Field 'title' cannot be empty".to_string()));
        assert_eq!(error.status_code(), 400);

        let error = TaskError::missing_setting("DATABASE_URL");
        assert!(error.is_configuration());
        assert_eq!(error.status_code(), 500);
    }

    #[test]
    fn test_error_display() {
        let error = TaskError::NotFound("Task not found".to_string());
        assert_eq!(format!("{}", error), "Task not found: Task not found");

        let error = TaskError::Connection("connection refused".to_string());
        assert_eq!(format!("{}", error), "Connection error: connection refused");

        let error = TaskError::Validation("Invalid input".to_string());
        assert_eq!(format!("{}", error), "Validation error: Invalid input");
    }

    #[test]
    fn test_error_predicates() {
        assert!(TaskError::NotFound("test".to_string()).is_not_found());
        assert!(!TaskError::Validation("test".to_string()).is_not_found());

        assert!(TaskError::Validation("test".to_string()).is_validation());
        assert!(!TaskError::Database("test".to_string()).is_validation());

        assert!(TaskError::Database("test".to_string()).is_database());
        assert!(TaskError::Connection("test".to_string()).is_database());
        assert!(!TaskError::Internal("test".to_string()).is_database());
    }
}
