//! Task Core Library
//!
//! This crate provides the domain model, error type, retry policy and the
//! repository trait for the task list service. All other crates depend on
//! the types and interfaces defined here.
//!
//! # Architecture
//!
//! - [`models`] - The `Task` entity, creation payload and list filter
//! - [`error`] - Error types and result handling
//! - [`repository`] - Repository trait every storage backend implements
//! - [`validation`] - Title validation and input normalization
//! - [`retry`] - Retry policy used when connecting to the database
//!
//! # Example
//!
//! ```rust
//! use task_core::{models::NewTask, validation::TaskValidator};
//!
//! let new_task = NewTask::new("  Dockerize the app ", Some("ops".to_string()));
//! let ready = TaskValidator::normalize_new_task(new_task).unwrap();
//! assert_eq!(ready.title, "Dockerize the app");
//! ```

pub mod error;
pub mod models;
pub mod repository;
pub mod retry;
pub mod validation;

// Re-export commonly used types at the crate root for convenience
pub use error::{Result, TaskError};
pub use models::{NewTask, Task, TaskFilter};
pub use repository::TaskRepository;
pub use retry::{retry, Backoff, RetryError, RetryPolicy};
pub use validation::TaskValidator;

/// Current version of the core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Current crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
