//! Storage backends for the task list service
//!
//! This crate provides the SQLite and in-memory implementations of the
//! TaskRepository trait.
//!
//! # Features
//!
//! - One short-lived SQLite connection per operation, no pool
//! - Bounded, logged retry when the database cannot be reached
//! - Idempotent schema setup that upgrades older `tasks` tables in place
//! - Process-local backend for development and tests
//!
//! # Usage
//!
//! ```rust,no_run
//! use database::{ConnectionProvider, SqliteTaskRepository};
//! use task_core::{repository::TaskRepository, RetryPolicy};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = ConnectionProvider::from_env(RetryPolicy::default());
//!     let repo = SqliteTaskRepository::new(provider);
//!
//!     repo.ensure_schema().await?;
//!     repo.health_check().await?;
//!     println!("Database is healthy!");
//!
//!     Ok(())
//! }
//! ```

mod common;
mod connection;
mod memory;
mod schema;
mod sqlite;

pub use connection::{release, ConnectionProvider, DATABASE_URL_ENV};
pub use memory::{InMemoryTaskRepository, SAMPLE_TASKS};
pub use schema::ensure_schema;
pub use sqlite::SqliteTaskRepository;

// Re-export commonly used types from task-core for convenience
pub use task_core::{
    error::{Result, TaskError},
    models::{NewTask, Task, TaskFilter},
    repository::TaskRepository,
};
