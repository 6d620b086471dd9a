//! HTTP layer for the task list service
//!
//! This crate maps HTTP requests onto an injected
//! [`TaskRepository`](task_core::TaskRepository) and shapes the JSON and HTML
//! responses. It provides:
//!
//! - The JSON task API under `/api/tasks`
//! - The `/health` endpoint reporting storage reachability
//! - The Handlebars-rendered index page and its script
//! - Request logging middleware
//!
//! # Usage
//!
//! ```no_run
//! use database::InMemoryTaskRepository;
//! use std::sync::Arc;
//! use web_api::TaskServer;
//!
//! async fn start_server() -> Result<(), Box<dyn std::error::Error>> {
//!     let repository = Arc::new(InMemoryTaskRepository::seeded());
//!     let server = TaskServer::new(repository)?;
//!     server.serve("127.0.0.1:5000".parse()?).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod handler;
pub mod page;
pub mod request_logger;
pub mod server;

// Re-export key types for easier usage
pub use dto::*;
pub use error::ApiError;
pub use handler::TaskHandler;
pub use page::IndexPage;
pub use server::{create_router, AppState, TaskServer};

// Re-export core types for external consumers
pub use task_core::{NewTask, Task, TaskFilter, TaskRepository};
