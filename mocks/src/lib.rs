//! Mock implementations and test utilities for the task list service
//!
//! This crate provides testing infrastructure including:
//! - A mock TaskRepository with error injection and call tracking
//! - Realistic test data generators
//! - Custom assertion helpers
//! - Property-based testing strategies
//! - Contract test helpers shared by every storage backend

pub mod assertions;
pub mod builders;
pub mod contracts;
pub mod fixtures;
pub mod generators;
pub mod repository;

pub use assertions::*;
pub use builders::*;
pub use contracts::*;
pub use fixtures::*;
pub use generators::*;
pub use repository::MockTaskRepository;
