//! Task List Server Library
//!
//! Configuration loading, logging setup and application wiring for the
//! `tasklist-server` binary. Exposed as a library so the startup path can be
//! driven from tests.

pub mod config;
pub mod setup;
pub mod telemetry;

pub use config::{Config, StorageBackend};
pub use setup::{create_repository, create_server, ensure_database_directory, initialize_app};
pub use telemetry::init_telemetry;
