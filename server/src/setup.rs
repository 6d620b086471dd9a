use anyhow::{Context, Result};
use database::{ConnectionProvider, InMemoryTaskRepository, SqliteTaskRepository};
use std::path::Path;
use std::sync::Arc;
use task_core::TaskRepository;
use tracing::info;
use web_api::TaskServer;

use crate::config::{Config, StorageBackend};

/// Create the task repository selected by `storage.backend`
///
/// For SQLite this creates the database directory, then runs the schema
/// initializer under the startup retry policy. The returned repository
/// opens one connection per request under the request retry policy.
pub async fn create_repository(config: &Config) -> Result<Arc<dyn TaskRepository>> {
    info!(backend = %config.storage.backend, "Creating task repository");

    match config.storage.backend {
        StorageBackend::Memory => {
            let repo = if config.storage.seed_sample_tasks {
                InMemoryTaskRepository::seeded()
            } else {
                InMemoryTaskRepository::new()
            };
            info!(tasks = repo.len(), "In-memory repository ready");
            Ok(Arc::new(repo))
        }
        StorageBackend::Sqlite => {
            let database_url = config.database_url();

            if let Some(url) = database_url.as_deref() {
                ensure_database_directory(url)
                    .context("Failed to create database directory")?;
            }

            let startup = SqliteTaskRepository::new(ConnectionProvider::new(
                database_url,
                config.startup_retry_policy(),
            ));

            info!("Ensuring database schema");
            startup
                .ensure_schema()
                .await
                .context("Failed to initialize database schema")?;

            let provider = startup
                .provider()
                .with_policy(config.request_retry_policy());

            info!("SQLite repository created successfully");
            Ok(Arc::new(SqliteTaskRepository::new(provider)))
        }
    }
}

/// Create the HTTP server around a repository
pub fn create_server(repository: Arc<dyn TaskRepository>) -> Result<TaskServer> {
    info!("Creating task list server");

    let server = TaskServer::new(repository).context("Failed to compile index template")?;

    info!("Task list server created successfully");
    Ok(server)
}

/// Initialize the complete application
pub async fn initialize_app(config: &Config) -> Result<TaskServer> {
    info!("Initializing application");

    let repository = create_repository(config)
        .await
        .context("Failed to create repository")?;

    let server = create_server(repository).context("Failed to create server")?;

    info!("Application initialized successfully");
    Ok(server)
}

/// Ensure the database directory exists and set secure permissions
///
/// Accepts `sqlite://path`, `sqlite:path` and bare paths. Query parameters
/// are ignored.
pub fn ensure_database_directory(database_url: &str) -> Result<()> {
    let db_path = database_file_path(database_url);
    if db_path.is_empty() {
        return Ok(());
    }
    let db_path = Path::new(db_path);

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            info!("Creating database directory: {}", parent.display());
            std::fs::create_dir_all(parent).context("Failed to create database directory")?;

            // Owner only
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                let permissions = std::fs::Permissions::from_mode(0o700);
                std::fs::set_permissions(parent, permissions)
                    .context("Failed to set directory permissions")?;
            }
        }
    }

    if db_path.exists() {
        set_secure_file_permissions(db_path)?;
    }

    Ok(())
}

fn database_file_path(database_url: &str) -> &str {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    path.split('?').next().unwrap_or_default()
}

/// Set secure file permissions (owner-only access on Unix)
fn set_secure_file_permissions(file_path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(file_path, permissions)
            .with_context(|| format!("Failed to set permissions for {}", file_path.display()))?;
        info!("Set secure permissions (0600) for database file: {}", file_path.display());
    }

    #[cfg(windows)]
    {
        info!("Database file permissions managed by system on Windows: {}", file_path.display());
    }

    Ok(())
}
