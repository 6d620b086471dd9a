//! Per-request SQLite connections with bounded retry.
//!
//! There is no pool: every repository call opens its own connection through
//! [`ConnectionProvider::acquire`] and hands it back to [`release`] when the
//! query is done, whatever the outcome.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteJournalMode};
use sqlx::{ConnectOptions, Connection};
use task_core::{
    error::{Result, TaskError},
    retry::{retry, RetryError, RetryPolicy},
};

use crate::common::{is_transient, sqlx_error_to_task_error};

/// Environment variable holding the database connection string
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Opens connections to the configured SQLite database.
///
/// The connection string is only checked when a connection is requested, so
/// a missing `DATABASE_URL` surfaces as [`TaskError::Configuration`] on the
/// first attempt rather than at construction.
///
/// # Examples
/// ```rust,no_run
/// use database::ConnectionProvider;
/// use task_core::RetryPolicy;
/// use std::time::Duration;
///
/// # async fn run() -> task_core::Result<()> {
/// let provider = ConnectionProvider::new(
///     Some("sqlite://data/tasks.db".to_string()),
///     RetryPolicy::fixed(10, Duration::from_secs(2)),
/// );
/// let conn = provider.acquire().await?;
/// database::release(conn).await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionProvider {
    database_url: Option<String>,
    policy: RetryPolicy,
}

impl ConnectionProvider {
    pub fn new(database_url: Option<String>, policy: RetryPolicy) -> Self {
        Self {
            database_url,
            policy,
        }
    }

    /// Read the connection string from `DATABASE_URL`
    pub fn from_env(policy: RetryPolicy) -> Self {
        Self::new(std::env::var(DATABASE_URL_ENV).ok(), policy)
    }

    /// Same target, different retry policy
    pub fn with_policy(&self, policy: RetryPolicy) -> Self {
        Self {
            database_url: self.database_url.clone(),
            policy,
        }
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    fn connect_options(&self) -> Result<SqliteConnectOptions> {
        let url = self
            .database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| TaskError::missing_setting(DATABASE_URL_ENV))?;

        // Accept bare file paths as well as sqlite: URLs
        let url = if url.starts_with("sqlite:") {
            url.to_string()
        } else {
            format!("sqlite://{url}")
        };

        let options = SqliteConnectOptions::from_str(&url).map_err(|e| {
            TaskError::Configuration(format!("Invalid database URL '{url}': {e}"))
        })?;

        Ok(options
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5)))
    }

    /// Open a connection, retrying transient failures per the policy.
    ///
    /// # Returns
    /// * `Ok(SqliteConnection)` - A fresh connection owned by the caller
    /// * `Err(TaskError::Configuration)` - If the connection string is unset or invalid
    /// * `Err(TaskError::Connection)` - If every attempt failed transiently
    /// * `Err(TaskError::Database)` - If the failure is not worth retrying
    pub async fn acquire(&self) -> Result<SqliteConnection> {
        let options = self.connect_options()?;

        retry(&self.policy, is_transient, |attempt| {
            let options = options.clone();
            async move {
                tracing::debug!(attempt, "Opening database connection");
                options.connect().await
            }
        })
        .await
        .map_err(|err| match err {
            RetryError::Exhausted {
                attempts,
                last_error,
            } => {
                tracing::error!(attempts, error = %last_error, "Database unreachable");
                TaskError::Connection(format!(
                    "Database unreachable after {attempts} attempt(s): {last_error}"
                ))
            }
            RetryError::Permanent(error) => sqlx_error_to_task_error(error),
        })
    }
}

/// Close a connection obtained from [`ConnectionProvider::acquire`].
///
/// A failed close is logged and otherwise ignored; the connection is dropped
/// either way.
pub async fn release(conn: SqliteConnection) {
    if let Err(error) = conn.close().await {
        tracing::warn!(error = %error, "Failed to close database connection cleanly");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn quick_policy(attempts: u32) -> RetryPolicy {
        RetryPolicy::fixed(attempts, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_missing_url_is_configuration_error() {
        let provider = ConnectionProvider::new(None, quick_policy(3));
        let err = provider.acquire().await.unwrap_err();
        assert_eq!(err, TaskError::missing_setting(DATABASE_URL_ENV));

        let blank = ConnectionProvider::new(Some("   ".to_string()), quick_policy(3));
        assert!(blank.acquire().await.unwrap_err().is_configuration());
    }

    #[tokio::test]
    async fn test_acquire_and_release() {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}", dir.path().join("tasks.db").display());
        let provider = ConnectionProvider::new(Some(url), quick_policy(1));

        let mut conn = provider.acquire().await.unwrap();
        let one: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&mut conn)
            .await
            .unwrap();
        assert_eq!(one, 1);
        release(conn).await;
    }

    #[tokio::test]
    async fn test_bare_path_is_accepted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bare.db");
        let provider = ConnectionProvider::new(Some(path.display().to_string()), quick_policy(1));

        let conn = provider.acquire().await.unwrap();
        release(conn).await;
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_unreachable_database_exhausts_retries() {
        let dir = TempDir::new().unwrap();
        let url = format!(
            "sqlite://{}",
            dir.path().join("missing").join("nested").join("tasks.db").display()
        );
        let provider = ConnectionProvider::new(Some(url), quick_policy(3));

        let err = provider.acquire().await.unwrap_err();
        match err {
            TaskError::Connection(message) => {
                assert!(message.contains("after 3 attempt(s)"), "{message}");
            }
            other => panic!("Expected Connection error, got: {other:?}"),
        }
    }

    #[test]
    fn test_with_policy_keeps_target() {
        let provider = ConnectionProvider::new(Some("sqlite://a.db".to_string()), quick_policy(5));
        let single = provider.with_policy(RetryPolicy::none());
        assert_eq!(single.database_url(), Some("sqlite://a.db"));
        assert_eq!(single.policy().max_attempts(), 1);
        assert_eq!(provider.policy().max_attempts(), 5);
    }
}
