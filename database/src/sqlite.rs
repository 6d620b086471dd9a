use async_trait::async_trait;
use futures::future::BoxFuture;
use sqlx::sqlite::SqliteConnection;
use task_core::{
    error::{Result, TaskError},
    models::{NewTask, Task, TaskFilter},
    repository::TaskRepository,
    validation::TaskValidator,
};

use crate::common::{build_list_query, row_to_task, sqlx_error_to_task_error};
use crate::connection::{release, ConnectionProvider};
use crate::schema;

/// SQLite implementation of the TaskRepository trait
///
/// Holds no open connection between calls. Each operation acquires a fresh
/// connection from its [`ConnectionProvider`], runs a single statement and
/// closes the connection before returning, on success and on failure.
#[derive(Debug, Clone)]
pub struct SqliteTaskRepository {
    provider: ConnectionProvider,
}

impl SqliteTaskRepository {
    /// Create a repository that opens connections through `provider`
    ///
    /// # Examples
    /// ```rust,no_run
    /// use database::{ConnectionProvider, SqliteTaskRepository};
    /// use task_core::RetryPolicy;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let provider = ConnectionProvider::new(
    ///     Some("sqlite:///tmp/tasks.db".to_string()),
    ///     RetryPolicy::default(),
    /// );
    /// let repo = SqliteTaskRepository::new(provider);
    /// repo.ensure_schema().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(provider: ConnectionProvider) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &ConnectionProvider {
        &self.provider
    }

    /// Create the tasks table or add missing columns to it
    ///
    /// # Returns
    /// * `Ok(())` - Schema is up to date
    /// * `Err(TaskError::Configuration)` - If no database URL is configured
    /// * `Err(TaskError::Connection)` - If the database stayed unreachable
    /// * `Err(TaskError::Database)` - If a DDL statement fails
    pub async fn ensure_schema(&self) -> Result<()> {
        self.with_connection(|conn| Box::pin(schema::ensure_schema(conn)))
            .await
    }

    /// Run `operation` on a fresh connection and close it afterwards
    async fn with_connection<T, F>(&self, operation: F) -> Result<T>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, Result<T>> + Send,
    {
        let mut conn = self.provider.acquire().await?;
        let result = operation(&mut conn).await;
        release(conn).await;
        result
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn list(&self, filter: TaskFilter) -> Result<Vec<Task>> {
        self.with_connection(move |conn| {
            Box::pin(async move {
                let rows = build_list_query(&filter)
                    .build()
                    .fetch_all(&mut *conn)
                    .await
                    .map_err(sqlx_error_to_task_error)?;

                rows.iter().map(row_to_task).collect()
            })
        })
        .await
    }

    async fn create(&self, task: NewTask) -> Result<Task> {
        let task = TaskValidator::normalize_new_task(task)?;

        let created = self
            .with_connection(move |conn| {
                Box::pin(async move {
                    let row = sqlx::query(
                        r#"
                        INSERT INTO tasks (title, done, category)
                        VALUES (?, ?, ?)
                        RETURNING id, title, done, category
                        "#,
                    )
                    .bind(&task.title)
                    .bind(false)
                    .bind(&task.category)
                    .fetch_one(&mut *conn)
                    .await
                    .map_err(sqlx_error_to_task_error)?;

                    row_to_task(&row)
                })
            })
            .await?;

        tracing::debug!(id = created.id, "Task created");
        Ok(created)
    }

    async fn toggle(&self, id: i64) -> Result<Task> {
        self.with_connection(move |conn| {
            Box::pin(async move {
                let row = sqlx::query(
                    r#"
                    UPDATE tasks SET done = NOT done
                    WHERE id = ?
                    RETURNING id, title, done, category
                    "#,
                )
                .bind(id)
                .fetch_optional(&mut *conn)
                .await
                .map_err(sqlx_error_to_task_error)?;

                match row {
                    Some(row) => row_to_task(&row),
                    None => Err(TaskError::not_found_id(id)),
                }
            })
        })
        .await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.with_connection(move |conn| {
            Box::pin(async move {
                let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
                    .bind(id)
                    .execute(&mut *conn)
                    .await
                    .map_err(sqlx_error_to_task_error)?;

                if result.rows_affected() == 0 {
                    return Err(TaskError::not_found_id(id));
                }
                tracing::debug!(id, "Task deleted");
                Ok(())
            })
        })
        .await
    }

    async fn health_check(&self) -> Result<()> {
        // Simple query to verify database connectivity
        self.with_connection(|conn| {
            Box::pin(async move {
                sqlx::query("SELECT 1")
                    .fetch_one(&mut *conn)
                    .await
                    .map_err(sqlx_error_to_task_error)?;
                Ok(())
            })
        })
        .await
    }
}
