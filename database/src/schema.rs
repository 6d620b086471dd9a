use sqlx::sqlite::SqliteConnection;
use task_core::error::Result;

use crate::common::sqlx_error_to_task_error;

const CREATE_TASKS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        done BOOLEAN NOT NULL DEFAULT 0
    )
"#;

/// Bring the `tasks` table up to date.
///
/// Safe to run on every startup: the table is created when absent and the
/// `category` column is added to tables created before it existed. Rows
/// already stored are left untouched.
pub async fn ensure_schema(conn: &mut SqliteConnection) -> Result<()> {
    sqlx::query(CREATE_TASKS_TABLE)
        .execute(&mut *conn)
        .await
        .map_err(sqlx_error_to_task_error)?;

    if !column_exists(conn, "tasks", "category").await? {
        sqlx::query("ALTER TABLE tasks ADD COLUMN category TEXT")
            .execute(&mut *conn)
            .await
            .map_err(sqlx_error_to_task_error)?;
        tracing::info!("Added category column to tasks table");
    }

    tracing::debug!("Task schema is up to date");
    Ok(())
}

async fn column_exists(conn: &mut SqliteConnection, table: &str, column: &str) -> Result<bool> {
    let columns: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info(?)")
        .bind(table)
        .fetch_all(&mut *conn)
        .await
        .map_err(sqlx_error_to_task_error)?;

    Ok(columns.iter().any(|name| name == column))
}
