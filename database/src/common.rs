use sqlx::{error::DatabaseError, sqlite::SqliteRow, QueryBuilder, Row, Sqlite};
use task_core::{
    error::{Result, TaskError},
    models::{Task, TaskFilter},
};

/// Columns every task query selects or returns, in a stable order
pub const TASK_COLUMNS: &str = "id, title, done, category";

// Primary SQLite result codes worth retrying
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;
const SQLITE_CANTOPEN: i32 = 14;

/// Convert SQLite row to Task model, reading columns by name
pub fn row_to_task(row: &SqliteRow) -> Result<Task> {
    Ok(Task {
        id: row.try_get("id").map_err(sqlx_error_to_task_error)?,
        title: row.try_get("title").map_err(sqlx_error_to_task_error)?,
        done: row.try_get("done").map_err(sqlx_error_to_task_error)?,
        category: row.try_get("category").map_err(sqlx_error_to_task_error)?,
    })
}

/// Convert SQLx error to TaskError
pub fn sqlx_error_to_task_error(err: sqlx::Error) -> TaskError {
    match &err {
        sqlx::Error::Configuration(cause) => {
            TaskError::Configuration(format!("Invalid database configuration: {cause}"))
        }
        sqlx::Error::Database(db_err) => {
            TaskError::Database(format!("Database error: {}", db_err.message()))
        }
        sqlx::Error::RowNotFound => {
            // Callers use fetch_optional where absence is expected
            TaskError::Database("Unexpected RowNotFound error".to_string())
        }
        sqlx::Error::ColumnNotFound(column) => {
            TaskError::Database(format!("Column not found in result: {column}"))
        }
        sqlx::Error::ColumnDecode { index, source } => {
            TaskError::Database(format!("Failed to decode column {index}: {source}"))
        }
        sqlx::Error::PoolTimedOut => TaskError::Connection("Connection timeout".to_string()),
        sqlx::Error::Io(io_err) => TaskError::Connection(format!("Database I/O error: {io_err}")),
        _ => TaskError::Database(format!("Database operation failed: {err}")),
    }
}

/// Check whether a connection failure is worth retrying
pub fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db_err) => matches!(
            primary_result_code(&**db_err),
            Some(SQLITE_BUSY | SQLITE_LOCKED | SQLITE_CANTOPEN)
        ),
        _ => false,
    }
}

/// SQLite reports extended result codes; the low byte is the primary code
fn primary_result_code(db_err: &dyn DatabaseError) -> Option<i32> {
    db_err
        .code()
        .and_then(|code| code.parse::<i32>().ok())
        .map(|code| code & 0xff)
}

/// Build the list query with the category filter bound as a parameter
pub fn build_list_query(filter: &TaskFilter) -> QueryBuilder<'static, Sqlite> {
    let mut query_builder: QueryBuilder<'static, Sqlite> =
        QueryBuilder::new(format!("SELECT {TASK_COLUMNS} FROM tasks"));

    if let Some(category) = &filter.category {
        query_builder.push(" WHERE category = ");
        query_builder.push_bind(category.clone());
    }

    query_builder.push(" ORDER BY id ASC");

    query_builder
}
