use database::{ConnectionProvider, InMemoryTaskRepository, SqliteTaskRepository};
use mocks::contracts::test_repository_contract;
use std::time::Duration;
use task_core::RetryPolicy;
use tempfile::TempDir;

// Test the SQLite implementation against the contract
#[tokio::test]
async fn test_sqlite_repository_contract() {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}", dir.path().join("contract.db").display());
    let repo = SqliteTaskRepository::new(ConnectionProvider::new(
        Some(url),
        RetryPolicy::fixed(3, Duration::ZERO),
    ));
    repo.ensure_schema().await.unwrap();

    test_repository_contract(&repo).await;
}

// Test the in-memory implementation against the contract
#[tokio::test]
async fn test_memory_repository_contract() {
    test_repository_contract(&InMemoryTaskRepository::new()).await;
}
