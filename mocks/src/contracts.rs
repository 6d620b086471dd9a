//! Contract test helpers for validating trait implementations
//!
//! Provides standardized tests that any TaskRepository implementation
//! should pass, ensuring consistent behavior across backends.

use crate::{assert_tasks_sorted_by_id, create_new_task, invalid_titles, NewTaskBuilder};
use task_core::{TaskError, TaskFilter, TaskRepository};

/// Test any TaskRepository implementation with comprehensive contract tests
///
/// Expects an empty repository. Every helper cleans up the tasks it creates,
/// so the helpers can also be run one by one.
pub async fn test_repository_contract<R: TaskRepository + ?Sized>(repo: &R) {
    test_create_contract(repo).await;
    test_list_contract(repo).await;
    test_toggle_contract(repo).await;
    test_delete_contract(repo).await;
    test_validation_contract(repo).await;
    test_not_found_contract(repo).await;
    test_health_check_contract(repo).await;
}

/// Test task creation contract
pub async fn test_create_contract<R: TaskRepository + ?Sized>(repo: &R) {
    let new_task = create_new_task();
    let task = repo
        .create(new_task.clone())
        .await
        .expect("Create should succeed");

    assert!(task.id > 0, "Created task should have positive ID");
    assert_eq!(task.title, new_task.title, "Created task should preserve title");
    assert!(!task.done, "New task should not be done");
    assert!(task.category.is_none(), "Category should stay absent");

    let padded = repo
        .create(
            NewTaskBuilder::new()
                .with_title("  Padded title  ")
                .with_category("ops")
                .build(),
        )
        .await
        .expect("Create with category should succeed");
    assert_eq!(padded.title, "Padded title", "Title should be trimmed");
    assert_eq!(padded.category.as_deref(), Some("ops"));
    assert!(padded.id > task.id, "Ids should increase");

    let blank_category = repo
        .create(NewTaskBuilder::new().with_category("   ").build())
        .await
        .expect("Create with blank category should succeed");
    assert!(
        blank_category.category.is_none(),
        "Blank category should be stored as absent"
    );

    for id in [task.id, padded.id, blank_category.id] {
        repo.delete(id).await.expect("Cleanup delete should succeed");
    }
}

/// Test listing contract: ascending id order and exact category filter
pub async fn test_list_contract<R: TaskRepository + ?Sized>(repo: &R) {
    let a = repo
        .create(NewTaskBuilder::new().with_title("A").with_category("x").build())
        .await
        .unwrap();
    let b = repo
        .create(NewTaskBuilder::new().with_title("B").build())
        .await
        .unwrap();
    let c = repo
        .create(NewTaskBuilder::new().with_title("C").with_category("x").build())
        .await
        .unwrap();

    let all = repo.list(TaskFilter::all()).await.unwrap();
    assert_eq!(all.len(), 3, "Unfiltered list should return every task");
    assert_tasks_sorted_by_id(&all);

    let only_x = repo.list(TaskFilter::by_category("x")).await.unwrap();
    assert_eq!(only_x, vec![a.clone(), c.clone()], "Filter should keep only category x");

    let case_sensitive = repo.list(TaskFilter::by_category("X")).await.unwrap();
    assert!(case_sensitive.is_empty(), "Category match should be exact");

    let unknown = repo.list(TaskFilter::by_category("nope")).await.unwrap();
    assert!(unknown.is_empty(), "Unknown category should give an empty list");

    for task in [a, b, c] {
        repo.delete(task.id).await.unwrap();
    }
}

/// Test toggle contract: flips `done` and leaves other fields alone
pub async fn test_toggle_contract<R: TaskRepository + ?Sized>(repo: &R) {
    let task = repo
        .create(NewTaskBuilder::new().with_category("ci").build())
        .await
        .unwrap();

    let toggled = repo.toggle(task.id).await.unwrap();
    assert!(toggled.done, "First toggle should mark the task done");
    assert_eq!(toggled.id, task.id);
    assert_eq!(toggled.title, task.title);
    assert_eq!(toggled.category, task.category);

    let back = repo.toggle(task.id).await.unwrap();
    assert_eq!(back, task, "Two toggles should restore the original task");

    repo.delete(task.id).await.unwrap();
}

/// Test delete contract
pub async fn test_delete_contract<R: TaskRepository + ?Sized>(repo: &R) {
    let keep = repo.create(create_new_task()).await.unwrap();
    let gone = repo.create(create_new_task()).await.unwrap();

    repo.delete(gone.id).await.expect("Delete should succeed");

    let remaining = repo.list(TaskFilter::all()).await.unwrap();
    assert_eq!(remaining, vec![keep.clone()], "Only the deleted task should disappear");

    match repo.delete(gone.id).await {
        Err(TaskError::NotFound(_)) => {}
        other => panic!("Deleting twice should be NotFound, got: {other:?}"),
    }

    let next = repo.create(create_new_task()).await.unwrap();
    assert!(next.id > gone.id, "Deleted ids should not be reused");

    for id in [keep.id, next.id] {
        repo.delete(id).await.unwrap();
    }
}

/// Test that invalid titles are rejected without storing anything
pub async fn test_validation_contract<R: TaskRepository + ?Sized>(repo: &R) {
    for title in invalid_titles() {
        match repo.create(NewTaskBuilder::new().with_title(title).build()).await {
            Err(TaskError::Validation(_)) => {}
            other => panic!("Title {title:?} should be rejected, got: {other:?}"),
        }
    }

    let tasks = repo.list(TaskFilter::all()).await.unwrap();
    assert!(tasks.is_empty(), "Rejected tasks should not be stored");
}

/// Test not found contract for id-based operations
pub async fn test_not_found_contract<R: TaskRepository + ?Sized>(repo: &R) {
    match repo.toggle(99999).await {
        Err(TaskError::NotFound(_)) => {}
        other => panic!("Toggle of unknown id should be NotFound, got: {other:?}"),
    }
    match repo.delete(99999).await {
        Err(TaskError::NotFound(_)) => {}
        other => panic!("Delete of unknown id should be NotFound, got: {other:?}"),
    }
}

/// Test health check contract
pub async fn test_health_check_contract<R: TaskRepository + ?Sized>(repo: &R) {
    assert!(
        repo.health_check().await.is_ok(),
        "Health check should pass for healthy repository"
    );
}
