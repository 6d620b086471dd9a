//! Random test data generators using the fake crate
//!
//! Provides realistic random data including:
//! - Task titles and categories
//! - Property-based testing strategies

use fake::faker::lorem::en::{Sentence, Word};
use fake::Fake;
use proptest::prelude::*;
use rand::Rng;
use task_core::{NewTask, Task, TaskFilter};

/// Generate a realistic task title
pub fn generate_task_title() -> String {
    Sentence(2..6).fake()
}

/// Generate a realistic category name
pub fn generate_category() -> String {
    let categories = ["devops", "ci", "cloud", "docs", "frontend", "backend"];
    categories[rand::thread_rng().gen_range(0..categories.len())].to_string()
}

/// Generate a random creation payload, with a category half of the time
pub fn generate_new_task() -> NewTask {
    let category = rand::thread_rng().gen_bool(0.5).then(generate_category);
    NewTask::new(generate_task_title(), category)
}

/// Generate a random task with realistic data
pub fn generate_random_task() -> Task {
    let id: i64 = (1..99999).fake();
    let mut task = Task::new(id, generate_task_title(), Some(Word().fake()));
    task.done = rand::thread_rng().gen_bool(0.5);
    task
}

/// Proptest strategy for titles that survive validation
pub fn valid_title_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9 .,!?-]{0,60}"
}

/// Proptest strategy for whitespace-only titles
pub fn blank_title_strategy() -> impl Strategy<Value = String> {
    "[ \t\r\n]{0,12}"
}

/// Proptest strategy for optional categories
pub fn category_strategy() -> impl Strategy<Value = Option<String>> {
    proptest::option::of("[a-z]{2,12}")
}

/// Proptest strategy for generating creation payloads
pub fn new_task_strategy() -> impl Strategy<Value = NewTask> {
    (valid_title_strategy(), category_strategy())
        .prop_map(|(title, category)| NewTask::new(title, category))
}

/// Proptest strategy for generating complete tasks
pub fn task_strategy() -> impl Strategy<Value = Task> {
    (
        1i64..99999,
        valid_title_strategy(),
        any::<bool>(),
        category_strategy(),
    )
        .prop_map(|(id, title, done, category)| {
            let mut task = Task::new(id, title, category);
            task.done = done;
            task
        })
}

/// Proptest strategy for generating task filters
pub fn task_filter_strategy() -> impl Strategy<Value = TaskFilter> {
    category_strategy().prop_map(|category| TaskFilter { category })
}
