mod support;

use support::{day, seeded};
use taskflow::model::{Category, Status, Task};
use taskflow::repo::TaskRepository;
use taskflow::store::{self, Store, TASKS_KEY};
use taskflow::view::{self, FilterSpec};

/// The seeded demo tasks, loaded through the repository like the
/// presentation layer would.
fn demo_tasks() -> Vec<Task> {
    let (store, _) = seeded();
    TaskRepository::load_for_user(store, "user1")
        .tasks()
        .to_vec()
}

#[test]
fn empty_filter_spec_returns_everything() {
    let tasks = demo_tasks();
    assert_eq!(view::filter(&tasks, &FilterSpec::default()), tasks);
}

#[test]
fn category_and_search_filters_combine() {
    let tasks = demo_tasks();

    let spec = FilterSpec {
        search_term: "grocery".to_string(),
        category: Some(Category::Personal),
        priority: None,
    };
    let filtered = view::filter(&tasks, &spec);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, "task3");

    // Same search, wrong category: nothing matches.
    let spec = FilterSpec {
        search_term: "grocery".to_string(),
        category: Some(Category::Work),
        priority: None,
    };
    assert!(view::filter(&tasks, &spec).is_empty());
}

#[test]
fn board_groups_account_for_every_task() {
    let tasks = demo_tasks();
    let board = view::group_by_status(&tasks);

    assert_eq!(board.todo.len(), 1);
    assert_eq!(board.in_progress.len(), 1);
    assert_eq!(board.completed.len(), 1);
    assert!(board.unrecognized.is_empty());
    assert_eq!(board.total(), tasks.len());
}

#[test]
fn bad_persisted_status_lands_in_the_unrecognized_bucket() {
    let (store, _) = seeded();

    // Corrupt one status the way hand-edited data would.
    let raw = store.get(TASKS_KEY).unwrap();
    let patched = raw.replace("\"In Progress\"", "\"In Progess\"");
    store.set(TASKS_KEY, &patched).unwrap();

    let tasks: Vec<Task> = store::read_json_list(store.as_ref(), TASKS_KEY);
    let board = view::group_by_status(&tasks);

    assert_eq!(board.in_progress.len(), 0);
    assert_eq!(board.unrecognized.len(), 1);
    assert_eq!(board.unrecognized[0].id, "task2");
    assert_eq!(board.total(), tasks.len());
}

#[test]
fn demo_statistics_on_christmas() {
    let tasks = demo_tasks();
    let stats = view::statistics(&tasks, day(2024, 12, 25));

    assert_eq!(stats.total, 3);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.pending, 2);
    // task3 is due 12-20 but completed; task1 due 12-25 is not yet overdue.
    assert_eq!(stats.overdue, 0);
    assert_eq!(stats.pending, stats.total - stats.completed);
}

#[test]
fn past_due_todo_counts_as_overdue_once_reopened() {
    let (store, _) = seeded();
    let mut repo = TaskRepository::load_for_user(store, "user1");

    // task3 (due 2024-12-20, Completed) becomes overdue when reopened.
    repo.set_status("task3", Status::Todo).unwrap();

    let stats = view::statistics(repo.tasks(), day(2024, 12, 25));
    assert_eq!(stats.overdue, 1);
    assert_eq!(stats.completed, 0);
}
