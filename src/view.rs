//! View derivation: pure functions over a task collection.
//!
//! No I/O, all inputs explicit. Given the working set plus a filter
//! spec, these produce the board columns and the aggregate statistics
//! the presentation layer renders.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Category, Priority, Status, Task};

/// Ephemeral, presentation-owned filter state. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    /// Case-insensitive substring matched against title and description.
    pub search_term: String,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
}

impl FilterSpec {
    pub fn matches(&self, task: &Task) -> bool {
        let term = self.search_term.trim().to_lowercase();
        let matches_search = term.is_empty()
            || task.title.to_lowercase().contains(&term)
            || task.description.to_lowercase().contains(&term);

        let matches_category = self.category.map_or(true, |c| task.category == c);
        let matches_priority = self.priority.map_or(true, |p| task.priority == p);

        matches_search && matches_category && matches_priority
    }
}

/// Tasks partitioned by status.
///
/// Tasks whose persisted status did not parse land in `unrecognized`
/// rather than being dropped, so bad data stays observable.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusBoard {
    pub todo: Vec<Task>,
    pub in_progress: Vec<Task>,
    pub completed: Vec<Task>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unrecognized: Vec<Task>,
}

impl StatusBoard {
    pub fn total(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.completed.len() + self.unrecognized.len()
    }
}

/// Aggregate counts for the dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
}

/// Apply a filter spec. An empty spec matches every task.
pub fn filter(tasks: &[Task], spec: &FilterSpec) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| spec.matches(task))
        .cloned()
        .collect()
}

/// Partition tasks into board columns by exact status.
pub fn group_by_status(tasks: &[Task]) -> StatusBoard {
    let mut board = StatusBoard::default();
    for task in tasks {
        match task.status {
            Status::Todo => board.todo.push(task.clone()),
            Status::InProgress => board.in_progress.push(task.clone()),
            Status::Completed => board.completed.push(task.clone()),
            Status::Unrecognized => board.unrecognized.push(task.clone()),
        }
    }
    board
}

/// True iff the due date is strictly before `today`, at day granularity.
/// Status is not consulted here; callers that want the display rule
/// ("completed is never overdue") use [`display_overdue`].
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    task.due_date < today
}

/// The presentation rule: overdue and not completed.
pub fn display_overdue(task: &Task, today: NaiveDate) -> bool {
    is_overdue(task, today) && task.status != Status::Completed
}

/// Aggregate statistics over a task collection.
pub fn statistics(tasks: &[Task], today: NaiveDate) -> Statistics {
    let total = tasks.len();
    let completed = tasks
        .iter()
        .filter(|task| task.status == Status::Completed)
        .count();
    let overdue = tasks
        .iter()
        .filter(|task| display_overdue(task, today))
        .count();

    Statistics {
        total,
        completed,
        pending: total - completed,
        overdue,
    }
}
