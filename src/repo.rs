//! Task repository.
//!
//! Owns the in-memory working set for one user and keeps it write-through
//! consistent with the persisted global task list. Every mutation is a
//! whole-list read-modify-write of `taskflow_tasks`; last writer wins,
//! which is acceptable because there is a single actor per session.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{Error, FieldError, Result};
use crate::model::{Status, Task, TaskDraft, TaskPatch};
use crate::store::{self, Store, TASKS_KEY};

const MIN_TITLE_LEN: usize = 3;

/// Working set of tasks scoped to one signed-in user.
pub struct TaskRepository {
    store: Arc<dyn Store>,
    user_id: String,
    tasks: Vec<Task>,
}

impl TaskRepository {
    /// Create a repository for the given user and load their tasks.
    pub fn load_for_user(store: Arc<dyn Store>, user_id: impl Into<String>) -> Self {
        let mut repo = Self {
            store,
            user_id: user_id.into(),
            tasks: Vec::new(),
        };
        repo.reload();
        repo
    }

    /// Re-read the persisted list and replace the working set with the
    /// tasks owned by this user. Malformed data loads as empty.
    pub fn reload(&mut self) {
        let all: Vec<Task> = store::read_json_list(self.store.as_ref(), TASKS_KEY);
        self.tasks = all
            .into_iter()
            .filter(|task| task.user_id == self.user_id)
            .collect();
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The current working set, in persisted order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    /// Create a task from a draft, assign id and timestamps, and persist.
    pub fn create(&mut self, draft: TaskDraft) -> Result<Task> {
        let title = validate_title(&draft.title)?;

        let now = Utc::now();
        let task = Task {
            id: format!("task_{}", Uuid::new_v4().simple()),
            user_id: self.user_id.clone(),
            title,
            description: draft.description.trim().to_string(),
            category: draft.category,
            priority: draft.priority,
            status: draft.status,
            due_date: draft.due_date,
            created_at: now,
            updated_at: now,
        };

        self.tasks.push(task.clone());

        let mut all: Vec<Task> = store::read_json_list(self.store.as_ref(), TASKS_KEY);
        all.push(task.clone());
        store::write_json_list(self.store.as_ref(), TASKS_KEY, &all)?;

        Ok(task)
    }

    /// Merge a patch onto an existing task. Fields absent from the patch
    /// are preserved; `created_at` and the owner never change.
    pub fn update(&mut self, task_id: &str, patch: TaskPatch) -> Result<Task> {
        if let Some(title) = &patch.title {
            validate_title(title)?;
        }

        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == task_id)
            .ok_or_else(|| Error::NotFound(task_id.to_string()))?;

        if let Some(title) = patch.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = patch.description {
            task.description = description.trim().to_string();
        }
        if let Some(category) = patch.category {
            task.category = category;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        task.updated_at = Utc::now();

        let updated = task.clone();
        self.persist_replacement(&updated)?;
        Ok(updated)
    }

    /// Direct status transition. Any status is reachable from any other.
    pub fn set_status(&mut self, task_id: &str, status: Status) -> Result<Task> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == task_id)
            .ok_or_else(|| Error::NotFound(task_id.to_string()))?;

        task.status = status;
        task.updated_at = Utc::now();

        let updated = task.clone();
        self.persist_replacement(&updated)?;
        Ok(updated)
    }

    /// Remove a task from the working set and the persisted list.
    pub fn delete(&mut self, task_id: &str) -> Result<()> {
        let position = self
            .tasks
            .iter()
            .position(|task| task.id == task_id)
            .ok_or_else(|| Error::NotFound(task_id.to_string()))?;
        self.tasks.remove(position);

        let mut all: Vec<Task> = store::read_json_list(self.store.as_ref(), TASKS_KEY);
        all.retain(|task| task.id != task_id);
        store::write_json_list(self.store.as_ref(), TASKS_KEY, &all)?;

        Ok(())
    }

    fn persist_replacement(&self, updated: &Task) -> Result<()> {
        let mut all: Vec<Task> = store::read_json_list(self.store.as_ref(), TASKS_KEY);
        if let Some(entry) = all.iter_mut().find(|task| task.id == updated.id) {
            *entry = updated.clone();
            store::write_json_list(self.store.as_ref(), TASKS_KEY, &all)?;
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(vec![FieldError::new(
            "title",
            "title is required",
        )]));
    }
    if trimmed.chars().count() < MIN_TITLE_LEN {
        return Err(Error::Validation(vec![FieldError::new(
            "title",
            "title must be at least 3 characters",
        )]));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Priority};
    use crate::store::MemoryStore;
    use chrono::NaiveDate;

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            description: String::new(),
            category: Category::Work,
            priority: Priority::Medium,
            status: Status::Todo,
            due_date: NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(),
        }
    }

    fn repo() -> TaskRepository {
        TaskRepository::load_for_user(Arc::new(MemoryStore::new()), "user1")
    }

    #[test]
    fn create_rejects_short_titles() {
        let mut repo = repo();
        assert!(matches!(
            repo.create(draft("ab")),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            repo.create(draft("   ")),
            Err(Error::Validation(_))
        ));
        assert!(repo.tasks().is_empty());
    }

    #[test]
    fn create_stamps_owner_and_timestamps() {
        let mut repo = repo();
        let task = repo.create(draft("Write report")).unwrap();
        assert_eq!(task.user_id, "user1");
        assert!(task.updated_at >= task.created_at);
        assert_eq!(repo.tasks().len(), 1);
    }

    #[test]
    fn update_merges_and_preserves_created_at() {
        let mut repo = repo();
        let task = repo.create(draft("Write report")).unwrap();

        let patch = TaskPatch {
            priority: Some(Priority::High),
            ..TaskPatch::default()
        };
        let updated = repo.update(&task.id, patch).unwrap();

        assert_eq!(updated.title, "Write report");
        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.created_at, task.created_at);
        assert!(updated.updated_at >= task.updated_at);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut repo = repo();
        let err = repo.update("missing", TaskPatch::default()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn set_status_reaches_any_status() {
        let mut repo = repo();
        let task = repo.create(draft("Write report")).unwrap();

        let task = repo.set_status(&task.id, Status::Completed).unwrap();
        assert_eq!(task.status, Status::Completed);
        let task = repo.set_status(&task.id, Status::Todo).unwrap();
        assert_eq!(task.status, Status::Todo);
    }

    #[test]
    fn delete_missing_id_leaves_collection_unchanged() {
        let mut repo = repo();
        repo.create(draft("Write report")).unwrap();

        let err = repo.delete("missing").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(repo.tasks().len(), 1);
    }

    #[test]
    fn working_set_is_scoped_to_the_owner() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());

        let mut mine = TaskRepository::load_for_user(store.clone(), "user1");
        mine.create(draft("Mine")).unwrap();

        let mut theirs = TaskRepository::load_for_user(store.clone(), "user2");
        theirs.create(draft("Theirs")).unwrap();

        let mine = TaskRepository::load_for_user(store, "user1");
        assert_eq!(mine.tasks().len(), 1);
        assert_eq!(mine.tasks()[0].title, "Mine");
    }
}
