//! Core data model for taskflow.
//!
//! The serde wire names (`camelCase` fields, spaced status strings) match
//! the persisted JSON layout so existing stores keep loading unchanged.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A registered account. Created by registration, never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Argon2id hash. Stores written by older builds may hold plaintext;
    /// verification handles both.
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Task category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Work,
    Personal,
    Learning,
    Health,
    Finance,
    Other,
}

/// All categories, in display order.
pub const CATEGORIES: [Category; 6] = [
    Category::Work,
    Category::Personal,
    Category::Learning,
    Category::Health,
    Category::Finance,
    Category::Other,
];

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Board column a task lives in. Any status is reachable from any other.
///
/// `Unrecognized` absorbs unknown persisted values so bad data stays
/// visible instead of silently vanishing from the board. The original
/// string is not retained: the next whole-list write re-serializes such
/// a status as the literal `"Unrecognized"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "To Do")]
    Todo,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    #[serde(other)]
    Unrecognized,
}

/// A single task, owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    pub due_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable fields for creating a task, before server-assigned fields
/// (id, owner, timestamps) are attached.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub status: Status,
    pub due_date: NaiveDate,
}

/// Partial update for an existing task. Absent fields are preserved.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub due_date: Option<NaiveDate>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Learning => "Learning",
            Category::Health => "Health",
            Category::Finance => "Finance",
            Category::Other => "Other",
        };
        f.write_str(name)
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "work" => Ok(Category::Work),
            "personal" => Ok(Category::Personal),
            "learning" => Ok(Category::Learning),
            "health" => Ok(Category::Health),
            "finance" => Ok(Category::Finance),
            "other" => Ok(Category::Other),
            _ => Err(Error::validation(
                "category",
                format!("unknown category: {input}"),
            )),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        };
        f.write_str(name)
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(Error::validation(
                "priority",
                format!("unknown priority: {input}"),
            )),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Todo => "To Do",
            Status::InProgress => "In Progress",
            Status::Completed => "Completed",
            Status::Unrecognized => "Unrecognized",
        };
        f.write_str(name)
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized: String = input
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Status::Todo),
            "inprogress" => Ok(Status::InProgress),
            "completed" | "done" => Ok(Status::Completed),
            _ => Err(Error::validation(
                "status",
                format!("unknown status: {input}"),
            )),
        }
    }
}
