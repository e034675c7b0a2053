//! Shared fixtures for integration tests.
//!
//! Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use taskflow::auth::AuthService;
use taskflow::model::{Category, Priority, Status, TaskDraft};
use taskflow::store::{MemoryStore, Store};

pub fn memory_store() -> Arc<dyn Store> {
    Arc::new(MemoryStore::new())
}

/// A store with the demo user and tasks seeded, plus an auth service
/// bound to it.
pub fn seeded() -> (Arc<dyn Store>, AuthService) {
    let store = memory_store();
    let auth = AuthService::new(store.clone());
    auth.bootstrap_if_empty().expect("seeding succeeds");
    (store, auth)
}

pub fn draft(title: &str) -> TaskDraft {
    TaskDraft {
        title: title.to_string(),
        description: String::new(),
        category: Category::Personal,
        priority: Priority::Medium,
        status: Status::Todo,
        due_date: day(2024, 12, 25),
    }
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
