//! taskflow - local task tracking library
//!
//! Core for a single-user task tracker: users and tasks live in a local
//! string-keyed blob store and are rendered into a kanban-style board
//! gated by authentication.
//!
//! # Core Concepts
//!
//! - **Store**: string-keyed durable blobs, the only component touching disk
//! - **Auth Service**: user registry, credential checks, session token
//! - **Task Repository**: per-user working set, write-through CRUD
//! - **View Derivation**: pure filter/group/overdue/statistics functions
//!
//! # Module Organization
//!
//! - `cli`: command-line interface using clap
//! - `config`: configuration loading from `.taskflow.toml`
//! - `error`: error types and result aliases
//! - `model`: users, tasks, and their enums
//! - `auth`: authentication and session management
//! - `repo`: task repository
//! - `view`: derived views (filtering, grouping, statistics)
//! - `store`: persistent key/value storage
//! - `output`: human/JSON output envelopes

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod repo;
pub mod store;
pub mod view;

pub use error::{Error, Result};
