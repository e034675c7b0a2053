//! Command-line interface for taskflow
//!
//! This module defines the CLI structure using clap derive macros.
//! Command groups live in their own submodules.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::auth::{AuthService, Session};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputOptions;
use crate::store::{FileStore, Store};

mod auth;
mod init;
mod task;

/// taskflow - local task tracker
///
/// Stores users and tasks in a local data directory and renders them
/// into a kanban-style board gated by authentication.
#[derive(Parser, Debug)]
#[command(name = "taskflow")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory holding the persistent store
    #[arg(long, global = true, env = "TASKFLOW_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory to load .taskflow.toml from (defaults to current directory)
    #[arg(long, global = true, env = "TASKFLOW_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Seed demo data if the store is empty
    Init,

    /// Create an account and sign in
    Register {
        /// Full name
        #[arg(long)]
        name: String,

        /// Email address
        #[arg(long)]
        email: String,

        /// Password (at least 6 characters)
        #[arg(long)]
        password: String,
    },

    /// Sign in with email and password
    Login {
        /// Email address
        #[arg(long)]
        email: String,

        /// Password
        #[arg(long)]
        password: String,
    },

    /// Sign out and clear the session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a task
    Add {
        /// Task title (at least 3 characters)
        title: String,

        /// Longer description
        #[arg(long, default_value = "")]
        description: String,

        /// Category: work, personal, learning, health, finance, other
        #[arg(long)]
        category: String,

        /// Priority: low, medium, high
        #[arg(long, default_value = "medium")]
        priority: String,

        /// Status: todo, in-progress, completed
        #[arg(long, default_value = "todo")]
        status: String,

        /// Due date (YYYY-MM-DD, defaults to tomorrow)
        #[arg(long)]
        due: Option<String>,
    },

    /// Edit fields of an existing task
    Edit {
        /// Task id
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Category: work, personal, learning, health, finance, other
        #[arg(long)]
        category: Option<String>,

        /// Priority: low, medium, high
        #[arg(long)]
        priority: Option<String>,

        /// Status: todo, in-progress, completed
        #[arg(long)]
        status: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },

    /// Move a task to a status column
    Status {
        /// Task id
        id: String,

        /// Status: todo, in-progress, completed
        status: String,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: String,
    },

    /// List tasks, optionally filtered
    List {
        /// Case-insensitive search over title and description
        #[arg(long, default_value = "")]
        search: String,

        /// Filter by category
        #[arg(long)]
        category: Option<String>,

        /// Filter by priority
        #[arg(long)]
        priority: Option<String>,
    },

    /// Render the board grouped by status
    Board {
        /// Case-insensitive search over title and description
        #[arg(long, default_value = "")]
        search: String,

        /// Filter by category
        #[arg(long)]
        category: Option<String>,

        /// Filter by priority
        #[arg(long)]
        priority: Option<String>,
    },

    /// Show aggregate statistics
    Stats,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let ctx = AppContext::build(
            self.data_dir.as_deref(),
            self.config_dir.as_deref(),
            OutputOptions {
                json: self.json,
                quiet: self.quiet,
            },
        )?;

        match self.command {
            Commands::Init => init::run(&ctx),
            Commands::Register {
                name,
                email,
                password,
            } => auth::register(&ctx, &name, &email, &password),
            Commands::Login { email, password } => auth::login(&ctx, &email, &password),
            Commands::Logout => auth::logout(&ctx),
            Commands::Whoami => auth::whoami(&ctx),
            Commands::Task(command) => task::run(&ctx, command),
        }
    }
}

/// Shared per-invocation context: the resolved store, config, and
/// output options every command needs.
pub(crate) struct AppContext {
    pub store: Arc<dyn Store>,
    pub config: Config,
    pub config_dir: PathBuf,
    pub out: OutputOptions,
}

impl AppContext {
    fn build(
        data_dir: Option<&std::path::Path>,
        config_dir: Option<&std::path::Path>,
        out: OutputOptions,
    ) -> Result<Self> {
        let config_dir = match config_dir {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir()?,
        };
        let config = Config::load_from_dir(&config_dir);

        let data_dir = config.resolve_data_dir(data_dir);
        std::fs::create_dir_all(&data_dir)?;

        Ok(Self {
            store: Arc::new(FileStore::new(data_dir)),
            config,
            config_dir,
            out,
        })
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.store.clone())
            .with_token_ttl(chrono::Duration::hours(self.config.auth.token_ttl_hours))
    }

    /// The signed-in session, or an auth denial.
    pub fn require_session(&self) -> Result<Session> {
        self.auth()
            .current_session()
            .ok_or_else(|| Error::Auth("not signed in".to_string()))
    }

    /// Optional artificial pause before mutations, mirroring the
    /// original client's simulated request latency.
    pub fn pause_before_mutation(&self) {
        let ms = self.config.ui.simulate_latency_ms;
        if ms > 0 {
            std::thread::sleep(std::time::Duration::from_millis(ms));
        }
    }
}
