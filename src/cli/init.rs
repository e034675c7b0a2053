//! taskflow init command implementation
//!
//! Writes a default `.taskflow.toml` if none exists and seeds the demo
//! user and tasks when the store has no user registry.

use std::path::Path;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::Task;
use crate::output::{emit_success, HumanOutput};
use crate::store::{self, TASKS_KEY};

use super::AppContext;

#[derive(serde::Serialize)]
struct InitReport {
    seeded: bool,
    config_created: bool,
    users: usize,
    tasks: usize,
}

pub fn run(ctx: &AppContext) -> Result<()> {
    let config_created = ensure_config(&ctx.config_dir)?;

    let auth = ctx.auth();
    let seeded = auth.bootstrap_if_empty()?;

    let users = auth.registry().len();
    let tasks: Vec<Task> = store::read_json_list(ctx.store.as_ref(), TASKS_KEY);

    let report = InitReport {
        seeded,
        config_created,
        users,
        tasks: tasks.len(),
    };

    let header = if seeded || config_created {
        "taskflow init: initialized"
    } else {
        "taskflow init: nothing to do"
    };

    let mut human = HumanOutput::new(header);
    if seeded {
        human.push_summary("seeded", "demo data");
    }
    if config_created {
        human.push_summary("created", ".taskflow.toml");
    }
    human.push_summary("users", users.to_string());
    human.push_summary("tasks", tasks.len().to_string());
    if seeded {
        human.push_next_step(
            "taskflow login --email john@example.com --password password123",
        );
    }

    emit_success(ctx.out, "init", &report, Some(&human))?;

    Ok(())
}

fn ensure_config(config_dir: &Path) -> Result<bool> {
    let path = config_dir.join(".taskflow.toml");
    if path.exists() {
        if !path.is_file() {
            return Err(Error::OperationFailed(format!(
                ".taskflow.toml exists but is not a file: {}",
                path.display()
            )));
        }
        return Ok(false);
    }

    Config::default().save(&path)?;
    Ok(true)
}
