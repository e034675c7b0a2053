//! Task commands: CRUD plus the derived list/board/stats views.

use chrono::{Days, Local, NaiveDate};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{Category, Priority, Status, Task, TaskDraft, TaskPatch};
use crate::output::{emit_success, HumanOutput};
use crate::repo::TaskRepository;
use crate::view::{self, FilterSpec};

use super::{AppContext, TaskCommands};

pub fn run(ctx: &AppContext, command: TaskCommands) -> Result<()> {
    let session = ctx.require_session()?;
    let mut repo = TaskRepository::load_for_user(ctx.store.clone(), session.user.id.clone());

    match command {
        TaskCommands::Add {
            title,
            description,
            category,
            priority,
            status,
            due,
        } => add(ctx, &mut repo, title, description, category, priority, status, due),
        TaskCommands::Edit {
            id,
            title,
            description,
            category,
            priority,
            status,
            due,
        } => edit(ctx, &mut repo, id, title, description, category, priority, status, due),
        TaskCommands::Status { id, status } => set_status(ctx, &mut repo, &id, &status),
        TaskCommands::Rm { id } => remove(ctx, &mut repo, &id),
        TaskCommands::List {
            search,
            category,
            priority,
        } => list(ctx, &repo, search, category, priority),
        TaskCommands::Board {
            search,
            category,
            priority,
        } => board(ctx, &repo, search, category, priority),
        TaskCommands::Stats => stats(ctx, &repo),
    }
}

#[allow(clippy::too_many_arguments)]
fn add(
    ctx: &AppContext,
    repo: &mut TaskRepository,
    title: String,
    description: String,
    category: String,
    priority: String,
    status: String,
    due: Option<String>,
) -> Result<()> {
    ctx.pause_before_mutation();

    let draft = TaskDraft {
        title,
        description,
        category: category.parse::<Category>()?,
        priority: priority.parse::<Priority>()?,
        status: status.parse::<Status>()?,
        due_date: match due {
            Some(raw) => parse_due_date(&raw)?,
            // The original form defaults the due date to tomorrow.
            None => today().checked_add_days(Days::new(1)).unwrap_or_else(today),
        },
    };

    let task = repo.create(draft)?;

    let mut human = HumanOutput::new(format!("taskflow task add: created {}", task.id));
    human.push_detail(task_line(&task, today()));

    emit_success(ctx.out, "task add", &task, Some(&human))?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn edit(
    ctx: &AppContext,
    repo: &mut TaskRepository,
    id: String,
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    priority: Option<String>,
    status: Option<String>,
    due: Option<String>,
) -> Result<()> {
    ctx.pause_before_mutation();

    let patch = TaskPatch {
        title,
        description,
        category: category.map(|raw| raw.parse::<Category>()).transpose()?,
        priority: priority.map(|raw| raw.parse::<Priority>()).transpose()?,
        status: status.map(|raw| raw.parse::<Status>()).transpose()?,
        due_date: due.map(|raw| parse_due_date(&raw)).transpose()?,
    };
    if patch.is_empty() {
        return Err(Error::validation("fields", "nothing to update"));
    }

    let task = repo.update(&id, patch)?;

    let mut human = HumanOutput::new(format!("taskflow task edit: updated {}", task.id));
    human.push_detail(task_line(&task, today()));

    emit_success(ctx.out, "task edit", &task, Some(&human))?;
    Ok(())
}

fn set_status(ctx: &AppContext, repo: &mut TaskRepository, id: &str, status: &str) -> Result<()> {
    ctx.pause_before_mutation();

    let status = status.parse::<Status>()?;
    let task = repo.set_status(id, status)?;

    let human = HumanOutput::new(format!(
        "taskflow task status: {} is now {}",
        task.id, task.status
    ));

    emit_success(ctx.out, "task status", &task, Some(&human))?;
    Ok(())
}

fn remove(ctx: &AppContext, repo: &mut TaskRepository, id: &str) -> Result<()> {
    ctx.pause_before_mutation();

    repo.delete(id)?;

    #[derive(Serialize)]
    struct DeleteReport<'a> {
        id: &'a str,
        deleted: bool,
    }

    emit_success(
        ctx.out,
        "task rm",
        &DeleteReport { id, deleted: true },
        Some(&HumanOutput::new(format!("taskflow task rm: deleted {id}"))),
    )?;
    Ok(())
}

fn list(
    ctx: &AppContext,
    repo: &TaskRepository,
    search: String,
    category: Option<String>,
    priority: Option<String>,
) -> Result<()> {
    let spec = filter_spec(search, category, priority)?;
    let tasks = view::filter(repo.tasks(), &spec);
    let today = today();

    let mut human = HumanOutput::new(format!(
        "taskflow tasks: {} of {}",
        tasks.len(),
        repo.tasks().len()
    ));
    for task in &tasks {
        human.push_detail(task_line(task, today));
    }

    emit_success(ctx.out, "task list", &tasks, Some(&human))?;
    Ok(())
}

fn board(
    ctx: &AppContext,
    repo: &TaskRepository,
    search: String,
    category: Option<String>,
    priority: Option<String>,
) -> Result<()> {
    let spec = filter_spec(search, category, priority)?;
    let tasks = view::filter(repo.tasks(), &spec);
    let board = view::group_by_status(&tasks);
    let today = today();

    let mut human = HumanOutput::new("taskflow board");
    push_column(&mut human, "To Do", &board.todo, today);
    push_column(&mut human, "In Progress", &board.in_progress, today);
    push_column(&mut human, "Completed", &board.completed, today);
    if !board.unrecognized.is_empty() {
        push_column(&mut human, "Unrecognized", &board.unrecognized, today);
        human.push_warning(format!(
            "{} task(s) have an unrecognized status; fix them with taskflow task status",
            board.unrecognized.len()
        ));
    }

    emit_success(ctx.out, "task board", &board, Some(&human))?;
    Ok(())
}

fn stats(ctx: &AppContext, repo: &TaskRepository) -> Result<()> {
    let stats = view::statistics(repo.tasks(), today());

    let mut human = HumanOutput::new("taskflow stats");
    human.push_summary("total", stats.total.to_string());
    human.push_summary("completed", stats.completed.to_string());
    human.push_summary("pending", stats.pending.to_string());
    human.push_summary("overdue", stats.overdue.to_string());

    emit_success(ctx.out, "task stats", &stats, Some(&human))?;
    Ok(())
}

fn filter_spec(
    search: String,
    category: Option<String>,
    priority: Option<String>,
) -> Result<FilterSpec> {
    Ok(FilterSpec {
        search_term: search,
        category: category.map(|raw| raw.parse::<Category>()).transpose()?,
        priority: priority.map(|raw| raw.parse::<Priority>()).transpose()?,
    })
}

fn parse_due_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| Error::validation("due", format!("invalid due date (YYYY-MM-DD): {raw}")))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn push_column(human: &mut HumanOutput, name: &str, tasks: &[Task], today: NaiveDate) {
    human.push_detail(format!("{name} ({})", tasks.len()));
    if tasks.is_empty() {
        human.push_detail("  (no tasks)".to_string());
        return;
    }
    for task in tasks {
        human.push_detail(format!("  {}", task_line(task, today)));
    }
}

fn task_line(task: &Task, today: NaiveDate) -> String {
    let overdue = if view::display_overdue(task, today) {
        "  OVERDUE"
    } else {
        ""
    };
    format!(
        "{}  {}  [{}/{}]  {}  due {}{}",
        task.id,
        task.title,
        task.priority,
        task.category,
        task.status,
        format_date(task.due_date),
        overdue
    )
}

/// Short date display, e.g. `Dec 25, 2024`.
fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}
