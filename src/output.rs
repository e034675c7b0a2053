//! Output envelopes shared by every taskflow command.
//!
//! Success output is either a schema-versioned JSON envelope or a short
//! human block (header, summary pairs, detail lines). Errors render to
//! stderr with a hint, or as a JSON error envelope under `--json`.

use serde::Serialize;

use crate::error::{Error, Result};

const SCHEMA_VERSION: &str = "taskflow.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

/// Accumulated human-readable output for one command invocation.
#[derive(Debug, Clone, Default)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    details: Vec<String>,
    warnings: Vec<String>,
    next_steps: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            ..Self::default()
        }
    }

    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    pub fn push_detail(&mut self, value: impl Into<String>) {
        self.details.push(value.into());
    }

    pub fn push_warning(&mut self, value: impl Into<String>) {
        self.warnings.push(value.into());
    }

    pub fn push_next_step(&mut self, value: impl Into<String>) {
        self.next_steps.push(value.into());
    }

    fn render(&self) -> String {
        let mut lines = vec![self.header.clone()];

        if !self.summary.is_empty() {
            lines.push(String::new());
            lines.push("Summary:".to_string());
            for (key, value) in &self.summary {
                if value.is_empty() {
                    lines.push(format!("- {key}"));
                } else {
                    lines.push(format!("- {key}: {value}"));
                }
            }
        }
        section(&mut lines, "Details", &self.details);
        section(&mut lines, "Warnings", &self.warnings);
        section(&mut lines, "Next steps", &self.next_steps);

        lines.join("\n")
    }
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        #[derive(Serialize)]
        struct Envelope<'a, T: Serialize> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            data: &'a T,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            warnings: Vec<String>,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            next_steps: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data,
            warnings: human.map(|h| h.warnings.clone()).unwrap_or_default(),
            next_steps: human.map(|h| h.next_steps.clone()).unwrap_or_default(),
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if options.quiet {
        return Ok(());
    }
    if let Some(human) = human {
        println!("{}", human.render());
    }
    Ok(())
}

pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let next_steps = next_steps_for(err);

    if json {
        #[derive(Serialize)]
        struct ErrorBody<'a> {
            message: &'a str,
            code: i32,
            kind: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<serde_json::Value>,
        }

        #[derive(Serialize)]
        struct Envelope<'a> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            error: ErrorBody<'a>,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            next_steps: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            error: ErrorBody {
                message: &err.to_string(),
                code: err.exit_code(),
                kind: kind_of(err),
                details: err.details(),
            },
            next_steps,
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Some(hint) = next_steps.first() {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

/// Best-effort command name for error envelopes, derived from argv
/// before clap gets a chance to reject it.
pub fn infer_command_name_from_args() -> String {
    let mut positionals = std::env::args()
        .skip(1)
        .filter(|arg| !arg.starts_with('-'));

    match positionals.next() {
        Some(command) if command == "task" => match positionals.next() {
            Some(sub) => format!("task {sub}"),
            None => command,
        },
        Some(command) => command,
        None => "taskflow".to_string(),
    }
}

fn kind_of(err: &Error) -> &'static str {
    match err.exit_code() {
        2 => "user_error",
        3 => "auth_denied",
        _ => "operation_failed",
    }
}

fn next_steps_for(err: &Error) -> Vec<String> {
    match err {
        Error::Auth(_) | Error::Conflict(_) => {
            vec!["taskflow login --email <email> --password <password>".to_string()]
        }
        Error::NotFound(_) => vec!["taskflow task list".to_string()],
        _ => Vec::new(),
    }
}

fn section(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(format!("{title}:"));
    for item in items {
        lines.push(format!("- {item}"));
    }
}
