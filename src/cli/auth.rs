//! Authentication commands: register, login, logout, whoami.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::auth::decode_token;
use crate::error::Result;
use crate::model::User;
use crate::output::{emit_success, HumanOutput};

use super::AppContext;

/// User payload for command output. Never includes the credential.
#[derive(Serialize)]
struct UserReport {
    id: String,
    name: String,
    email: String,
    created_at: DateTime<Utc>,
}

impl From<&User> for UserReport {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

pub fn register(ctx: &AppContext, name: &str, email: &str, password: &str) -> Result<()> {
    ctx.pause_before_mutation();
    let user = ctx.auth().register(name, email, password)?;

    let mut human = HumanOutput::new(format!("taskflow register: welcome, {}", user.name));
    human.push_summary("email", user.email.clone());
    human.push_summary("user id", user.id.clone());
    human.push_next_step("taskflow task add \"<title>\" --category <category>");

    emit_success(ctx.out, "register", &UserReport::from(&user), Some(&human))?;
    Ok(())
}

pub fn login(ctx: &AppContext, email: &str, password: &str) -> Result<()> {
    ctx.pause_before_mutation();
    let user = ctx.auth().login(email, password)?;

    let mut human = HumanOutput::new(format!("taskflow login: welcome back, {}", user.name));
    human.push_summary("email", user.email.clone());
    human.push_next_step("taskflow task board");

    emit_success(ctx.out, "login", &UserReport::from(&user), Some(&human))?;
    Ok(())
}

pub fn logout(ctx: &AppContext) -> Result<()> {
    let had_session = ctx.auth().current_session().is_some();
    ctx.auth().logout()?;

    #[derive(Serialize)]
    struct LogoutReport {
        signed_out: bool,
    }

    let header = if had_session {
        "taskflow logout: signed out"
    } else {
        "taskflow logout: no active session"
    };

    emit_success(
        ctx.out,
        "logout",
        &LogoutReport {
            signed_out: had_session,
        },
        Some(&HumanOutput::new(header)),
    )?;
    Ok(())
}

pub fn whoami(ctx: &AppContext) -> Result<()> {
    let session = ctx.require_session()?;

    #[derive(Serialize)]
    struct WhoamiReport {
        #[serde(flatten)]
        user: UserReport,
        #[serde(skip_serializing_if = "Option::is_none")]
        token_expires_at: Option<DateTime<Utc>>,
    }

    // Expiry is informational only; restore never enforces it.
    let token_expires_at = decode_token(&session.token)
        .and_then(|claims| DateTime::from_timestamp_millis(claims.exp));

    let mut human = HumanOutput::new(format!(
        "taskflow whoami: {} <{}>",
        session.user.name, session.user.email
    ));
    human.push_summary("user id", session.user.id.clone());
    if let Some(exp) = token_expires_at {
        human.push_summary("token expires", exp.to_rfc3339());
    }

    emit_success(
        ctx.out,
        "whoami",
        &WhoamiReport {
            user: UserReport::from(&session.user),
            token_expires_at,
        },
        Some(&human),
    )?;
    Ok(())
}
