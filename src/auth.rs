//! Auth service: user registry, credential checks, and the current session.
//!
//! Passwords are stored as argon2id hashes. Stores written by older
//! builds may still hold plaintext; verification falls back to a direct
//! compare for those records so they keep authenticating.
//!
//! The session token is an opaque base64 blob encoding
//! `{userId, email, exp}`. Expiry is stamped at issuance (now + TTL) but
//! is deliberately not checked when restoring a session; restored
//! sessions stay valid until logout.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::{Error, FieldError, Result};
use crate::model::{Category, Priority, Status, Task, User};
use crate::store::{self, Store, TASKS_KEY, TOKEN_KEY, USERS_KEY, USER_KEY};

const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// The runtime record of who is signed in: the issued token plus a
/// cached copy of the user it was issued for.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Payload encoded into the opaque session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub user_id: String,
    pub email: String,
    /// Expiry as epoch milliseconds. Stamped but not enforced on restore.
    pub exp: i64,
}

/// Owns the user registry and the current-session keys in the store.
pub struct AuthService {
    store: Arc<dyn Store>,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            token_ttl: Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
        }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Seed the demo user and tasks if no registry exists yet.
    ///
    /// Idempotent: a no-op returning `false` when a registry is already
    /// present, even an empty one.
    pub fn bootstrap_if_empty(&self) -> Result<bool> {
        if self.store.get(USERS_KEY).is_some() {
            return Ok(false);
        }

        let now = Utc::now();
        let users = vec![User {
            id: "user1".to_string(),
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            password: hash_password("password123")?,
            created_at: now,
        }];

        let tasks = vec![
            Task {
                id: "task1".to_string(),
                user_id: "user1".to_string(),
                title: "Complete Project Proposal".to_string(),
                description: "Write and submit the project proposal for the new client"
                    .to_string(),
                category: Category::Work,
                priority: Priority::High,
                status: Status::Todo,
                due_date: date(2024, 12, 25),
                created_at: now,
                updated_at: now,
            },
            Task {
                id: "task2".to_string(),
                user_id: "user1".to_string(),
                title: "Learn React Hooks".to_string(),
                description: "Study useState, useEffect, and custom hooks".to_string(),
                category: Category::Learning,
                priority: Priority::Medium,
                status: Status::InProgress,
                due_date: date(2024, 12, 30),
                created_at: now,
                updated_at: now,
            },
            Task {
                id: "task3".to_string(),
                user_id: "user1".to_string(),
                title: "Grocery Shopping".to_string(),
                description: "Buy groceries for the week".to_string(),
                category: Category::Personal,
                priority: Priority::Low,
                status: Status::Completed,
                due_date: date(2024, 12, 20),
                created_at: now,
                updated_at: now,
            },
        ];

        store::write_json_list(self.store.as_ref(), USERS_KEY, &users)?;
        store::write_json_list(self.store.as_ref(), TASKS_KEY, &tasks)?;
        Ok(true)
    }

    /// Create an account and sign it in.
    ///
    /// All offending fields are surfaced together in one `Validation`
    /// error. Email uniqueness is checked case-insensitively (ASCII).
    pub fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let name = name.trim();
        let email = email.trim();

        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push(FieldError::new("name", "full name is required"));
        } else if name.chars().count() < 2 {
            errors.push(FieldError::new("name", "name must be at least 2 characters"));
        }
        errors.extend(validate_email(email));
        if password.is_empty() {
            errors.push(FieldError::new("password", "password is required"));
        } else if password.chars().count() < 6 {
            errors.push(FieldError::new(
                "password",
                "password must be at least 6 characters",
            ));
        }
        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        let mut users = self.registry();
        if users
            .iter()
            .any(|user| user.email.eq_ignore_ascii_case(email))
        {
            return Err(Error::Conflict(email.to_string()));
        }

        let user = User {
            id: format!("user_{}", Uuid::new_v4().simple()),
            name: name.to_string(),
            email: email.to_string(),
            password: hash_password(password)?,
            created_at: Utc::now(),
        };

        users.push(user.clone());
        store::write_json_list(self.store.as_ref(), USERS_KEY, &users)?;
        self.establish_session(&user)?;
        Ok(user)
    }

    /// Validate credentials and sign the matching user in.
    pub fn login(&self, email: &str, password: &str) -> Result<User> {
        let email = email.trim();

        let mut errors = validate_email(email);
        if password.is_empty() {
            errors.push(FieldError::new("password", "password is required"));
        }
        if !errors.is_empty() {
            return Err(Error::Validation(errors));
        }

        let users = self.registry();
        let user = users
            .iter()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .filter(|user| verify_password(password, &user.password))
            .cloned()
            .ok_or_else(|| Error::Auth("invalid email or password".to_string()))?;

        self.establish_session(&user)?;
        Ok(user)
    }

    /// Destroy the current session, if any.
    pub fn logout(&self) -> Result<()> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USER_KEY)?;
        Ok(())
    }

    /// Restore the persisted session.
    ///
    /// Absent when either key is missing, the cached user payload fails
    /// to parse, or the user no longer exists in the registry.
    pub fn current_session(&self) -> Option<Session> {
        let token = self.store.get(TOKEN_KEY)?;
        let raw_user = self.store.get(USER_KEY)?;

        let user: User = match serde_json::from_str(&raw_user) {
            Ok(user) => user,
            Err(err) => {
                warn!(%err, "malformed cached user payload; requiring re-login");
                return None;
            }
        };

        if !self.registry().iter().any(|entry| entry.id == user.id) {
            warn!(user_id = %user.id, "session user missing from registry; signing out");
            return None;
        }

        Some(Session { token, user })
    }

    /// Read the user registry. Malformed data is an empty registry.
    pub fn registry(&self) -> Vec<User> {
        store::read_json_list(self.store.as_ref(), USERS_KEY)
    }

    fn establish_session(&self, user: &User) -> Result<()> {
        let token = self.issue_token(user)?;
        self.store.set(TOKEN_KEY, &token)?;
        self.store.set(USER_KEY, &serde_json::to_string(user)?)?;
        Ok(())
    }

    fn issue_token(&self, user: &User) -> Result<String> {
        let claims = TokenClaims {
            user_id: user.id.clone(),
            email: user.email.clone(),
            exp: (Utc::now() + self.token_ttl).timestamp_millis(),
        };
        Ok(BASE64.encode(serde_json::to_vec(&claims)?))
    }
}

/// Decode an opaque session token back into its claims.
pub fn decode_token(token: &str) -> Option<TokenClaims> {
    let bytes = BASE64.decode(token.trim()).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Hash a password using argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| Error::OperationFailed(format!("failed to hash password: {err}")))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored credential. Values that are not
/// argon2 hashes are treated as legacy plaintext.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => stored == password,
    }
}

fn validate_email(email: &str) -> Vec<FieldError> {
    if email.is_empty() {
        vec![FieldError::new("email", "email is required")]
    } else if !is_valid_email(email) {
        vec![FieldError::new("email", "please enter a valid email")]
    } else {
        Vec::new()
    }
}

/// Standard `local@domain.tld` shape: no whitespace, exactly one `@`,
/// and a dotted domain with a non-empty tld.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

fn date(year: i32, month: u32, day: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(year, month, day).expect("valid seed date")
}
