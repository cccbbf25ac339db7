use log::{info, warn};
use rusqlite::params;
use std::fmt;
use std::str::FromStr;

use crate::db::Store;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Instructor,
    Student,
}

impl Role {
    /// Tag stored in `accounts.role`.
    pub fn as_tag(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Instructor => "instructor",
            Role::Student => "student",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Instructor => "Instructor",
            Role::Student => "Student",
        }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Role> {
        match s.trim() {
            "admin" => Ok(Role::Admin),
            "instructor" => Ok(Role::Instructor),
            "student" => Ok(Role::Student),
            other => Err(AppError::invalid("role", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

#[derive(Clone, PartialEq)]
pub struct Identity {
    pub account_id: i64,
    pub login: String,
    #[allow(dead_code)]
    pub secret: String,
    pub role: Role,
    /// Student record matched by email; `None` when the role is not student
    /// or no record carries the account's email.
    pub student_id: Option<i64>,
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("account_id", &self.account_id)
            .field("login", &self.login)
            .field("secret", &"<redacted>")
            .field("role", &self.role)
            .field("student_id", &self.student_id)
            .finish()
    }
}

/// Exact, case-sensitive match on login and secret.
pub fn authenticate(store: &Store, login: &str, secret: &str) -> Result<Option<Identity>> {
    let rows = store.query_with(
        "SELECT id, role FROM accounts WHERE login = ?1 AND secret = ?2",
        params![login, secret],
    )?;
    let Some(row) = rows.first() else {
        warn!("failed login attempt for {login:?}");
        return Ok(None);
    };

    let account_id: i64 = row
        .text("id")
        .parse()
        .map_err(|_| AppError::invalid("account id", row.text("id")))?;
    let role: Role = row.text("role").parse()?;

    let student_id = match role {
        Role::Student => resolve_student_record(store, account_id)?,
        _ => None,
    };
    if role == Role::Student && student_id.is_none() {
        warn!("student account {login:?} has no matching student record");
    }

    info!("{login} logged in as {role}");
    Ok(Some(Identity {
        account_id,
        login: login.to_string(),
        secret: secret.to_string(),
        role,
        student_id,
    }))
}

// Accounts and student records share no key; they are paired by email.
fn resolve_student_record(store: &Store, account_id: i64) -> Result<Option<i64>> {
    let rows = store.query_with(
        "SELECT s.id
         FROM students s
         JOIN accounts a ON a.email = s.email
         WHERE a.id = ?1",
        [account_id],
    )?;
    Ok(rows.first().and_then(|r| r.text("id").parse().ok()))
}
