//! User accounts.

use lightbnb_types::{NewUser, User};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{require, StoreError, ValidationError};

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
    })
}

/// Looks up the user registered with `email`.
///
/// # Errors
///
/// Returns `StoreError::Database` on SQL failure.
pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>, StoreError> {
    let user = conn
        .query_row(
            "SELECT id, name, email, password FROM users WHERE email = ?1",
            [email],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

/// Looks up a user by ID.
///
/// # Errors
///
/// Returns `StoreError::Database` on SQL failure.
pub fn get_user_by_id(conn: &Connection, id: i64) -> Result<Option<User>, StoreError> {
    let user = conn
        .query_row(
            "SELECT id, name, email, password FROM users WHERE id = ?1",
            [id],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

/// Registers a new user and returns the stored row.
///
/// # Errors
///
/// Returns `StoreError::Validation` for blank fields, a malformed email or
/// an email that is already registered, and `StoreError::Database` on any
/// other SQL failure.
pub fn create_user(conn: &Connection, user: &NewUser) -> Result<User, StoreError> {
    require("name", &user.name)?;
    require("email", &user.email)?;
    require("password", &user.password)?;
    if !user.email.contains('@') {
        return Err(ValidationError::InvalidEmail(user.email.clone()).into());
    }

    let created = conn
        .query_row(
            "INSERT INTO users (name, email, password) VALUES (?1, ?2, ?3)
             RETURNING id, name, email, password",
            params![user.name, user.email, user.password],
            user_from_row,
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(code, _)
                if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                StoreError::Validation(ValidationError::DuplicateEmail(user.email.clone()))
            }
            other => StoreError::Database(other),
        })?;

    tracing::info!(user_id = created.id, "user created");
    Ok(created)
}

pub(crate) fn user_exists(conn: &Connection, id: i64) -> Result<bool, StoreError> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1)",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists)
}
