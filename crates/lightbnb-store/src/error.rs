//! Error types for the data-access layer.

use chrono::NaiveDate;

/// Errors returned by every store operation.
///
/// A lookup that finds nothing is not an error; it returns `Ok(None)` or an
/// empty `Vec`. These variants mean the operation could not be carried out.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A SQL statement failed.
    #[error("store database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// No pooled connection could be checked out.
    #[error("store connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// An insert referenced a row that does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of row that was missing (`"user"`, `"property"`, ...).
        entity: &'static str,
        /// The ID that was looked up.
        id: i64,
    },

    /// The input was rejected before any SQL ran.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Input rejected before it reached the database.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: i64 },

    #[error("'{0}' is not an email address")]
    InvalidEmail(String),

    #[error("email {0} is already registered")]
    DuplicateEmail(String),

    #[error("limit must be at least 1")]
    ZeroLimit,

    #[error("reservation must end after it starts ({start} to {end})")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),
}

/// Fails with `EmptyField` when `value` is blank.
pub(crate) fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}

/// Fails with `ZeroLimit` unless `limit` is at least one.
pub(crate) fn require_limit(limit: u32) -> Result<(), ValidationError> {
    if limit == 0 {
        return Err(ValidationError::ZeroLimit);
    }
    Ok(())
}
