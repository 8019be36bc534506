/*!
 * Error types for the staff-reviews library.
 *
 * Attribute validation failures and persistence failures are kept apart so
 * callers can tell a rejected value from a broken database.
 */

use thiserror::Error;

/// Lowest review year accepted by the review model
pub const MIN_REVIEW_YEAR: i64 = 2000;

/// Errors raised by validated attribute setters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Review year below the accepted minimum
    #[error("Year must be an integer greater than or equal to {min} (got {0})", min = MIN_REVIEW_YEAR)]
    InvalidYear(i64),

    /// Stored review year is not an integer
    #[error("Year must be an integer greater than or equal to {min} (got {0})", min = MIN_REVIEW_YEAR)]
    NonIntegerYear(String),

    /// Review summary was empty or not text
    #[error("Summary must be a non-empty string")]
    EmptySummary,

    /// Review points at an employee that is not in the database
    #[error("employee_id must reference an existing employee in the database (got {0})")]
    UnknownEmployee(i64),

    /// Stored employee reference is not an integer
    #[error("employee_id must reference an existing employee in the database (got {0})")]
    NonIntegerEmployeeId(String),

    /// Employee name was empty
    #[error("Name must be a non-empty string")]
    EmptyName,

    /// Employee job title was empty
    #[error("Job title must be a non-empty string")]
    EmptyJobTitle,
}

/// Errors returned by entity models and repositories
#[derive(Error, Debug)]
pub enum ModelError {
    /// An attribute value was rejected
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The operation needs a row id but the entity was never saved
    #[error("{0} has not been saved to the database")]
    NotPersisted(&'static str),

    /// Error reported by SQLite or the connection layer
    #[error("Database error: {0}")]
    Database(String),
}

impl ModelError {
    /// Returns the validation error, if this is one
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for ModelError {
    fn from(error: anyhow::Error) -> Self {
        Self::Database(format!("{:#}", error))
    }
}

impl From<rusqlite::Error> for ModelError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Database(error.to_string())
    }
}

/// Result alias for model and repository operations
pub type ModelResult<T> = std::result::Result<T, ModelError>;
