/*!
 * Review entity model.
 *
 * Every attribute is written through a validating setter, so a `Review`
 * value always satisfies:
 * - `year` is at least 2000
 * - `summary` is non-empty
 * - `employee_id` referenced an existing employee when it was set
 *
 * A rejected value leaves the previous one in place.
 */

use rusqlite::types::Value;
use serde::Serialize;
use std::fmt;

use crate::employees::EmployeeLookup;
use crate::errors::{MIN_REVIEW_YEAR, ModelResult, ValidationError};

/// A performance review written about one employee for one year
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Review {
    id: Option<i64>,
    year: i64,
    summary: String,
    employee_id: i64,
}

impl Review {
    /// Create an unsaved review, validating every attribute
    pub fn new(
        year: i64,
        summary: impl Into<String>,
        employee_id: i64,
        employees: &dyn EmployeeLookup,
    ) -> ModelResult<Self> {
        let mut review = Self::blank();
        review.set_year(year)?;
        review.set_summary(summary)?;
        review.set_employee_id(employee_id, employees)?;
        Ok(review)
    }

    /// Rebuild a review from the raw values of a stored row
    ///
    /// Columns are checked in attribute order. A value of the wrong SQLite
    /// type fails the same rule as an out-of-range one.
    pub(crate) fn from_row(
        id: i64,
        year: &Value,
        summary: &Value,
        employee_id: &Value,
        employees: &dyn EmployeeLookup,
    ) -> ModelResult<Self> {
        let mut review = Self::blank();

        match year {
            Value::Integer(year) => review.set_year(*year)?,
            other => return Err(ValidationError::NonIntegerYear(describe_value(other)).into()),
        }
        match summary {
            Value::Text(summary) => review.set_summary(summary.as_str())?,
            _ => return Err(ValidationError::EmptySummary.into()),
        }
        match employee_id {
            Value::Integer(employee_id) => review.set_employee_id(*employee_id, employees)?,
            other => {
                return Err(ValidationError::NonIntegerEmployeeId(describe_value(other)).into());
            }
        }

        review.set_id(Some(id));
        Ok(review)
    }

    fn blank() -> Self {
        Self {
            id: None,
            year: MIN_REVIEW_YEAR,
            summary: String::new(),
            employee_id: 0,
        }
    }

    /// Row id, `None` until saved or after deletion
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn year(&self) -> i64 {
        self.year
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn employee_id(&self) -> i64 {
        self.employee_id
    }

    /// Whether this review currently maps to a table row
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Set the review year
    pub fn set_year(&mut self, year: i64) -> Result<(), ValidationError> {
        if year < MIN_REVIEW_YEAR {
            return Err(ValidationError::InvalidYear(year));
        }
        self.year = year;
        Ok(())
    }

    /// Set the summary
    pub fn set_summary(&mut self, summary: impl Into<String>) -> Result<(), ValidationError> {
        let summary = summary.into();
        if summary.is_empty() {
            return Err(ValidationError::EmptySummary);
        }
        self.summary = summary;
        Ok(())
    }

    /// Point the review at another employee
    ///
    /// The employee must exist according to `employees`. Lookup failures are
    /// reported as database errors, unknown ids as validation errors.
    pub fn set_employee_id(
        &mut self,
        employee_id: i64,
        employees: &dyn EmployeeLookup,
    ) -> ModelResult<()> {
        if !employees.exists(employee_id)? {
            return Err(ValidationError::UnknownEmployee(employee_id).into());
        }
        self.employee_id = employee_id;
        Ok(())
    }

    pub(crate) fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }
}

/// Render a stored SQLite value for an error message
fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(n) => n.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Text(s) => format!("'{}'", s),
        Value::Blob(b) => format!("<{} byte blob>", b.len()),
    }
}

impl fmt::Display for Review {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = match self.id {
            Some(id) => id.to_string(),
            None => "None".to_string(),
        };
        write!(
            f,
            "<Review {}: {}, {}, Employee ID: {}>",
            id, self.year, self.summary, self.employee_id
        )
    }
}
