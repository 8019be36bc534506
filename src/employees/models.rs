/*!
 * Employee entity model.
 */

use serde::Serialize;
use std::fmt;

use crate::errors::ValidationError;

/// An employee that reviews can be written about
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    id: Option<i64>,
    name: String,
    job_title: String,
}

impl Employee {
    /// Create an unsaved employee
    pub fn new(
        name: impl Into<String>,
        job_title: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let mut employee = Self {
            id: None,
            name: String::new(),
            job_title: String::new(),
        };
        employee.set_name(name)?;
        employee.set_job_title(job_title)?;
        Ok(employee)
    }

    /// Row id, `None` until saved
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn job_title(&self) -> &str {
        &self.job_title
    }

    /// Set the name; it must not be empty
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        self.name = name;
        Ok(())
    }

    /// Set the job title; it must not be empty
    pub fn set_job_title(&mut self, job_title: impl Into<String>) -> Result<(), ValidationError> {
        let job_title = job_title.into();
        if job_title.is_empty() {
            return Err(ValidationError::EmptyJobTitle);
        }
        self.job_title = job_title;
        Ok(())
    }

    pub(crate) fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Employee {}: {}, {}>", id, self.name, self.job_title),
            None => write!(f, "<Employee None: {}, {}>", self.name, self.job_title),
        }
    }
}
