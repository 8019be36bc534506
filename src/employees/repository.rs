/*!
 * Repository for the `employees` table.
 */

use anyhow::Result;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::Employee;
use crate::database::{schema, DatabaseConnection};
use crate::errors::{ModelError, ModelResult};

/// Lookup used by review validation to check that an employee exists
pub trait EmployeeLookup: Send + Sync {
    /// Find an employee by primary key
    fn find_by_id(&self, id: i64) -> Result<Option<Employee>>;

    /// Check whether an employee with this primary key exists
    fn exists(&self, id: i64) -> Result<bool> {
        Ok(self.find_by_id(id)?.is_some())
    }
}

/// Raw column values of an employees row
type EmployeeRow = (i64, String, String);

/// Repository for employee records
#[derive(Clone)]
pub struct EmployeeRepository {
    /// Database connection
    db: DatabaseConnection,
}

impl EmployeeRepository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        Ok(Self::new(DatabaseConnection::new_in_memory()?))
    }

    /// Get the underlying connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Create the employees table
    pub fn create_table(&self) -> ModelResult<()> {
        self.db.execute(schema::create_employees_table)?;
        Ok(())
    }

    /// Drop the employees table
    pub fn drop_table(&self) -> ModelResult<()> {
        self.db.execute(schema::drop_employees_table)?;
        Ok(())
    }

    /// Insert the employee and assign its new row id
    pub fn save(&self, employee: &mut Employee) -> ModelResult<()> {
        let id = self.db.execute(|conn| {
            conn.execute(
                "INSERT INTO employees (name, job_title) VALUES (?1, ?2)",
                params![employee.name(), employee.job_title()],
            )?;
            Ok(conn.last_insert_rowid())
        })?;

        employee.set_id(Some(id));
        debug!("Saved {}", employee);
        Ok(())
    }

    /// Create and save a new employee
    pub fn create(&self, name: &str, job_title: &str) -> ModelResult<Employee> {
        let mut employee = Employee::new(name, job_title)?;
        self.save(&mut employee)?;
        Ok(employee)
    }

    /// Write the employee's attributes back to its row
    pub fn update(&self, employee: &Employee) -> ModelResult<()> {
        let id = employee.id().ok_or(ModelError::NotPersisted("Employee"))?;

        self.db.execute(|conn| {
            conn.execute(
                "UPDATE employees SET name = ?1, job_title = ?2 WHERE id = ?3",
                params![employee.name(), employee.job_title(), id],
            )?;
            Ok(())
        })?;

        debug!("Updated {}", employee);
        Ok(())
    }

    /// Delete the employee's row and clear its id
    pub fn delete(&self, employee: &mut Employee) -> ModelResult<()> {
        let id = employee.id().ok_or(ModelError::NotPersisted("Employee"))?;

        self.db.execute(|conn| {
            conn.execute("DELETE FROM employees WHERE id = ?1", [id])?;
            Ok(())
        })?;

        employee.set_id(None);
        debug!("Deleted employee {}", id);
        Ok(())
    }

    /// Find an employee by primary key
    pub fn find_by_id(&self, id: i64) -> ModelResult<Option<Employee>> {
        let row = self.db.execute(|conn| Self::find_row(conn, id))?;
        row.map(Self::employee_from_row).transpose()
    }

    /// Find the first employee with the given name
    pub fn find_by_name(&self, name: &str) -> ModelResult<Option<Employee>> {
        let row: Option<EmployeeRow> = self.db.execute(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, name, job_title FROM employees WHERE name = ?1 ORDER BY id LIMIT 1",
                    [name],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                )
                .optional()?;
            Ok(row)
        })?;
        row.map(Self::employee_from_row).transpose()
    }

    /// List every employee ordered by id
    pub fn get_all(&self) -> ModelResult<Vec<Employee>> {
        let rows: Vec<EmployeeRow> = self.db.execute(|conn| {
            let mut stmt = conn.prepare("SELECT id, name, job_title FROM employees ORDER BY id")?;
            let rows = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
                .collect::<rusqlite::Result<Vec<EmployeeRow>>>()?;
            Ok(rows)
        })?;

        rows.into_iter().map(Self::employee_from_row).collect()
    }

    fn find_row(conn: &Connection, id: i64) -> Result<Option<EmployeeRow>> {
        let row = conn
            .query_row(
                "SELECT id, name, job_title FROM employees WHERE id = ?1",
                [id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        Ok(row)
    }

    fn employee_from_row((id, name, job_title): EmployeeRow) -> ModelResult<Employee> {
        let mut employee = Employee::new(name, job_title)?;
        employee.set_id(Some(id));
        Ok(employee)
    }
}

impl EmployeeLookup for EmployeeRepository {
    fn find_by_id(&self, id: i64) -> Result<Option<Employee>> {
        EmployeeRepository::find_by_id(self, id).map_err(anyhow::Error::from)
    }

    fn exists(&self, id: i64) -> Result<bool> {
        self.db.execute(|conn| {
            let found: Option<i64> = conn
                .query_row("SELECT id FROM employees WHERE id = ?1", [id], |row| row.get(0))
                .optional()?;
            Ok(found.is_some())
        })
    }
}
