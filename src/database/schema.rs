/*!
 * Table definitions for employees and reviews.
 *
 * Tables are created and dropped explicitly by their repositories; opening a
 * connection never touches the schema.
 */

use anyhow::{Context, Result};
use log::info;
use rusqlite::Connection;

/// Name of the employees table
pub const EMPLOYEES_TABLE: &str = "employees";

/// Name of the reviews table
pub const REVIEWS_TABLE: &str = "reviews";

const CREATE_EMPLOYEES_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS employees (
        id INTEGER PRIMARY KEY,
        name TEXT,
        job_title TEXT
    )
"#;

const CREATE_REVIEWS_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS reviews (
        id INTEGER PRIMARY KEY,
        year INTEGER,
        summary TEXT,
        employee_id INTEGER,
        FOREIGN KEY (employee_id) REFERENCES employees(id)
    )
"#;

/// Apply per-connection settings
pub fn configure_connection(conn: &Connection, enforce_foreign_keys: bool) -> Result<()> {
    let pragma = if enforce_foreign_keys {
        "PRAGMA foreign_keys=ON;"
    } else {
        "PRAGMA foreign_keys=OFF;"
    };
    conn.execute_batch(pragma)
        .context("Failed to configure foreign key enforcement")?;
    Ok(())
}

/// Create the employees table if it does not exist
pub fn create_employees_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_EMPLOYEES_SQL)
        .context("Failed to create employees table")?;
    info!("Table '{}' is ready", EMPLOYEES_TABLE);
    Ok(())
}

/// Drop the employees table if it exists
pub fn drop_employees_table(conn: &Connection) -> Result<()> {
    conn.execute_batch("DROP TABLE IF EXISTS employees;")
        .context("Failed to drop employees table")?;
    info!("Table '{}' dropped", EMPLOYEES_TABLE);
    Ok(())
}

/// Create the reviews table if it does not exist
pub fn create_reviews_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_REVIEWS_SQL)
        .context("Failed to create reviews table")?;
    info!("Table '{}' is ready", REVIEWS_TABLE);
    Ok(())
}

/// Drop the reviews table if it exists
pub fn drop_reviews_table(conn: &Connection) -> Result<()> {
    conn.execute_batch("DROP TABLE IF EXISTS reviews;")
        .context("Failed to drop reviews table")?;
    info!("Table '{}' dropped", REVIEWS_TABLE);
    Ok(())
}

/// Check whether a table exists
pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
            [table],
            |row| row.get(0),
        )
        .with_context(|| format!("Failed to check existence of table '{}'", table))?;
    Ok(exists)
}
