/*!
 * Database connection management.
 *
 * This module handles SQLite connection creation and gives every repository
 * access to the same underlying connection.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::schema;
use crate::app_config::DatabaseConfig;

/// Default database filename
const DEFAULT_DB_FILENAME: &str = "staff_reviews.db";

/// Default database directory name under user's data directory
const DEFAULT_DB_DIRNAME: &str = "staff-reviews";

/// Path reported for in-memory databases
const IN_MEMORY_PATH: &str = ":memory:";

/// Shared database connection
///
/// Clones share one SQLite connection, so employees and reviews written
/// through different repositories are immediately visible to each other.
#[derive(Clone)]
pub struct DatabaseConnection {
    /// Path to the database file
    db_path: PathBuf,
    /// Connection shared between clones
    connection: Arc<Mutex<Connection>>,
}

impl DatabaseConnection {
    /// Open the database described by the configuration
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        let db = if config.in_memory {
            Self::new_in_memory()?
        } else {
            let path = match &config.path {
                Some(path) => path.clone(),
                None => Self::default_database_path()?,
            };
            Self::new(path)?
        };

        db.execute(|conn| schema::configure_connection(conn, config.enforce_foreign_keys))?;
        Ok(db)
    }

    /// Create a new database connection at the specified path
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_path = db_path.as_ref().to_path_buf();

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory: {:?}", parent)
                })?;
            }
        }

        info!("Opening database at: {:?}", db_path);

        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open database: {:?}", db_path))?;

        Ok(Self {
            db_path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        debug!("Creating in-memory database");

        let conn =
            Connection::open_in_memory().context("Failed to create in-memory database")?;

        Ok(Self {
            db_path: PathBuf::from(IN_MEMORY_PATH),
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Get the default database path
    pub fn default_database_path() -> Result<PathBuf> {
        let base_dir = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

        Ok(base_dir.join(DEFAULT_DB_DIRNAME).join(DEFAULT_DB_FILENAME))
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// Whether this connection points at an in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.db_path.as_os_str() == IN_MEMORY_PATH
    }

    /// Execute a database operation with the connection
    ///
    /// The connection is locked for the duration of the closure. Every
    /// statement runs in autocommit mode, so its effects are durable as soon
    /// as it returns.
    pub fn execute<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.connection.lock();
        f(&conn)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DatabaseStats> {
        self.execute(|conn| {
            let employee_count = count_rows(conn, schema::EMPLOYEES_TABLE)?;
            let review_count = count_rows(conn, schema::REVIEWS_TABLE)?;

            let file_size = if self.is_in_memory() {
                0
            } else {
                std::fs::metadata(&self.db_path)
                    .map(|m| m.len())
                    .unwrap_or(0)
            };

            Ok(DatabaseStats {
                employee_count,
                review_count,
                file_size_bytes: file_size,
            })
        })
    }
}

/// Count rows of a table, treating a missing table as empty
fn count_rows(conn: &Connection, table: &str) -> Result<i64> {
    if !schema::table_exists(conn, table)? {
        return Ok(0);
    }

    let count: i64 = conn
        .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
        .with_context(|| format!("Failed to count rows of '{}'", table))?;
    Ok(count)
}

/// Database statistics
#[derive(Debug, Clone)]
pub struct DatabaseStats {
    /// Number of stored employees
    pub employee_count: i64,
    /// Number of stored reviews
    pub review_count: i64,
    /// Database file size in bytes
    pub file_size_bytes: u64,
}

impl std::fmt::Display for DatabaseStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Employees: {}, Reviews: {}, Size: {} KB",
            self.employee_count,
            self.review_count,
            self.file_size_bytes / 1024
        )
    }
}
