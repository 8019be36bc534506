/*!
 * Repository layer for the `reviews` table.
 *
 * Rows are mapped to shared `ReviewHandle`s through an identity map: every
 * read of a given primary key yields the same handle, refreshed with the
 * values currently stored in the table.
 */

use anyhow::Result;
use log::{debug, info};
use parking_lot::RwLock;
use rusqlite::types::Value;
use rusqlite::{params, OptionalExtension};
use std::sync::Arc;

use super::identity_map::{IdentityMap, IdentityMapStats, ReviewHandle};
use super::models::Review;
use crate::database::{schema, DatabaseConnection};
use crate::employees::{EmployeeLookup, EmployeeRepository};
use crate::errors::{ModelError, ModelResult};

/// Raw column values of a reviews row: id, year, summary, employee_id
///
/// Attribute columns stay untyped until validation, since other writers may
/// have stored NULL or values of another type.
type ReviewRow = (i64, Value, Value, Value);

const SELECT_COLUMNS: &str = "SELECT id, year, summary, employee_id FROM reviews";

/// Repository for review records
///
/// Clones share the connection and the identity map.
#[derive(Clone)]
pub struct ReviewRepository {
    /// Database connection
    db: DatabaseConnection,
    /// Collaborator used to validate employee references
    employees: Arc<dyn EmployeeLookup>,
    /// One live instance per stored row
    identity: Arc<IdentityMap>,
}

impl ReviewRepository {
    /// Create a repository validating employee ids through `employees`
    pub fn new(db: DatabaseConnection, employees: Arc<dyn EmployeeLookup>) -> Self {
        Self {
            db,
            employees,
            identity: Arc::new(IdentityMap::new()),
        }
    }

    /// Create a repository whose employee lookup reads the `employees`
    /// table of the same database
    pub fn for_connection(db: DatabaseConnection) -> Self {
        let employees = Arc::new(EmployeeRepository::new(db.clone()));
        Self::new(db, employees)
    }

    /// Get the underlying connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Get the employee lookup used for validation
    pub fn employees(&self) -> &dyn EmployeeLookup {
        self.employees.as_ref()
    }

    // =========================================================================
    // Table lifecycle
    // =========================================================================

    /// Create the reviews table
    pub fn create_table(&self) -> ModelResult<()> {
        self.db.execute(schema::create_reviews_table)?;
        Ok(())
    }

    /// Drop the reviews table
    ///
    /// Cached instances no longer correspond to any row, so the identity
    /// map is cleared as well.
    pub fn drop_table(&self) -> ModelResult<()> {
        self.db.execute(schema::drop_reviews_table)?;
        self.identity.clear();
        Ok(())
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Build an unsaved review validated against this repository's employees
    pub fn build(&self, year: i64, summary: &str, employee_id: i64) -> ModelResult<Review> {
        Review::new(year, summary, employee_id, self.employees())
    }

    /// Insert the review as a new row and register it in the identity map
    pub fn save(&self, mut review: Review) -> ModelResult<ReviewHandle> {
        let id = self.db.execute(|conn| {
            conn.execute(
                "INSERT INTO reviews (year, summary, employee_id) VALUES (?1, ?2, ?3)",
                params![review.year(), review.summary(), review.employee_id()],
            )?;
            Ok(conn.last_insert_rowid())
        })?;

        review.set_id(Some(id));
        debug!("Saved {}", review);

        let handle = Arc::new(RwLock::new(review));
        self.identity.insert(id, handle.clone());
        Ok(handle)
    }

    /// Build and save a new review
    pub fn create(&self, year: i64, summary: &str, employee_id: i64) -> ModelResult<ReviewHandle> {
        let review = self.build(year, summary, employee_id)?;
        self.save(review)
    }

    /// Write the review's current attributes to its row
    pub fn update(&self, handle: &ReviewHandle) -> ModelResult<()> {
        let review = handle.read().clone();
        let id = review.id().ok_or(ModelError::NotPersisted("Review"))?;

        let changed = self.db.execute(|conn| {
            Ok(conn.execute(
                "UPDATE reviews SET year = ?1, summary = ?2, employee_id = ?3 WHERE id = ?4",
                params![review.year(), review.summary(), review.employee_id(), id],
            )?)
        })?;

        debug!("Updated {} ({} row(s))", review, changed);
        Ok(())
    }

    /// Apply `edit` to a copy of the review, then store the result
    ///
    /// Either every change in `edit` is kept and written, or the review is
    /// left exactly as it was.
    pub fn modify<F>(&self, handle: &ReviewHandle, edit: F) -> ModelResult<()>
    where
        F: FnOnce(&mut Review) -> ModelResult<()>,
    {
        let mut edited = handle.read().clone();
        if edited.id().is_none() {
            return Err(ModelError::NotPersisted("Review"));
        }
        edit(&mut edited)?;

        *handle.write() = edited;
        self.update(handle)
    }

    /// Delete the review's row, forget the cached instance, and clear its id
    pub fn delete(&self, handle: &ReviewHandle) -> ModelResult<()> {
        let mut review = handle.write();
        let id = review.id().ok_or(ModelError::NotPersisted("Review"))?;

        self.db.execute(|conn| {
            conn.execute("DELETE FROM reviews WHERE id = ?1", [id])?;
            Ok(())
        })?;

        // A detached copy may have been passed in; clear the cached one too
        if let Some(cached) = self.identity.remove(id) {
            if !Arc::ptr_eq(&cached, handle) {
                cached.write().set_id(None);
            }
        }
        review.set_id(None);
        info!("Deleted review {}", id);
        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Find the review stored under a primary key
    pub fn find_by_id(&self, id: i64) -> ModelResult<Option<ReviewHandle>> {
        let row: Option<ReviewRow> = self.db.execute(|conn| {
            let row = conn
                .query_row(
                    &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                    [id],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
                )
                .optional()?;
            Ok(row)
        })?;

        row.map(|row| self.instance_from_row(row)).transpose()
    }

    /// List every review written about an employee
    pub fn get_reviews_by_employee_id(&self, employee_id: i64) -> ModelResult<Vec<ReviewHandle>> {
        let rows = self.db.execute(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{} WHERE employee_id = ?1 ORDER BY id",
                SELECT_COLUMNS
            ))?;
            let rows = stmt
                .query_map([employee_id], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
                })?
                .collect::<rusqlite::Result<Vec<ReviewRow>>>()?;
            Ok(rows)
        })?;

        self.instances_from_rows(rows)
    }

    /// List every stored review
    pub fn get_all(&self) -> ModelResult<Vec<ReviewHandle>> {
        let rows = self.db.execute(|conn| {
            let mut stmt = conn.prepare(&format!("{} ORDER BY id", SELECT_COLUMNS))?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
                })?
                .collect::<rusqlite::Result<Vec<ReviewRow>>>()?;
            Ok(rows)
        })?;

        self.instances_from_rows(rows)
    }

    // =========================================================================
    // Identity map
    // =========================================================================

    /// Cached instance for a primary key, without touching the database
    pub fn cached(&self, id: i64) -> Option<ReviewHandle> {
        self.identity.get(id)
    }

    /// Number of cached instances
    pub fn cache_len(&self) -> usize {
        self.identity.len()
    }

    /// Identity map lookup counters
    pub fn cache_stats(&self) -> IdentityMapStats {
        self.identity.stats()
    }

    /// Map a row to its single in-memory instance
    ///
    /// The row is validated as a whole before anything is cached; a cached
    /// instance is then overwritten with the stored values, discarding
    /// unsaved local edits.
    fn instance_from_row(&self, (id, year, summary, employee_id): ReviewRow) -> ModelResult<ReviewHandle> {
        let fresh = Review::from_row(id, &year, &summary, &employee_id, self.employees())?;

        if let Some(handle) = self.identity.get(id) {
            *handle.write() = fresh;
            return Ok(handle);
        }

        let handle = Arc::new(RwLock::new(fresh));
        self.identity.insert(id, handle.clone());
        Ok(handle)
    }

    fn instances_from_rows(&self, rows: Vec<ReviewRow>) -> ModelResult<Vec<ReviewHandle>> {
        rows.into_iter()
            .map(|row| self.instance_from_row(row))
            .collect()
    }
}

/// Open a repository pair over one connection and make sure both tables exist
pub fn open_repositories(db: DatabaseConnection) -> Result<(EmployeeRepository, ReviewRepository)> {
    let employees = EmployeeRepository::new(db.clone());
    let reviews = ReviewRepository::new(db, Arc::new(employees.clone()));

    employees.create_table()?;
    reviews.create_table()?;

    Ok((employees, reviews))
}
