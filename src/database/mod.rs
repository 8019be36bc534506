/*!
 * Database module for SQLite persistence of employees and reviews.
 *
 * This module provides:
 * - A shared connection wrapper used by every repository
 * - Table definitions and create/drop helpers
 */

pub mod connection;
pub mod schema;

// Re-export main types
pub use connection::{DatabaseConnection, DatabaseStats};
