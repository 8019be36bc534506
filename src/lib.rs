/*!
 * # staff-reviews
 *
 * Active-record style persistence of employee performance reviews in SQLite.
 *
 * ## Features
 *
 * - Validated `Review` entities (year, summary, employee reference)
 * - Explicit table lifecycle (create/drop) and row-level CRUD
 * - Identity map: one live instance per stored row
 * - Employee records used to validate review references
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `database`: Shared SQLite connection and table definitions
 * - `employees`: Employee entity, repository and lookup trait
 * - `reviews`: Review entity, repository and identity map
 * - `errors`: Custom error types for the library
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod database;
pub mod employees;
pub mod errors;
pub mod reviews;

// Re-export main types for easier usage
pub use app_config::Config;
pub use database::DatabaseConnection;
pub use employees::{Employee, EmployeeLookup, EmployeeRepository};
pub use errors::{ModelError, ModelResult, ValidationError};
pub use reviews::{Review, ReviewHandle, ReviewRepository};
