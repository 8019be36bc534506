/*!
 * Employee entity and lookup collaborator.
 *
 * Reviews reference employees by id; this module owns the `employees` table
 * and answers the "does employee N exist?" question for review validation.
 */

pub mod models;
pub mod repository;

// Re-export main types
pub use models::Employee;
pub use repository::{EmployeeLookup, EmployeeRepository};
