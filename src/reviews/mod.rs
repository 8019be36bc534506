/*!
 * Review entity manager.
 *
 * This module provides:
 * - The validated `Review` model
 * - Table lifecycle and row-level CRUD for the `reviews` table
 * - The identity map that keeps one instance per stored row
 */

pub mod identity_map;
pub mod models;
pub mod repository;

// Re-export main types
pub use identity_map::{IdentityMap, IdentityMapStats, ReviewHandle};
pub use models::Review;
pub use repository::{open_repositories, ReviewRepository};
