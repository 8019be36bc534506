/*!
 * Identity map for persisted reviews.
 *
 * Keeps exactly one in-memory instance per stored row so that every read of
 * the same primary key hands out the same handle.
 */

use log::{debug, trace};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::models::Review;

/// Shared handle to a review instance
pub type ReviewHandle = Arc<RwLock<Review>>;

/// Lookup counters of an identity map
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IdentityMapStats {
    /// Lookups that found a cached instance
    pub hits: usize,
    /// Lookups that found nothing
    pub misses: usize,
}

impl IdentityMapStats {
    /// Fraction of lookups that were hits
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

/// Map from primary key to the single live instance for that row
#[derive(Default)]
pub struct IdentityMap {
    entries: RwLock<HashMap<i64, ReviewHandle>>,
    stats: RwLock<IdentityMapStats>,
}

impl IdentityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached instance for a primary key
    pub fn get(&self, id: i64) -> Option<ReviewHandle> {
        let found = self.entries.read().get(&id).cloned();

        let mut stats = self.stats.write();
        if found.is_some() {
            stats.hits += 1;
            trace!("Identity map hit for review {}", id);
        } else {
            stats.misses += 1;
            trace!("Identity map miss for review {}", id);
        }

        found
    }

    /// Register an instance under its primary key
    pub fn insert(&self, id: i64, handle: ReviewHandle) {
        self.entries.write().insert(id, handle);
        debug!("Cached review {}", id);
    }

    /// Forget the instance for a primary key
    pub fn remove(&self, id: i64) -> Option<ReviewHandle> {
        self.entries.write().remove(&id)
    }

    /// Forget every instance and reset the counters
    pub fn clear(&self) {
        self.entries.write().clear();
        *self.stats.write() = IdentityMapStats::default();
        debug!("Review identity map cleared");
    }

    pub fn contains(&self, id: i64) -> bool {
        self.entries.read().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn stats(&self) -> IdentityMapStats {
        *self.stats.read()
    }
}
