/*!
 * Mock employee lookup for testing
 *
 * Answers lookups from a fixed set of ids without touching a database and
 * records how often it was asked.
 */

use anyhow::{anyhow, Result};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use staff_reviews::employees::{Employee, EmployeeLookup};

/// Lookup backed by an in-memory id set
#[derive(Debug, Default)]
pub struct MockEmployees {
    known_ids: HashSet<i64>,
    lookups: AtomicUsize,
    should_fail: AtomicBool,
}

impl MockEmployees {
    /// Create a lookup that knows the given ids
    pub fn with_ids(ids: &[i64]) -> Self {
        Self {
            known_ids: ids.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Number of lookups performed so far
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Make every following lookup fail
    pub fn fail_lookups(&self) {
        self.should_fail.store(true, Ordering::SeqCst);
    }
}

impl EmployeeLookup for MockEmployees {
    fn find_by_id(&self, id: i64) -> Result<Option<Employee>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        if self.should_fail.load(Ordering::SeqCst) {
            return Err(anyhow!("mock employee lookup failure"));
        }

        if self.known_ids.contains(&id) {
            Ok(Some(Employee::new(format!("Employee {}", id), "Staff")?))
        } else {
            Ok(None)
        }
    }
}
