/*!
 * Integration tests for the review identity map
 */

use anyhow::Result;
use std::sync::Arc;

use staff_reviews::database::DatabaseConnection;
use staff_reviews::employees::EmployeeRepository;
use staff_reviews::reviews::ReviewRepository;
use crate::common;
use crate::common::mock_employees::MockEmployees;

/// Repository over an in-memory reviews table validating against a mock
fn mock_backed_repository(ids: &[i64]) -> Result<(ReviewRepository, Arc<MockEmployees>)> {
    let mock = Arc::new(MockEmployees::with_ids(ids));
    let db = DatabaseConnection::new_in_memory()?;
    let reviews = ReviewRepository::new(db, mock.clone());
    reviews.create_table()?;
    Ok((reviews, mock))
}

#[test]
fn test_repeatedReads_shouldReturnSameInstance() -> Result<()> {
    let (employees, reviews) = common::in_memory_repositories()?;
    let lee = employees.create("Lee", "Manager")?.id().unwrap();
    let created = reviews.create(2023, "Great year", lee)?;
    let id = created.read().id().unwrap();

    let by_id = reviews.find_by_id(id)?.unwrap();
    let from_all = reviews.get_all()?.remove(0);
    let from_employee = reviews.get_reviews_by_employee_id(lee)?.remove(0);

    assert!(Arc::ptr_eq(&created, &by_id));
    assert!(Arc::ptr_eq(&created, &from_all));
    assert!(Arc::ptr_eq(&created, &from_employee));
    assert_eq!(reviews.cache_len(), 1);
    Ok(())
}

#[test]
fn test_read_shouldRefreshCachedInstanceFromRow() -> Result<()> {
    let (employees, reviews) = common::in_memory_repositories()?;
    let lee = employees.create("Lee", "Manager")?.id().unwrap();
    let handle = reviews.create(2023, "Original", lee)?;
    let id = handle.read().id().unwrap();

    // Another writer changes the row behind the cache's back
    reviews.connection().execute(|conn| {
        conn.execute(
            "UPDATE reviews SET summary = 'Changed elsewhere', year = 2025 WHERE id = ?1",
            [id],
        )?;
        Ok(())
    })?;

    reviews.find_by_id(id)?;

    let review = handle.read();
    assert_eq!(review.summary(), "Changed elsewhere");
    assert_eq!(review.year(), 2025);
    assert_eq!(review.id(), Some(id));
    Ok(())
}

#[test]
fn test_rowsWrittenElsewhere_shouldBeCachedOnFirstRead() -> Result<()> {
    let (employees, reviews) = common::in_memory_repositories()?;
    let lee = employees.create("Lee", "Manager")?.id().unwrap();

    reviews.connection().execute(|conn| {
        conn.execute(
            "INSERT INTO reviews (year, summary, employee_id) VALUES (2020, 'Imported', ?1)",
            [lee],
        )?;
        Ok(())
    })?;
    assert_eq!(reviews.cache_len(), 0);

    let first = reviews.get_all()?;
    let second = reviews.get_all()?;

    assert_eq!(reviews.cache_len(), 1);
    assert!(Arc::ptr_eq(&first[0], &second[0]));
    assert_eq!(first[0].read().to_string(), format!("<Review 1: 2020, Imported, Employee ID: {}>", lee));
    Ok(())
}

#[test]
fn test_findById_withMissingRow_shouldNotTouchCache() -> Result<()> {
    let (reviews, _mock) = mock_backed_repository(&[1])?;

    assert!(reviews.find_by_id(404)?.is_none());

    assert_eq!(reviews.cache_len(), 0);
    assert_eq!(reviews.cache_stats().hits + reviews.cache_stats().misses, 0);
    Ok(())
}

#[test]
fn test_cacheStats_shouldCountRepositoryReads() -> Result<()> {
    let (reviews, _mock) = mock_backed_repository(&[1])?;
    let handle = reviews.create(2023, "Great year", 1)?;
    let id = handle.read().id().unwrap();

    reviews.find_by_id(id)?;
    reviews.find_by_id(id)?;

    let stats = reviews.cache_stats();
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.misses, 0);
    Ok(())
}

#[test]
fn test_reads_shouldRevalidateEmployeeReference() -> Result<()> {
    let (reviews, mock) = mock_backed_repository(&[1])?;
    let handle = reviews.create(2023, "Great year", 1)?;
    let id = handle.read().id().unwrap();
    let before = mock.lookup_count();

    reviews.find_by_id(id)?;

    assert_eq!(mock.lookup_count(), before + 1);
    Ok(())
}

#[test]
fn test_clonedRepository_shouldShareIdentityMap() -> Result<()> {
    let (reviews, _mock) = mock_backed_repository(&[1])?;
    let other = reviews.clone();

    let handle = reviews.create(2023, "Great year", 1)?;
    let id = handle.read().id().unwrap();

    let found = other.find_by_id(id)?.unwrap();
    assert!(Arc::ptr_eq(&handle, &found));
    Ok(())
}

#[test]
fn test_separateRepositories_shouldKeepSeparateIdentityMaps() -> Result<()> {
    let db = DatabaseConnection::new_in_memory()?;
    let employees = EmployeeRepository::new(db.clone());
    employees.create_table()?;
    let lee = employees.create("Lee", "Manager")?.id().unwrap();

    let first = ReviewRepository::for_connection(db.clone());
    first.create_table()?;
    let second = ReviewRepository::for_connection(db);

    let handle = first.create(2023, "Great year", lee)?;
    let id = handle.read().id().unwrap();
    let found = second.find_by_id(id)?.unwrap();

    assert!(!Arc::ptr_eq(&handle, &found));
    assert_eq!(*handle.read(), *found.read());
    Ok(())
}
