/*!
 * Tests for review attribute validation
 */

use staff_reviews::errors::{ModelError, ValidationError};
use staff_reviews::reviews::Review;

use crate::common::mock_employees::MockEmployees;

#[test]
fn test_new_withValidAttributes_shouldCheckEmployeeOnce() {
    let employees = MockEmployees::with_ids(&[1]);

    let review = Review::new(2021, "Met every goal", 1, &employees).unwrap();

    assert_eq!(review.year(), 2021);
    assert_eq!(review.summary(), "Met every goal");
    assert_eq!(review.employee_id(), 1);
    assert_eq!(review.id(), None);
    assert_eq!(employees.lookup_count(), 1);
}

#[test]
fn test_new_withInvalidYear_shouldFailBeforeEmployeeLookup() {
    let employees = MockEmployees::with_ids(&[1]);

    let err = Review::new(1980, "Met every goal", 1, &employees).unwrap_err();

    assert_eq!(err.as_validation(), Some(&ValidationError::InvalidYear(1980)));
    assert_eq!(employees.lookup_count(), 0);
}

#[test]
fn test_new_withNegativeYear_shouldFail() {
    let employees = MockEmployees::with_ids(&[1]);
    assert!(Review::new(-2023, "Met every goal", 1, &employees).is_err());
}

#[test]
fn test_setSummary_withEmptyString_shouldKeepPreviousSummary() {
    let employees = MockEmployees::with_ids(&[1]);
    let mut review = Review::new(2021, "Met every goal", 1, &employees).unwrap();

    assert_eq!(review.set_summary(""), Err(ValidationError::EmptySummary));
    assert_eq!(review.summary(), "Met every goal");

    review.set_summary(String::from("Exceeded expectations")).unwrap();
    assert_eq!(review.summary(), "Exceeded expectations");
}

#[test]
fn test_setSummary_withWhitespace_shouldBeAccepted() {
    let employees = MockEmployees::with_ids(&[1]);
    let mut review = Review::new(2021, "Met every goal", 1, &employees).unwrap();

    assert!(review.set_summary(" ").is_ok());
}

#[test]
fn test_setEmployeeId_withUnknownId_shouldFail() {
    let employees = MockEmployees::with_ids(&[1, 2]);
    let mut review = Review::new(2021, "Met every goal", 1, &employees).unwrap();

    let err = review.set_employee_id(5, &employees).unwrap_err();

    assert_eq!(err.as_validation(), Some(&ValidationError::UnknownEmployee(5)));
    assert_eq!(review.employee_id(), 1);
}

#[test]
fn test_setEmployeeId_withFailingLookup_shouldPropagateDatabaseError() {
    let employees = MockEmployees::with_ids(&[1, 2]);
    let mut review = Review::new(2021, "Met every goal", 1, &employees).unwrap();

    employees.fail_lookups();
    let err = review.set_employee_id(2, &employees).unwrap_err();

    assert!(matches!(err, ModelError::Database(ref message) if message.contains("mock employee lookup failure")));
}

#[test]
fn test_display_forUnsavedReview_shouldShowNoneId() {
    let employees = MockEmployees::with_ids(&[4]);
    let review = Review::new(2022, "Solid", 4, &employees).unwrap();

    assert_eq!(review.to_string(), "<Review None: 2022, Solid, Employee ID: 4>");
}

#[test]
fn test_serialize_shouldExposeAllColumns() {
    let employees = MockEmployees::with_ids(&[4]);
    let review = Review::new(2022, "Solid", 4, &employees).unwrap();

    let json = serde_json::to_value(&review).unwrap();

    assert_eq!(json["id"], serde_json::Value::Null);
    assert_eq!(json["year"], 2022);
    assert_eq!(json["summary"], "Solid");
    assert_eq!(json["employee_id"], 4);
}
