/*!
 * Tests for error types and conversions
 */

use staff_reviews::errors::{ModelError, ValidationError};

#[test]
fn test_validationError_invalidYear_shouldDisplayRuleAndValue() {
    let display = format!("{}", ValidationError::InvalidYear(1999));
    assert!(display.contains("Year must be an integer greater than or equal to 2000"));
    assert!(display.contains("1999"));
}

#[test]
fn test_validationError_emptySummary_shouldDisplayCorrectly() {
    let display = format!("{}", ValidationError::EmptySummary);
    assert_eq!(display, "Summary must be a non-empty string");
}

#[test]
fn test_validationError_unknownEmployee_shouldDisplayCorrectly() {
    let display = format!("{}", ValidationError::UnknownEmployee(7));
    assert!(display.contains("employee_id must reference an existing employee in the database"));
    assert!(display.contains('7'));
}

#[test]
fn test_validationError_nonIntegerStoredValues_shouldReuseAttributeRules() {
    let year = format!("{}", ValidationError::NonIntegerYear("'twenty'".to_string()));
    let employee = format!("{}", ValidationError::NonIntegerEmployeeId("NULL".to_string()));

    assert!(year.starts_with("Year must be an integer greater than or equal to 2000"));
    assert!(year.contains("'twenty'"));
    assert!(employee.starts_with("employee_id must reference an existing employee"));
    assert!(employee.contains("NULL"));
}

#[test]
fn test_modelError_fromValidationError_shouldWrapCorrectly() {
    let error: ModelError = ValidationError::EmptySummary.into();

    assert_eq!(error.as_validation(), Some(&ValidationError::EmptySummary));
    assert!(format!("{}", error).starts_with("Validation error:"));
}

#[test]
fn test_modelError_fromAnyhow_shouldBecomeDatabaseError() {
    let error: ModelError = anyhow::anyhow!("no such table: reviews").into();

    assert!(matches!(error, ModelError::Database(ref message) if message.contains("no such table")));
    assert_eq!(error.as_validation(), None);
}

#[test]
fn test_modelError_fromRusqlite_shouldBecomeDatabaseError() {
    let error: ModelError = rusqlite::Error::QueryReturnedNoRows.into();
    assert!(matches!(error, ModelError::Database(_)));
}

#[test]
fn test_modelError_notPersisted_shouldNameEntity() {
    let display = format!("{}", ModelError::NotPersisted("Review"));
    assert_eq!(display, "Review has not been saved to the database");
}
