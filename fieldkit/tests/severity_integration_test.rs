//! Integration tests for the Severity classification of fieldkit errors
//!
//! Configuration mistakes (registry and mapper build errors, by-name lookups
//! that cannot be satisfied) are Critical. Data failures found while
//! validating or mapping an instance are Error.

use fieldkit::{MapperError, RegistryError, ValidationFailure};
use fieldkit_common::{CommonError, ErrorSeverity, Severity};

#[test]
fn test_severity_levels_are_distinct() {
    assert_ne!(ErrorSeverity::Warning, ErrorSeverity::Error);
    assert_ne!(ErrorSeverity::Error, ErrorSeverity::Critical);
    assert_ne!(ErrorSeverity::Warning, ErrorSeverity::Critical);
}

#[test]
fn test_registry_errors_are_critical() {
    let errors = vec![
        RegistryError::DuplicateField { name: "name".into() },
        RegistryError::BlankName { what: "Accessor" },
        RegistryError::InvalidArgument("fmtString".into()),
        RegistryError::Empty,
        RegistryError::NoLastAccessor {
            operation: "add_max_length",
        },
        RegistryError::InvalidMaxLength {
            name: "name".into(),
            max_length: 0,
        },
        RegistryError::UnknownField { name: "agee".into() },
        RegistryError::NotMutable { name: "id".into() },
        RegistryError::TypeMismatch {
            name: "age".into(),
            requested: "String",
            actual: "i32",
        },
    ];

    for error in errors {
        assert_eq!(
            error.severity(),
            ErrorSeverity::Critical,
            "Expected Critical severity for: {}",
            error
        );
    }
}

#[test]
fn test_mapper_build_errors_are_critical() {
    let errors = vec![
        MapperError::Unresolved {
            kind: "Accessor",
            entity: "ChildIso".into(),
            name: "agee".into(),
        },
        MapperError::DuplicateEntry { name: "age".into() },
        MapperError::Registry(RegistryError::Empty),
    ];

    for error in errors {
        assert_eq!(
            error.severity(),
            ErrorSeverity::Critical,
            "Expected Critical severity for: {}",
            error
        );
    }
}

#[test]
fn test_data_failures_are_errors() {
    let failures = vec![
        ValidationFailure::RequiredFieldMissing,
        ValidationFailure::ExceededMaxLength {
            max_length: 5,
            actual_length: 6,
        },
        ValidationFailure::templated("bad .|0|.", ["value"]),
        ValidationFailure::other("boom"),
    ];

    for failure in failures {
        assert_eq!(failure.severity(), ErrorSeverity::Error, "{failure}");
        let entry = MapperError::EntryFailed {
            name: "field".into(),
            failure,
        };
        assert_eq!(entry.severity(), ErrorSeverity::Error, "{entry}");
    }
}

#[test]
fn test_common_errors_are_critical() {
    let error = CommonError::blank_argument("fieldName");
    assert_eq!(error.severity(), ErrorSeverity::Critical);
    assert!(error.to_string().contains("fieldName"));
}
