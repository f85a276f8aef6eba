//! Data validation failures.
//!
//! Field validators, cross-field validators, value generators, and mapping
//! transformers report problems by returning a [`ValidationFailure`]. The
//! registry turns each one into a [`FieldError`](crate::FieldError) keyed by
//! the name of whatever produced it.

use fieldkit_common::{ErrorSeverity, Severity, TemplatedMessage};
use thiserror::Error;

/// Template of a required field that was absent or blank.
pub const REQUIRED_FIELD_MISSING_MSG: &str = "required field was null (or insignificant)";

/// Leading text of an exceeded max length template.
pub const EXCEEDED_MAX_LENGTH_PREFIX: &str = "exceeded Max Length ";

/// Template of an exceeded max length, with `(max, actual)` as values.
pub const EXCEEDED_MAX_LENGTH_MSG: &str = "exceeded Max Length (.|0|.), length was: .|1|.";

/// Result type returned by validation hooks
pub type Validation = std::result::Result<(), ValidationFailure>;

/// Why a value, instance, or mapping entry is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    /// A required field was absent or insignificant
    #[error("required field was null (or insignificant)")]
    RequiredFieldMissing,

    /// Measured length is longer than the configured maximum
    #[error("exceeded Max Length ({max_length}), length was: {actual_length}")]
    ExceededMaxLength {
        max_length: usize,
        actual_length: usize,
    },

    /// Domain failure carrying its own template
    #[error("{0}")]
    Templated(TemplatedMessage),

    /// Any other failure, reported with its raw message and no template values
    #[error("{0}")]
    Other(String),
}

impl ValidationFailure {
    /// A templated failure with indexed values.
    pub fn templated<I, S>(fmt_string: impl Into<String>, indexed_fmt_data: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValidationFailure::Templated(TemplatedMessage::with_data(fmt_string, indexed_fmt_data))
    }

    /// An untemplated failure.
    pub fn other(message: impl Into<String>) -> Self {
        ValidationFailure::Other(message.into())
    }

    /// The message handed to error reporters.
    pub fn into_templated_message(self) -> TemplatedMessage {
        match self {
            ValidationFailure::RequiredFieldMissing => {
                TemplatedMessage::new(REQUIRED_FIELD_MISSING_MSG)
            }
            ValidationFailure::ExceededMaxLength {
                max_length,
                actual_length,
            } => TemplatedMessage::with_data(
                EXCEEDED_MAX_LENGTH_MSG,
                [max_length.to_string(), actual_length.to_string()],
            ),
            ValidationFailure::Templated(message) => message,
            ValidationFailure::Other(message) => TemplatedMessage::new(message),
        }
    }
}

impl From<TemplatedMessage> for ValidationFailure {
    fn from(message: TemplatedMessage) -> Self {
        ValidationFailure::Templated(message)
    }
}

impl From<String> for ValidationFailure {
    fn from(message: String) -> Self {
        ValidationFailure::Other(message)
    }
}

impl From<&str> for ValidationFailure {
    fn from(message: &str) -> Self {
        ValidationFailure::Other(message.to_string())
    }
}

impl Severity for ValidationFailure {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exceeded_max_length_message() {
        let failure = ValidationFailure::ExceededMaxLength {
            max_length: 5,
            actual_length: 6,
        };
        assert_eq!(failure.to_string(), "exceeded Max Length (5), length was: 6");

        let message = failure.into_templated_message();
        assert_eq!(message.fmt_string(), EXCEEDED_MAX_LENGTH_MSG);
        assert!(message.fmt_string().starts_with(EXCEEDED_MAX_LENGTH_PREFIX));
        assert_eq!(message.indexed_fmt_data(), ["5", "6"]);
        assert_eq!(message.to_string(), "exceeded Max Length (5), length was: 6");
    }

    #[test]
    fn test_required_missing_message() {
        let failure = ValidationFailure::RequiredFieldMissing;
        assert_eq!(failure.to_string(), REQUIRED_FIELD_MISSING_MSG);
        let message = failure.into_templated_message();
        assert_eq!(message.fmt_string(), REQUIRED_FIELD_MISSING_MSG);
        assert!(message.indexed_fmt_data().is_empty());
    }

    #[test]
    fn test_other_keeps_raw_message_without_values() {
        let message = ValidationFailure::from("index out of range").into_templated_message();
        assert_eq!(message.fmt_string(), "index out of range");
        assert!(message.indexed_fmt_data().is_empty());
    }

    #[test]
    fn test_templated_passes_through() {
        let failure = ValidationFailure::templated("age may not be negative, but was: .|0|.", ["-1"]);
        assert_eq!(failure.to_string(), "age may not be negative, but was: -1");
        let message = failure.into_templated_message();
        assert_eq!(message.indexed_fmt_data(), ["-1"]);
    }
}
