//! Significance helpers.
//!
//! A text value is *significant* when it contains at least one
//! non-whitespace character. Blank text is treated the same as an absent
//! value by required-field checks.

use crate::error::{CommonError, Result};

/// True if `value` has any non-whitespace content.
pub fn is_significant(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Trim `value`, collapsing blank text to `None`.
///
/// Suitable as a field normalizer for `Option<String>` fields.
pub fn value_or_none(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == value.len() {
        Some(value)
    } else {
        Some(trimmed.to_string())
    }
}

/// Assert a construction-time argument is significant, returning it trimmed.
///
/// `name` identifies the argument in the error.
pub fn assert_argument(name: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CommonError::blank_argument(name));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_significant() {
        assert!(is_significant("x"));
        assert!(is_significant("  x "));
        assert!(!is_significant(""));
        assert!(!is_significant(" \t\n"));
    }

    #[test]
    fn test_value_or_none() {
        assert_eq!(value_or_none(None), None);
        assert_eq!(value_or_none(Some("   ".into())), None);
        assert_eq!(value_or_none(Some("Fred".into())), Some("Fred".into()));
        assert_eq!(
            value_or_none(Some(" Childcare Socialization ".into())),
            Some("Childcare Socialization".into())
        );
    }

    #[test]
    fn test_assert_argument() {
        assert_eq!(assert_argument("name", " id ").unwrap(), "id");
        let err = assert_argument("validatorName", "").unwrap_err();
        assert!(err.to_string().contains("validatorName"));
    }
}
