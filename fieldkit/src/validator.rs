//! Named whole-instance hooks.
//!
//! A [`Validator`] checks an instance after every field has been validated,
//! typically for cross-field rules. A [`ValueGenerator`] fills in derived
//! values, and runs only when the instance has no errors so far.

use std::fmt;
use std::sync::Arc;

use fieldkit_common::TemplatedMessage;

use crate::error::{RegistryError, Result};
use crate::failure::{Validation, ValidationFailure};

type Check<T> = Arc<dyn Fn(&T) -> Validation + Send + Sync>;
type Generate<T> = Arc<dyn Fn(&mut T) -> Validation + Send + Sync>;

fn checked_name(name: &str, what: &'static str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RegistryError::BlankName { what });
    }
    Ok(name.to_string())
}

/// Named cross-field check.
pub struct Validator<T> {
    name: String,
    check: Check<T>,
}

impl<T: 'static> Validator<T> {
    pub fn new<F>(name: &str, check: F) -> Result<Self>
    where
        F: Fn(&T) -> Validation + Send + Sync + 'static,
    {
        Ok(Self {
            name: checked_name(name, "Validator")?,
            check: Arc::new(check),
        })
    }

    /// Fails with `error_msg` whenever `is_error` holds.
    pub fn from_predicate<P>(name: &str, error_msg: &str, is_error: P) -> Result<Self>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let error_msg = error_msg.to_string();
        Self::new(name, move |instance| {
            if is_error(instance) {
                Err(ValidationFailure::other(error_msg.clone()))
            } else {
                Ok(())
            }
        })
    }

    /// Fails with a templated message whenever `is_error` holds. The
    /// template values are produced from the failing instance.
    pub fn from_template<P, V>(name: &str, fmt_string: &str, is_error: P, values: V) -> Result<Self>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
        V: Fn(&T) -> Vec<String> + Send + Sync + 'static,
    {
        let fmt_string = fmt_string.to_string();
        Self::new(name, move |instance| {
            if is_error(instance) {
                Err(TemplatedMessage::with_data(fmt_string.clone(), values(instance)).into())
            } else {
                Ok(())
            }
        })
    }
}

impl<T> Validator<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn validate(&self, instance: &T) -> Validation {
        (self.check)(instance)
    }
}

impl<T> Clone for Validator<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            check: Arc::clone(&self.check),
        }
    }
}

impl<T> fmt::Debug for Validator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Named computation that derives values on a valid instance.
pub struct ValueGenerator<T> {
    name: String,
    generate: Generate<T>,
}

impl<T: 'static> ValueGenerator<T> {
    pub fn new<F>(name: &str, generate: F) -> Result<Self>
    where
        F: Fn(&mut T) -> Validation + Send + Sync + 'static,
    {
        Ok(Self {
            name: checked_name(name, "ValueGenerator")?,
            generate: Arc::new(generate),
        })
    }
}

impl<T> ValueGenerator<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn generate(&self, instance: &mut T) -> Validation {
        (self.generate)(instance)
    }
}

impl<T> Clone for ValueGenerator<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            generate: Arc::clone(&self.generate),
        }
    }
}

impl<T> fmt::Debug for ValueGenerator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueGenerator").field("name", &self.name).finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Range {
        low: i32,
        high: i32,
        span: i32,
    }

    #[test]
    fn test_blank_names_rejected() {
        let err = Validator::<Range>::new(" ", |_| Ok(())).unwrap_err();
        assert_eq!(err, RegistryError::BlankName { what: "Validator" });
        let err = ValueGenerator::<Range>::new("", |_| Ok(())).unwrap_err();
        assert_eq!(err, RegistryError::BlankName { what: "ValueGenerator" });
    }

    #[test]
    fn test_predicate_validator() {
        let validator =
            Validator::from_predicate("ordered", "low above high", |r: &Range| r.low > r.high)
                .unwrap();
        assert_eq!(validator.name(), "ordered");
        assert_eq!(validator.validate(&Range { low: 1, high: 2, span: 0 }), Ok(()));
        assert_eq!(
            validator.validate(&Range { low: 3, high: 2, span: 0 }),
            Err(ValidationFailure::other("low above high"))
        );
    }

    #[test]
    fn test_template_validator() {
        let validator = Validator::from_template(
            "ordered",
            "low (.|0|.) above high (.|1|.)",
            |r: &Range| r.low > r.high,
            |r: &Range| vec![r.low.to_string(), r.high.to_string()],
        )
        .unwrap();
        let failure = validator
            .validate(&Range { low: 3, high: 2, span: 0 })
            .unwrap_err();
        assert_eq!(failure.to_string(), "low (3) above high (2)");
    }

    #[test]
    fn test_generator_mutates() {
        let generator = ValueGenerator::new("span", |r: &mut Range| {
            r.span = r.high - r.low;
            Ok(())
        })
        .unwrap();
        let mut range = Range { low: 1, high: 4, span: 0 };
        generator.generate(&mut range).unwrap();
        assert_eq!(range.span, 3);
        assert_eq!(format!("{generator:?}"), "ValueGenerator { name: \"span\", .. }");
    }
}
