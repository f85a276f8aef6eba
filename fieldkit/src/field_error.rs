//! Per-field validation error reports.

use std::fmt;

use fieldkit_common::{significant, TemplatedMessage};
use serde::Serialize;

use crate::failure::ValidationFailure;

/// One failed field, validator, generator, or mapping entry.
///
/// Carries the name of whatever failed plus a [`TemplatedMessage`] so an
/// external reporter can localize or re-render the text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    field_name: String,
    message: TemplatedMessage,
}

impl FieldError {
    /// Build an error, rejecting a blank field name or template.
    pub fn try_new<I, S>(
        field_name: &str,
        fmt_string: &str,
        indexed_fmt_data: I,
    ) -> fieldkit_common::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let field_name = significant::assert_argument("fieldName", field_name)?;
        let message = TemplatedMessage::checked(fmt_string, indexed_fmt_data)?;
        Ok(Self {
            field_name,
            message,
        })
    }

    pub(crate) fn from_failure(field_name: &str, failure: ValidationFailure) -> Self {
        Self {
            field_name: field_name.to_string(),
            message: failure.into_templated_message(),
        }
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn fmt_string(&self) -> &str {
        self.message.fmt_string()
    }

    pub fn indexed_fmt_data(&self) -> &[String] {
        self.message.indexed_fmt_data()
    }

    pub fn templated_message(&self) -> &TemplatedMessage {
        &self.message
    }

    /// The template with its values substituted.
    pub fn error_msg(&self) -> String {
        self.message.to_string()
    }

    pub fn replace_fmt_string(&mut self, fmt_string: impl Into<String>) -> &mut Self {
        self.message.replace_fmt_string(fmt_string);
        self
    }

    pub fn replace_indexed_fmt_data<I, S>(&mut self, indexed_fmt_data: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.message.replace_indexed_fmt_data(indexed_fmt_data);
        self
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field_name, self.message)
    }
}
