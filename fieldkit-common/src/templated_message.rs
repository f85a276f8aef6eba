//! Messages with a format template and indexed substitution values.
//!
//! An indexed reference sits between `.|` and `|.`, so the first value is
//! referenced as `.|0|.`. A reference that cannot be resolved against the
//! values has its bars replaced with question marks: `.|7|.` with only two
//! values renders as `.?7?.`, and so does `.|FRED|.`. A `.|` with no closing
//! `|.` is left untouched.

use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::{CommonError, Result};
use crate::significant;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\|([^|]*)\|\.").expect("placeholder pattern is valid"));

/// A format template plus the values substituted into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatedMessage {
    fmt_string: String,
    #[serde(default)]
    indexed_fmt_data: Vec<String>,
}

impl TemplatedMessage {
    /// A message with no substitution values.
    pub fn new(fmt_string: impl Into<String>) -> Self {
        Self {
            fmt_string: fmt_string.into(),
            indexed_fmt_data: Vec::new(),
        }
    }

    /// A message with indexed substitution values.
    pub fn with_data<I, S>(fmt_string: impl Into<String>, indexed_fmt_data: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fmt_string: fmt_string.into(),
            indexed_fmt_data: indexed_fmt_data.into_iter().map(Into::into).collect(),
        }
    }

    /// Like [`TemplatedMessage::with_data`] but rejects a blank template.
    pub fn checked<I, S>(fmt_string: &str, indexed_fmt_data: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !significant::is_significant(fmt_string) {
            return Err(CommonError::blank_argument("fmtString"));
        }
        Ok(Self::with_data(fmt_string, indexed_fmt_data))
    }

    pub fn fmt_string(&self) -> &str {
        &self.fmt_string
    }

    pub fn indexed_fmt_data(&self) -> &[String] {
        &self.indexed_fmt_data
    }

    pub fn replace_fmt_string(&mut self, fmt_string: impl Into<String>) -> &mut Self {
        self.fmt_string = fmt_string.into();
        self
    }

    pub fn replace_indexed_fmt_data<I, S>(&mut self, indexed_fmt_data: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indexed_fmt_data = indexed_fmt_data.into_iter().map(Into::into).collect();
        self
    }

    /// Substitute every indexed reference in the template.
    pub fn render(&self) -> Cow<'_, str> {
        PLACEHOLDER.replace_all(&self.fmt_string, |caps: &Captures| {
            let reference = &caps[1];
            match reference
                .parse::<usize>()
                .ok()
                .and_then(|index| self.indexed_fmt_data.get(index))
            {
                Some(value) => value.clone(),
                None => format!(".?{reference}?."),
            }
        })
    }
}

impl fmt::Display for TemplatedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("no references", &[], "no references")]
    #[case("max (.|0|.), was: .|1|.", &["5", "6"], "max (5), was: 6")]
    #[case(".|1|. before .|0|.", &["a", "b"], "b before a")]
    #[case("missing .|2|.", &["a"], "missing .?2?.")]
    #[case("named .|FRED|.", &["a"], "named .?FRED?.")]
    #[case("dangling .| stays", &["a"], "dangling .| stays")]
    #[case("repeat .|0|..|0|.", &["x"], "repeat xx")]
    fn test_render(#[case] template: &str, #[case] data: &[&str], #[case] expected: &str) {
        let message = TemplatedMessage::with_data(template, data.iter().copied());
        assert_eq!(message.to_string(), expected);
    }

    #[test]
    fn test_replace_template_then_data() {
        let mut message = TemplatedMessage::new("error on 'besty' of: Fred");
        assert!(message.indexed_fmt_data().is_empty());
        assert_eq!(message.to_string(), "error on 'besty' of: Fred");

        message.replace_fmt_string("error.| on '.|1|.' of: .|0|.");
        assert_eq!(message.to_string(), "error.| on '.?1?.' of: .?0?.");

        message.replace_indexed_fmt_data(["besty", "Freddy"]);
        assert_eq!(message.to_string(), "error.| on 'Freddy' of: besty");
    }

    #[test]
    fn test_checked_rejects_blank_template() {
        let err = TemplatedMessage::checked("  ", Vec::<String>::new()).unwrap_err();
        assert!(err.to_string().contains("fmtString"));
    }

    #[test]
    fn test_serializes_both_parts() {
        let message = TemplatedMessage::with_data("x .|0|.", ["1"]);
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["fmt_string"], "x .|0|.");
        assert_eq!(json["indexed_fmt_data"][0], "1");
    }
}
