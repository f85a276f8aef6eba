//! Logging utilities for fieldkit
//!
//! This module provides utilities for formatting values in log messages.

use serde::Serialize;
use std::fmt::Debug;

/// Wrapper for pretty-printing types in logs as JSON
///
/// Use this in tracing statements to format field errors and other
/// serializable values with a newline before the content:
///
/// ```ignore
/// use fieldkit_common::Pretty;
/// use tracing::debug;
///
/// debug!("collected: {}", Pretty(&field_error));
/// ```
///
/// Debug is used as a fallback if JSON serialization fails.
pub struct Pretty<T>(pub T);

impl<T: Serialize + Debug> std::fmt::Display for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string_pretty(&self.0) {
            Ok(json) => write!(f, "\n{}", json),
            Err(_) => write!(f, "\n{:#?}", self.0),
        }
    }
}

impl<T: Serialize + Debug> std::fmt::Debug for Pretty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}
