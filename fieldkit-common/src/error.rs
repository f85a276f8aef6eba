//! Error types for fieldkit common helpers
//!
//! This module provides the severity vocabulary shared by every fieldkit
//! crate together with the errors raised by the common helpers themselves
//! (argument assertions and configuration parsing).

use thiserror::Error as ThisError;

/// Severity levels for error classification
///
/// fieldkit separates two failure classes:
///
/// - **Error**: a data validation failure. The instance is invalid, the
///   registry is fine, and the caller decides what to do with the report.
/// - **Critical**: a programming error. The registry or mapper is
///   misconfigured and must not be used.
///
/// `Warning` is kept for reporters that want to downgrade a failure.
///
/// # Examples
///
/// ```rust
/// use fieldkit_common::ErrorSeverity;
///
/// let data_problem = ErrorSeverity::Error;
/// let misconfigured = ErrorSeverity::Critical;
/// assert_ne!(data_problem, misconfigured);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Potential issue but operation can proceed
    Warning,

    /// Operation failed but the registry remains usable
    Error,

    /// Misconfiguration, the registry or mapper must not be used
    Critical,
}

/// Trait for error types that have severity levels
///
/// All fieldkit error types implement this trait so reporters can decide
/// whether a failure is data (render it to the user) or configuration
/// (abort and fix the code).
pub trait Severity {
    /// Get the severity level of this error
    fn severity(&self) -> ErrorSeverity;
}

/// Result type alias for common helper operations
pub type Result<T> = std::result::Result<T, CommonError>;

/// Errors raised by the common helpers
#[derive(Debug, ThisError)]
#[non_exhaustive]
pub enum CommonError {
    /// A construction-time argument was blank or missing
    #[error("argument '{name}' must be significant (non-blank)")]
    BlankArgument {
        /// Name of the offending argument
        name: String,
    },

    /// Configuration could not be parsed
    #[error("invalid fields configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl CommonError {
    /// Create a blank argument error
    pub fn blank_argument(name: &str) -> Self {
        CommonError::BlankArgument {
            name: name.to_string(),
        }
    }
}

impl Severity for CommonError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            CommonError::BlankArgument { .. } => ErrorSeverity::Critical,
            CommonError::Config(_) => ErrorSeverity::Critical,
        }
    }
}
