//! Error types for registry and mapper configuration
//!
//! These are programming errors: a registry or mapper that produced one is
//! misconfigured. Data problems found while validating an instance are
//! reported as [`FieldError`](crate::FieldError) values instead.

use fieldkit_common::{CommonError, ErrorSeverity, Severity};
use thiserror::Error;

use crate::failure::ValidationFailure;

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Misconfiguration of a [`FieldAccessors`](crate::FieldAccessors) registry,
/// or a by-name lookup that the registry cannot satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two descriptors registered under the same name
    #[error("Attempt to register a duplicate field of: {name}")]
    DuplicateField { name: String },

    /// A descriptor, validator, or generator name was blank
    #[error("{what} name must be significant (non-blank)")]
    BlankName { what: &'static str },

    /// A required construction argument was blank
    #[error("{0}")]
    InvalidArgument(String),

    /// `done()` called on a builder with nothing registered
    #[error("FieldAccessors closed, w/ done(), with no Accessors added")]
    Empty,

    /// Augment call with no most-recently-added descriptor
    #[error("No Accessors added, but attempted to augment with: {operation}")]
    NoLastAccessor { operation: &'static str },

    /// Max length below 1
    #[error("coding error, max length must be at least 1, but was: {max_length} (field: {name})")]
    InvalidMaxLength { name: String, max_length: usize },

    /// By-name lookup of an unregistered field
    #[error("No Accessor with name of: {name}")]
    UnknownField { name: String },

    /// Write or normalizer requested on a read-only descriptor
    #[error("Accessor Read Only with name of: {name}")]
    NotMutable { name: String },

    /// Typed access with a value type that differs from the registered one
    #[error("Accessor '{name}' holds {actual}, not {requested}")]
    TypeMismatch {
        name: String,
        requested: &'static str,
        actual: &'static str,
    },
}

impl From<CommonError> for RegistryError {
    fn from(error: CommonError) -> Self {
        RegistryError::InvalidArgument(error.to_string())
    }
}

impl Severity for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Critical
    }
}

/// Misconfiguration of a [`FieldMappers`](crate::FieldMappers), or the first
/// failing entry of a `map` call made without an error collector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapperError {
    /// A mapping entry could not be resolved against its registries
    #[error("No {kind} registered on {entity} for field: {name}")]
    Unresolved {
        kind: &'static str,
        entity: String,
        name: String,
    },

    /// Resolution failed for a reason other than an unknown name
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Two entries registered under the same target name
    #[error("Attempt to register a duplicate field of: {name}")]
    DuplicateEntry { name: String },

    /// An entry failed while mapping and no collector was supplied
    #[error("mapping '{name}' failed: {failure}")]
    EntryFailed {
        name: String,
        failure: ValidationFailure,
    },
}

impl Severity for MapperError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            MapperError::EntryFailed { failure, .. } => failure.severity(),
            _ => ErrorSeverity::Critical,
        }
    }
}
