//! # Fieldkit Common
//!
//! Collaborators shared by the fieldkit crates. Nothing here knows about
//! field registries; the core engine builds on these pieces.
//!
//! ## Modules
//!
//! - [`templated_message`] - format templates with indexed `.|i|.` substitution
//! - [`to_string_builder`] - indented `name: value` pretty printing
//! - [`significant`] - blank/absent detection and argument assertions
//! - [`config`] - presentation settings with serde defaults
//! - [`error`] - common error type and the severity vocabulary
//! - [`logging`] - helpers for log formatting

pub mod config;
pub mod error;
pub mod logging;
pub mod significant;
pub mod templated_message;
pub mod to_string_builder;

pub use config::FieldsConfig;
pub use error::{CommonError, ErrorSeverity, Result, Severity};
pub use logging::Pretty;
pub use templated_message::TemplatedMessage;
pub use to_string_builder::{Describe, Indentable, ToStringBuilder};
