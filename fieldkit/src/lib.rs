//! Field accessor registry for entity types
//!
//! `fieldkit` describes the fields of an entity type once, with explicit
//! getter and setter closures, and builds generic behaviour on top of that
//! description: validation, derived values, structural equality, hashing,
//! textual dumps, and field-by-field mapping between two types.
//!
//! # Architecture
//!
//! - **Accessor**: one field's getter, optional setter, kind, type tag, max
//!   length, value validator, normalizer, and metadata
//! - **FieldAccessors**: the ordered registry for one type, built once and
//!   shared read-only (typically from a `static LazyLock`)
//! - **Validator / ValueGenerator**: named cross-field checks and derived
//!   value computations
//! - **Equivalance**: equality and hashing that can skip leading fields
//! - **FieldMappers**: ordered copy/transform rules from a source registry
//!   onto a target registry
//!
//! Misconfiguration is a [`RegistryError`] or [`MapperError`]. Bad data is
//! reported as a list of [`FieldError`] values.

pub mod accessor;
pub mod equivalance;
pub mod error;
pub mod failure;
pub mod field_error;
pub mod instance;
pub mod kind;
pub mod mappers;
pub mod registry;
pub mod validator;
pub mod value;

pub use accessor::{Accessor, FieldAccess, MutableAccessor};
pub use equivalance::Equivalance;
pub use error::{MapperError, RegistryError, Result};
pub use failure::{Validation, ValidationFailure};
pub use field_error::FieldError;
pub use instance::InstanceOf;
pub use kind::AccessorKind;
pub use mappers::{FieldMappers, FieldMappersBuilder};
pub use registry::{FieldAccessors, FieldAccessorsBuilder};
pub use validator::{ValueGenerator, Validator};
pub use value::{short_type_name, FieldValue};
