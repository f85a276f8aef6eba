//! Field descriptors.
//!
//! An [`Accessor`] names one field of an entity type `T`, reads it with a
//! getter, and (when mutable) writes it with a setter. It carries the
//! field's kind, metadata, type tag, optional max length, optional value
//! validator, and optional normalizer.
//!
//! The registry holds descriptors of many value types side by side, so it
//! stores them as `Box<dyn FieldAccess<T>>`. Typed access is recovered by
//! downcasting back to `Accessor<T, R>`.

use std::any::{type_name, Any};
use std::fmt;
use std::hash::Hasher;
use std::ops::Deref;
use std::sync::Arc;

use fieldkit_common::config::DEFAULT_METADATA_SEPARATOR;
use fieldkit_common::ToStringBuilder;

use crate::error::{RegistryError, Result};
use crate::failure::{Validation, ValidationFailure};
use crate::kind::AccessorKind;
use crate::value::{short_type_name, FieldValue};

pub(crate) type Getter<T, R> = Arc<dyn Fn(&T) -> R + Send + Sync>;
pub(crate) type Setter<T, R> = Arc<dyn Fn(&mut T, R) + Send + Sync>;
type ValueValidator<R> = Arc<dyn Fn(&R) -> Validation + Send + Sync>;
type Normalizer<R> = Arc<dyn Fn(R) -> R + Send + Sync>;

/// Descriptor of one field of `T` holding values of type `R`.
pub struct Accessor<T, R> {
    kind: AccessorKind,
    name: String,
    getter: Getter<T, R>,
    setter: Option<Setter<T, R>>,
    meta_data: String,
    type_name: Option<String>,
    type_with_optional_size: String,
    max_length: Option<usize>,
    validator: Option<ValueValidator<R>>,
    normalizer: Option<Normalizer<R>>,
}

impl<T, R> Clone for Accessor<T, R> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            name: self.name.clone(),
            getter: Arc::clone(&self.getter),
            setter: self.setter.clone(),
            meta_data: self.meta_data.clone(),
            type_name: self.type_name.clone(),
            type_with_optional_size: self.type_with_optional_size.clone(),
            max_length: self.max_length,
            validator: self.validator.clone(),
            normalizer: self.normalizer.clone(),
        }
    }
}

impl<T, R> Accessor<T, R>
where
    T: 'static,
    R: FieldValue,
{
    /// A read-only descriptor. The name is trimmed and must not be blank.
    pub fn of<G>(kind: AccessorKind, name: &str, getter: G) -> Result<Self>
    where
        G: Fn(&T) -> R + Send + Sync + 'static,
    {
        Self::build(kind, name, Arc::new(getter), None)
    }

    /// A descriptor that can also write its field.
    pub fn of_mutable<G, S>(kind: AccessorKind, name: &str, getter: G, setter: S) -> Result<Self>
    where
        G: Fn(&T) -> R + Send + Sync + 'static,
        S: Fn(&mut T, R) + Send + Sync + 'static,
    {
        Self::build(kind, name, Arc::new(getter), Some(Arc::new(setter)))
    }

    fn build(
        kind: AccessorKind,
        name: &str,
        getter: Getter<T, R>,
        setter: Option<Setter<T, R>>,
    ) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RegistryError::BlankName { what: "Accessor" });
        }
        Ok(Self {
            kind,
            name: name.to_string(),
            getter,
            setter,
            meta_data: kind.initial_meta_data().to_string(),
            type_name: None,
            type_with_optional_size: String::new(),
            max_length: None,
            validator: None,
            normalizer: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> AccessorKind {
        self.kind
    }

    pub fn is_mutable(&self) -> bool {
        self.setter.is_some()
    }

    pub fn meta_data(&self) -> &str {
        &self.meta_data
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    pub fn get_value(&self, instance: &T) -> R {
        (self.getter)(instance)
    }

    pub(crate) fn getter(&self) -> Getter<T, R> {
        Arc::clone(&self.getter)
    }

    pub(crate) fn setter(&self) -> Option<Setter<T, R>> {
        self.setter.clone()
    }

    /// The writable view of this descriptor, if it has a setter.
    pub fn as_mutable(&self) -> Option<MutableAccessor<'_, T, R>> {
        self.setter.as_ref().map(|setter| MutableAccessor {
            accessor: self,
            setter,
        })
    }

    // --- Configuration ---

    /// Tag the descriptor with the short name of `X`.
    pub fn with_type<X: ?Sized>(&mut self) -> &mut Self {
        self.with_type_name(&short_type_name::<X>())
    }

    /// Tag the descriptor with an explicit type name.
    pub fn with_type_name(&mut self, type_name: &str) -> &mut Self {
        self.type_name = Some(type_name.trim().to_string());
        self.refresh_type_with_optional_size();
        self
    }

    /// Limit the measured length of values. Must be at least 1.
    pub fn add_max_length(&mut self, max_length: usize) -> Result<&mut Self> {
        if max_length < 1 {
            return Err(RegistryError::InvalidMaxLength {
                name: self.name.clone(),
                max_length,
            });
        }
        self.max_length = Some(max_length);
        self.refresh_type_with_optional_size();
        Ok(self)
    }

    /// Append to the metadata with the default separator.
    pub fn add_meta_data(&mut self, text: &str) -> &mut Self {
        self.append_meta_data_with(text, DEFAULT_METADATA_SEPARATOR)
    }

    /// Append to the metadata with an explicit separator. Blank text is ignored.
    pub fn append_meta_data_with(&mut self, text: &str, separator: &str) -> &mut Self {
        let text = text.trim();
        if !text.is_empty() {
            if !self.meta_data.is_empty() {
                self.meta_data.push_str(separator);
            }
            self.meta_data.push_str(text);
        }
        self
    }

    /// Replace the metadata, including the kind's initial text.
    pub fn with_meta_data(&mut self, text: &str) -> &mut Self {
        self.meta_data = text.trim().to_string();
        self
    }

    /// Check applied to significant values before the max length check.
    pub fn with_validator<F>(&mut self, validator: F) -> &mut Self
    where
        F: Fn(&R) -> Validation + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Rewrite applied to the field value, and stored back, at the start of
    /// validation. Only mutable descriptors can normalize.
    pub fn with_normalizer<F>(&mut self, normalizer: F) -> Result<&mut Self>
    where
        F: Fn(R) -> R + Send + Sync + 'static,
    {
        if self.setter.is_none() {
            return Err(RegistryError::NotMutable {
                name: self.name.clone(),
            });
        }
        self.normalizer = Some(Arc::new(normalizer));
        Ok(self)
    }

    fn refresh_type_with_optional_size(&mut self) {
        let mut text = self.type_name.clone().unwrap_or_default();
        if let Some(max_length) = self.max_length {
            text.push_str(&format!("({max_length})"));
        }
        self.type_with_optional_size = text;
    }

    // --- Validation ---

    /// Normalize, then check required-ness, the value validator, and the max
    /// length, stopping at the first failure.
    pub fn validate(&self, instance: &mut T) -> Validation {
        let value = self.normalized_value(instance);
        if !value.is_significant() {
            return match self.kind {
                AccessorKind::Required => Err(ValidationFailure::RequiredFieldMissing),
                _ => Ok(()),
            };
        }
        if let Some(validator) = &self.validator {
            validator(&value)?;
        }
        if let (Some(max_length), Some(actual_length)) = (self.max_length, value.measured_length())
        {
            if actual_length > max_length {
                return Err(ValidationFailure::ExceededMaxLength {
                    max_length,
                    actual_length,
                });
            }
        }
        Ok(())
    }

    fn normalized_value(&self, instance: &mut T) -> R {
        let raw = self.get_value(instance);
        match (&self.normalizer, &self.setter) {
            (Some(normalizer), Some(setter)) => {
                let normalized = normalizer(raw);
                setter(instance, normalized.clone());
                normalized
            }
            _ => raw,
        }
    }

    // --- Description ---

    /// Single line description with no column padding.
    pub fn description(&self) -> String {
        let mut buffer = String::new();
        self.description_into(&mut buffer, None, None);
        buffer
    }

    /// Append `name [type[(max)]] [(metadata)]`, padding the name and type
    /// columns to the given widths.
    pub fn description_into(
        &self,
        buffer: &mut String,
        pad_name_to: Option<usize>,
        pad_type_to: Option<usize>,
    ) {
        buffer.push_str(&self.name);
        if self.type_with_optional_size.is_empty() && self.meta_data.is_empty() {
            return;
        }
        if let Some(width) = pad_name_to {
            pad(buffer, width.saturating_sub(self.name_length_for_description()));
        }
        buffer.push(' ');
        buffer.push_str(&self.type_with_optional_size);
        if self.meta_data.is_empty() {
            return;
        }
        if let Some(width) = pad_type_to {
            pad(buffer, width.saturating_sub(self.type_length_for_description()));
        }
        buffer.push_str(" (");
        buffer.push_str(&self.meta_data);
        buffer.push(')');
    }

    pub fn name_length_for_description(&self) -> usize {
        self.name.chars().count()
    }

    pub fn type_length_for_description(&self) -> usize {
        self.type_with_optional_size.chars().count()
    }
}

fn pad(buffer: &mut String, spaces: usize) {
    buffer.extend(std::iter::repeat_n(' ', spaces));
}

impl<T, R> fmt::Display for Accessor<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.setter.is_some() {
            "MutableAccessor"
        } else {
            "Accessor"
        };
        write!(f, "{label}('{}')", self.name)
    }
}

impl<T, R> fmt::Debug for Accessor<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("mutable", &self.setter.is_some())
            .field("meta_data", &self.meta_data)
            .field("type_name", &self.type_name)
            .field("max_length", &self.max_length)
            .finish_non_exhaustive()
    }
}

/// Writable view of a mutable [`Accessor`].
pub struct MutableAccessor<'a, T, R> {
    accessor: &'a Accessor<T, R>,
    setter: &'a Setter<T, R>,
}

impl<T, R> MutableAccessor<'_, T, R> {
    pub fn set_value(&self, instance: &mut T, value: R) {
        (self.setter)(instance, value)
    }

    /// Same as [`set_value`](Self::set_value), for use as a value sink.
    pub fn accept(&self, instance: &mut T, value: R) {
        self.set_value(instance, value)
    }
}

impl<T, R> Deref for MutableAccessor<'_, T, R> {
    type Target = Accessor<T, R>;

    fn deref(&self) -> &Self::Target {
        self.accessor
    }
}

// --- Type-erased access ---

/// A descriptor of `T` with its value type erased.
///
/// Every operation the registry performs across all fields goes through
/// this trait. Use [`as_any`](FieldAccess::as_any) to get back the typed
/// [`Accessor`].
pub trait FieldAccess<T>: Send + Sync {
    fn name(&self) -> &str;
    fn kind(&self) -> AccessorKind;
    fn is_mutable(&self) -> bool;
    fn meta_data(&self) -> &str;
    fn type_name(&self) -> Option<&str>;
    fn max_length(&self) -> Option<usize>;

    /// Full Rust name of the value type, used in type mismatch reports.
    fn value_type_name(&self) -> &'static str;

    fn validate(&self, instance: &mut T) -> Validation;
    fn values_equal(&self, us: &T, them: &T) -> bool;
    fn hash_value(&self, instance: &T, state: &mut dyn Hasher);

    /// Copy the value from `source` into `target`. Returns false for
    /// read-only descriptors, which copy nothing.
    fn copy_value(&self, target: &mut T, source: &T) -> bool;

    fn add_value_to(&self, instance: &T, builder: &mut ToStringBuilder);
    fn description_into(&self, buffer: &mut String, pad_name_to: Option<usize>, pad_type_to: Option<usize>);
    fn name_length_for_description(&self) -> usize;
    fn type_length_for_description(&self) -> usize;

    fn with_type_name(&mut self, type_name: &str);
    fn add_max_length(&mut self, max_length: usize) -> Result<()>;
    fn append_meta_data_with(&mut self, text: &str, separator: &str);
    fn with_meta_data(&mut self, text: &str);

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T, R> FieldAccess<T> for Accessor<T, R>
where
    T: 'static,
    R: FieldValue,
{
    fn name(&self) -> &str {
        Accessor::name(self)
    }

    fn kind(&self) -> AccessorKind {
        self.kind
    }

    fn is_mutable(&self) -> bool {
        Accessor::is_mutable(self)
    }

    fn meta_data(&self) -> &str {
        Accessor::meta_data(self)
    }

    fn type_name(&self) -> Option<&str> {
        Accessor::type_name(self)
    }

    fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    fn value_type_name(&self) -> &'static str {
        type_name::<R>()
    }

    fn validate(&self, instance: &mut T) -> Validation {
        Accessor::validate(self, instance)
    }

    fn values_equal(&self, us: &T, them: &T) -> bool {
        self.get_value(us) == self.get_value(them)
    }

    fn hash_value(&self, instance: &T, mut state: &mut dyn Hasher) {
        self.get_value(instance).hash(&mut state);
    }

    fn copy_value(&self, target: &mut T, source: &T) -> bool {
        match &self.setter {
            Some(setter) => {
                setter(target, self.get_value(source));
                true
            }
            None => false,
        }
    }

    fn add_value_to(&self, instance: &T, builder: &mut ToStringBuilder) {
        builder.add(&self.name, &self.get_value(instance));
    }

    fn description_into(&self, buffer: &mut String, pad_name_to: Option<usize>, pad_type_to: Option<usize>) {
        Accessor::description_into(self, buffer, pad_name_to, pad_type_to)
    }

    fn name_length_for_description(&self) -> usize {
        Accessor::name_length_for_description(self)
    }

    fn type_length_for_description(&self) -> usize {
        Accessor::type_length_for_description(self)
    }

    fn with_type_name(&mut self, type_name: &str) {
        Accessor::with_type_name(self, type_name);
    }

    fn add_max_length(&mut self, max_length: usize) -> Result<()> {
        Accessor::add_max_length(self, max_length).map(|_| ())
    }

    fn append_meta_data_with(&mut self, text: &str, separator: &str) {
        Accessor::append_meta_data_with(self, text, separator);
    }

    fn with_meta_data(&mut self, text: &str) {
        Accessor::with_meta_data(self, text);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Recover the typed descriptor behind an erased one.
pub(crate) fn downcast<'a, T: 'static, R: FieldValue>(
    access: &'a dyn FieldAccess<T>,
) -> Result<&'a Accessor<T, R>> {
    access
        .as_any()
        .downcast_ref::<Accessor<T, R>>()
        .ok_or_else(|| type_mismatch::<T, R>(access))
}

pub(crate) fn downcast_mut<'a, T: 'static, R: FieldValue>(
    access: &'a mut (dyn FieldAccess<T> + 'static),
) -> Result<&'a mut Accessor<T, R>> {
    let name = access.name().to_string();
    let actual = access.value_type_name();
    access
        .as_any_mut()
        .downcast_mut::<Accessor<T, R>>()
        .ok_or(RegistryError::TypeMismatch {
            name,
            requested: type_name::<R>(),
            actual,
        })
}

fn type_mismatch<T, R>(access: &dyn FieldAccess<T>) -> RegistryError {
    RegistryError::TypeMismatch {
        name: access.name().to_string(),
        requested: type_name::<R>(),
        actual: access.value_type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Person {
        name: Option<String>,
        nick: Option<String>,
        age: i32,
    }

    fn name_accessor(kind: AccessorKind) -> Accessor<Person, Option<String>> {
        Accessor::of_mutable(kind, "name", |p: &Person| p.name.clone(), |p: &mut Person, v| p.name = v)
            .unwrap()
    }

    #[test]
    fn test_blank_name_rejected() {
        let err = Accessor::<Person, i32>::of(AccessorKind::Optional, "  ", |p| p.age).unwrap_err();
        assert_eq!(err, RegistryError::BlankName { what: "Accessor" });
    }

    #[test]
    fn test_name_trimmed_and_initial_meta_data() {
        let accessor = Accessor::<Person, i32>::of(AccessorKind::Auto, " age ", |p| p.age).unwrap();
        assert_eq!(accessor.name(), "age");
        assert_eq!(accessor.meta_data(), "auto");
        assert!(!accessor.is_mutable());
        assert!(accessor.as_mutable().is_none());
        assert_eq!(accessor.to_string(), "Accessor('age')");
    }

    #[test]
    fn test_required_missing() {
        let accessor = name_accessor(AccessorKind::Required);
        let mut person = Person::default();
        assert_eq!(accessor.validate(&mut person), Err(ValidationFailure::RequiredFieldMissing));
        person.name = Some("   ".into());
        assert_eq!(accessor.validate(&mut person), Err(ValidationFailure::RequiredFieldMissing));
    }

    #[test]
    fn test_optional_absent_skips_checks() {
        let mut accessor = name_accessor(AccessorKind::Optional);
        accessor
            .with_validator(|_| Err(ValidationFailure::other("never called")))
            .add_max_length(1)
            .unwrap();
        assert_eq!(accessor.validate(&mut Person::default()), Ok(()));
    }

    #[test]
    fn test_max_length_boundary() {
        let mut accessor = name_accessor(AccessorKind::Required);
        accessor.add_max_length(5).unwrap();
        let mut person = Person {
            name: Some("hello".into()),
            ..Default::default()
        };
        assert_eq!(accessor.validate(&mut person), Ok(()));
        person.name = Some("hello!".into());
        assert_eq!(
            accessor.validate(&mut person),
            Err(ValidationFailure::ExceededMaxLength {
                max_length: 5,
                actual_length: 6
            })
        );
    }

    #[test]
    fn test_zero_max_length_rejected() {
        let mut accessor = name_accessor(AccessorKind::Required);
        assert!(matches!(
            accessor.add_max_length(0),
            Err(RegistryError::InvalidMaxLength { max_length: 0, .. })
        ));
    }

    #[test]
    fn test_validator_runs_before_max_length() {
        let mut accessor = name_accessor(AccessorKind::Required);
        accessor
            .with_validator(|v| match v.as_deref() {
                Some("bad") => Err(ValidationFailure::other("bad value")),
                _ => Ok(()),
            })
            .add_max_length(2)
            .unwrap();
        let mut person = Person {
            name: Some("bad".into()),
            ..Default::default()
        };
        assert_eq!(
            accessor.validate(&mut person),
            Err(ValidationFailure::other("bad value"))
        );
    }

    #[test]
    fn test_normalizer_writes_back() {
        let mut accessor = name_accessor(AccessorKind::Required);
        accessor
            .with_normalizer(|v| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
            .unwrap();
        let mut person = Person {
            name: Some("  fred  ".into()),
            ..Default::default()
        };
        assert_eq!(accessor.validate(&mut person), Ok(()));
        assert_eq!(person.name.as_deref(), Some("fred"));
    }

    #[test]
    fn test_normalizer_requires_setter() {
        let mut accessor =
            Accessor::<Person, Option<String>>::of(AccessorKind::Optional, "nick", |p| p.nick.clone())
                .unwrap();
        let err = accessor.with_normalizer(|v| v).unwrap_err();
        assert_eq!(err, RegistryError::NotMutable { name: "nick".into() });
    }

    #[test]
    fn test_mutable_view() {
        let accessor = name_accessor(AccessorKind::Optional);
        let mutable = accessor.as_mutable().unwrap();
        let mut person = Person::default();
        mutable.set_value(&mut person, Some("sam".into()));
        assert_eq!(mutable.get_value(&person).as_deref(), Some("sam"));
        mutable.accept(&mut person, None);
        assert_eq!(person.name, None);
        assert_eq!(accessor.to_string(), "MutableAccessor('name')");
    }

    #[test]
    fn test_meta_data_editing() {
        let mut accessor = name_accessor(AccessorKind::Required);
        accessor.add_meta_data("  ").add_meta_data(" unique ");
        assert_eq!(accessor.meta_data(), "required & unique");
        accessor.with_meta_data("just this");
        assert_eq!(accessor.meta_data(), "just this");

        let mut optional = name_accessor(AccessorKind::Optional);
        optional.append_meta_data_with("gender?", " | ");
        assert_eq!(optional.meta_data(), "gender?");
    }

    #[test]
    fn test_description_padding() {
        let mut accessor = name_accessor(AccessorKind::Required);
        accessor.with_type::<String>().add_max_length(5).unwrap();
        assert_eq!(accessor.description(), "name String(5) (required)");

        let mut buffer = String::new();
        accessor.description_into(&mut buffer, Some(7), Some(10));
        assert_eq!(buffer, "name    String(5)  (required)");
    }

    #[test]
    fn test_description_name_only() {
        let mut accessor = name_accessor(AccessorKind::Optional);
        assert_eq!(accessor.description(), "name");
        accessor.add_meta_data("gender?");
        let mut buffer = String::new();
        accessor.description_into(&mut buffer, Some(7), Some(7));
        assert_eq!(buffer, format!("name{}(gender?)", " ".repeat(12)));
    }

    #[test]
    fn test_downcast() {
        let boxed: Box<dyn FieldAccess<Person>> = Box::new(name_accessor(AccessorKind::Optional));
        assert!(downcast::<Person, Option<String>>(boxed.as_ref()).is_ok());
        let err = downcast::<Person, i32>(boxed.as_ref()).unwrap_err();
        assert!(matches!(err, RegistryError::TypeMismatch { ref name, .. } if name == "name"));
    }
}
