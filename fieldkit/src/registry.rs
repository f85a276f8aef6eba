//! The per-entity field registry.
//!
//! A [`FieldAccessors`] is built once per entity type through a
//! [`FieldAccessorsBuilder`] and is read-only afterwards, so it is usually
//! kept in a `static LazyLock` and shared by every instance:
//!
//! ```ignore
//! static FIELDS: LazyLock<FieldAccessors<Person>> = LazyLock::new(|| {
//!     FieldAccessors::of()
//!         .required_mut("name", |p: &Person| p.name.clone(), |p, v| p.name = v)
//!         .with_type::<String>()
//!         .add_max_length(40)
//!         .optional("age", |p: &Person| p.age)
//!         .done()
//!         .expect("Person fields")
//! });
//! ```

use std::any::TypeId;
use std::fmt;
use std::hash::Hasher;

use fieldkit_common::{significant, FieldsConfig, TemplatedMessage, ToStringBuilder};
use indexmap::IndexMap;
use tracing::{debug, trace};
use xxhash_rust::xxh3::Xxh3;

use crate::accessor::{downcast, downcast_mut, Accessor, FieldAccess, MutableAccessor};
use crate::error::{RegistryError, Result};
use crate::failure::{Validation, ValidationFailure};
use crate::field_error::FieldError;
use crate::instance::InstanceOf;
use crate::kind::AccessorKind;
use crate::validator::{Validator, ValueGenerator};
use crate::value::{short_type_name, FieldValue};

type Descriptors<T> = IndexMap<String, Box<dyn FieldAccess<T>>>;

/// Ordered, name-keyed field descriptors of `T` plus its cross-field
/// validators and value generators.
pub struct FieldAccessors<T> {
    entity: String,
    accessors: Descriptors<T>,
    validators: Vec<Validator<T>>,
    generators: Vec<ValueGenerator<T>>,
    config: FieldsConfig,
}

/// An open registry. Every builder call is recorded until [`done`](Self::done).
///
/// The first misconfiguration is kept and every later call is ignored;
/// `done` then reports it instead of producing a registry.
pub struct FieldAccessorsBuilder<T> {
    accessors: Descriptors<T>,
    validators: Vec<Validator<T>>,
    generators: Vec<ValueGenerator<T>>,
    last_added: Option<usize>,
    config: FieldsConfig,
    error: Option<RegistryError>,
}

impl<T: 'static> FieldAccessors<T> {
    /// Start building the registry for `T`.
    pub fn of() -> FieldAccessorsBuilder<T> {
        FieldAccessorsBuilder {
            accessors: IndexMap::new(),
            validators: Vec::new(),
            generators: Vec::new(),
            last_added: None,
            config: FieldsConfig::default(),
            error: None,
        }
    }
}

impl<T: 'static> FieldAccessorsBuilder<T> {
    /// Use presentation settings other than the defaults.
    pub fn with_config(mut self, config: &FieldsConfig) -> Self {
        self.config = config.clone();
        self
    }

    fn apply(mut self, step: impl FnOnce(&mut Self) -> Result<()>) -> Self {
        if self.error.is_none() {
            if let Err(error) = step(&mut self) {
                self.error = Some(error);
            }
        }
        self
    }

    fn register(&mut self, accessor: Box<dyn FieldAccess<T>>) -> Result<()> {
        let name = accessor.name().to_string();
        if self.accessors.contains_key(&name) {
            return Err(RegistryError::DuplicateField { name });
        }
        let (index, _) = self.accessors.insert_full(name, accessor);
        self.last_added = Some(index);
        Ok(())
    }

    fn last_accessor(&mut self, operation: &'static str) -> Result<&mut Box<dyn FieldAccess<T>>> {
        let missing = RegistryError::NoLastAccessor { operation };
        let index = self.last_added.ok_or_else(|| missing.clone())?;
        self.accessors
            .get_index_mut(index)
            .map(|(_, accessor)| accessor)
            .ok_or(missing)
    }

    // --- Descriptors ---

    /// Register a descriptor built elsewhere.
    pub fn add<R: FieldValue>(self, accessor: Accessor<T, R>) -> Self {
        self.apply(|builder| builder.register(Box::new(accessor)))
    }

    fn read_only<R, G>(self, kind: AccessorKind, name: &str, getter: G) -> Self
    where
        R: FieldValue,
        G: Fn(&T) -> R + Send + Sync + 'static,
    {
        self.apply(|builder| builder.register(Box::new(Accessor::of(kind, name, getter)?)))
    }

    fn mutable<R, G, S>(self, kind: AccessorKind, name: &str, getter: G, setter: S) -> Self
    where
        R: FieldValue,
        G: Fn(&T) -> R + Send + Sync + 'static,
        S: Fn(&mut T, R) + Send + Sync + 'static,
    {
        self.apply(|builder| {
            builder.register(Box::new(Accessor::of_mutable(kind, name, getter, setter)?))
        })
    }

    /// Read-only system-populated field.
    pub fn auto<R, G>(self, name: &str, getter: G) -> Self
    where
        R: FieldValue,
        G: Fn(&T) -> R + Send + Sync + 'static,
    {
        self.read_only(AccessorKind::Auto, name, getter)
    }

    /// Read-only system-populated field whose value is derived by `generator`.
    pub fn auto_generated<R, G, F>(self, name: &str, getter: G, generator: F) -> Self
    where
        R: FieldValue,
        G: Fn(&T) -> R + Send + Sync + 'static,
        F: Fn(&mut T) -> Validation + Send + Sync + 'static,
    {
        self.auto(name, getter).with_value_generator(generator)
    }

    pub fn required<R, G>(self, name: &str, getter: G) -> Self
    where
        R: FieldValue,
        G: Fn(&T) -> R + Send + Sync + 'static,
    {
        self.read_only(AccessorKind::Required, name, getter)
    }

    pub fn required_mut<R, G, S>(self, name: &str, getter: G, setter: S) -> Self
    where
        R: FieldValue,
        G: Fn(&T) -> R + Send + Sync + 'static,
        S: Fn(&mut T, R) + Send + Sync + 'static,
    {
        self.mutable(AccessorKind::Required, name, getter, setter)
    }

    pub fn required_generated<R, G, F>(self, name: &str, getter: G, generator: F) -> Self
    where
        R: FieldValue,
        G: Fn(&T) -> R + Send + Sync + 'static,
        F: Fn(&mut T) -> Validation + Send + Sync + 'static,
    {
        self.required(name, getter).with_value_generator(generator)
    }

    pub fn optional<R, G>(self, name: &str, getter: G) -> Self
    where
        R: FieldValue,
        G: Fn(&T) -> R + Send + Sync + 'static,
    {
        self.read_only(AccessorKind::Optional, name, getter)
    }

    pub fn optional_mut<R, G, S>(self, name: &str, getter: G, setter: S) -> Self
    where
        R: FieldValue,
        G: Fn(&T) -> R + Send + Sync + 'static,
        S: Fn(&mut T, R) + Send + Sync + 'static,
    {
        self.mutable(AccessorKind::Optional, name, getter, setter)
    }

    pub fn optional_generated<R, G, F>(self, name: &str, getter: G, generator: F) -> Self
    where
        R: FieldValue,
        G: Fn(&T) -> R + Send + Sync + 'static,
        F: Fn(&mut T) -> Validation + Send + Sync + 'static,
    {
        self.optional(name, getter).with_value_generator(generator)
    }

    fn with_value_generator<F>(self, generator: F) -> Self
    where
        F: Fn(&mut T) -> Validation + Send + Sync + 'static,
    {
        self.apply(|builder| {
            let name = builder.last_accessor("value_generator")?.name().to_string();
            builder.generators.push(ValueGenerator::new(&name, generator)?);
            Ok(())
        })
    }

    // --- Augmenting the last descriptor ---

    pub fn add_max_length(self, max_length: usize) -> Self {
        self.apply(|builder| builder.last_accessor("add_max_length")?.add_max_length(max_length))
    }

    /// Append to the last descriptor's metadata with the configured separator.
    pub fn add_meta_data(self, text: &str) -> Self {
        self.apply(|builder| {
            let separator = builder.config.metadata_separator.clone();
            builder
                .last_accessor("add_meta_data")?
                .append_meta_data_with(text, &separator);
            Ok(())
        })
    }

    pub fn with_meta_data(self, text: &str) -> Self {
        self.apply(|builder| {
            builder.last_accessor("with_meta_data")?.with_meta_data(text);
            Ok(())
        })
    }

    /// Tag the last descriptor with the short name of `X`.
    pub fn with_type<X: ?Sized>(self) -> Self {
        self.with_type_name(&short_type_name::<X>())
    }

    pub fn with_type_name(self, type_name: &str) -> Self {
        self.apply(|builder| {
            builder.last_accessor("with_type")?.with_type_name(type_name);
            Ok(())
        })
    }

    /// Attach a value check to the last descriptor. `R` must be its value type.
    pub fn with_validator<R, F>(self, validator: F) -> Self
    where
        R: FieldValue,
        F: Fn(&R) -> Validation + Send + Sync + 'static,
    {
        self.apply(|builder| {
            let last = builder.last_accessor("with_validator")?;
            downcast_mut::<T, R>(&mut **last)?.with_validator(validator);
            Ok(())
        })
    }

    /// Attach a normalizer to the last descriptor, which must be mutable.
    pub fn with_normalizer<R, F>(self, normalizer: F) -> Self
    where
        R: FieldValue,
        F: Fn(R) -> R + Send + Sync + 'static,
    {
        self.apply(|builder| {
            let last = builder.last_accessor("with_normalizer")?;
            downcast_mut::<T, R>(&mut **last)?.with_normalizer(normalizer)?;
            Ok(())
        })
    }

    // --- Validators and generators ---

    /// Cross-field check run after every field has been validated.
    pub fn add_validator<F>(self, name: &str, check: F) -> Self
    where
        F: Fn(&T) -> Validation + Send + Sync + 'static,
    {
        self.apply(|builder| builder.push_validator(Validator::new(name, check)?))
    }

    /// Cross-field check failing with `error_msg` when `is_error` holds.
    pub fn add_validator_msg<P>(self, name: &str, error_msg: &str, is_error: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.apply(|builder| {
            let error_msg = significant::assert_argument("errorMsg", error_msg)?;
            builder.push_validator(Validator::from_predicate(name, &error_msg, is_error)?)
        })
    }

    /// Cross-field check failing with a templated message when `is_error`
    /// holds.
    pub fn add_validator_fmt<P, I, S>(
        self,
        name: &str,
        is_error: P,
        fmt_string: &str,
        indexed_fmt_data: I,
    ) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.apply(|builder| {
            let message = TemplatedMessage::checked(fmt_string, indexed_fmt_data)?;
            builder.push_validator(Validator::new(name, move |instance| {
                if is_error(instance) {
                    Err(ValidationFailure::Templated(message.clone()))
                } else {
                    Ok(())
                }
            })?)
        })
    }

    fn push_validator(&mut self, validator: Validator<T>) -> Result<()> {
        self.validators.push(validator);
        self.last_added = None;
        Ok(())
    }

    /// Derived-value computation run only on an instance with no errors.
    pub fn add_value_generator<F>(self, name: &str, generator: F) -> Self
    where
        F: Fn(&mut T) -> Validation + Send + Sync + 'static,
    {
        self.apply(|builder| {
            builder.generators.push(ValueGenerator::new(name, generator)?);
            builder.last_added = None;
            Ok(())
        })
    }

    /// Finish the registry.
    pub fn done(self) -> Result<FieldAccessors<T>> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if self.accessors.is_empty() && self.validators.is_empty() && self.generators.is_empty() {
            return Err(RegistryError::Empty);
        }
        let entity = short_type_name::<T>();
        debug!(
            entity = %entity,
            fields = self.accessors.len(),
            validators = self.validators.len(),
            generators = self.generators.len(),
            "field registry finalized"
        );
        Ok(FieldAccessors {
            entity,
            accessors: self.accessors,
            validators: self.validators,
            generators: self.generators,
            config: self.config,
        })
    }
}

impl<T: 'static> FieldAccessors<T> {
    /// Short name of the entity type.
    pub fn entity_type(&self) -> &str {
        &self.entity
    }

    /// Descriptors in registration order.
    pub fn all(&self) -> impl ExactSizeIterator<Item = &(dyn FieldAccess<T> + 'static)> + '_ {
        self.accessors.values().map(|accessor| accessor.as_ref())
    }

    /// Names of the mutable descriptors in registration order.
    pub fn mutable_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.all()
            .filter(|accessor| accessor.is_mutable())
            .map(|accessor| accessor.name())
    }

    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }

    pub fn validators(&self) -> &[Validator<T>] {
        &self.validators
    }

    pub fn value_generators(&self) -> &[ValueGenerator<T>] {
        &self.generators
    }

    // --- Lookup ---

    fn required_access(&self, name: &str) -> Result<&dyn FieldAccess<T>> {
        self.accessors
            .get(name)
            .map(|accessor| accessor.as_ref())
            .ok_or_else(|| RegistryError::UnknownField {
                name: name.to_string(),
            })
    }

    /// The typed descriptor registered under `name`.
    pub fn accessor<R: FieldValue>(&self, name: &str) -> Result<&Accessor<T, R>> {
        downcast(self.required_access(name)?)
    }

    /// The writable view of the descriptor registered under `name`.
    pub fn mutable_accessor<R: FieldValue>(&self, name: &str) -> Result<MutableAccessor<'_, T, R>> {
        self.accessor::<R>(name)?
            .as_mutable()
            .ok_or_else(|| RegistryError::NotMutable {
                name: name.to_string(),
            })
    }

    pub fn get_value<R: FieldValue>(&self, instance: &T, name: &str) -> Result<R> {
        Ok(self.accessor::<R>(name)?.get_value(instance))
    }

    pub fn set_value<R: FieldValue>(&self, instance: &mut T, name: &str, value: R) -> Result<()> {
        self.mutable_accessor::<R>(name)?.set_value(instance, value);
        Ok(())
    }

    // --- Validation ---

    /// Validate every field, then every validator, then (only while no
    /// errors have been found) run every value generator.
    ///
    /// Returns `None` for an absent instance and an empty list for a valid
    /// one.
    pub fn validate<'a>(&self, instance: impl Into<Option<&'a mut T>>) -> Option<Vec<FieldError>>
    where
        T: 'a,
    {
        let instance = instance.into()?;
        let mut errors = Vec::new();
        for accessor in self.accessors.values() {
            record_failure(&mut errors, accessor.name(), accessor.validate(instance));
        }
        for validator in &self.validators {
            record_failure(&mut errors, validator.name(), validator.validate(instance));
        }
        if errors.is_empty() {
            for generator in &self.generators {
                record_failure(&mut errors, generator.name(), generator.generate(instance));
            }
        }
        trace!(entity = %self.entity, errors = errors.len(), "validated instance");
        Some(errors)
    }

    // --- Equality and hashing ---

    /// Field-wise equality of two instances whose types are exactly `T`.
    ///
    /// Two absent instances, or the same instance twice, are equal.
    pub fn equal_instances_with_equal_types<A, B>(&self, us: Option<&A>, them: Option<&B>) -> bool
    where
        A: InstanceOf<T>,
        B: InstanceOf<T>,
    {
        if is_identical(us, them) {
            return true;
        }
        let exact = TypeId::of::<T>();
        if TypeId::of::<A>() != exact || TypeId::of::<B>() != exact {
            return false;
        }
        match (us, them) {
            (Some(us), Some(them)) => self.values_equal(us.as_instance(), them.as_instance(), 0),
            _ => false,
        }
    }

    /// Field-wise equality of any two values viewable as `T`.
    pub fn equal_instances_with_sub_types<A, B>(&self, us: Option<&A>, them: Option<&B>) -> bool
    where
        A: InstanceOf<T>,
        B: InstanceOf<T>,
    {
        if is_identical(us, them) {
            return true;
        }
        match (us, them) {
            (Some(us), Some(them)) => self.values_equal(us.as_instance(), them.as_instance(), 0),
            _ => false,
        }
    }

    /// Hash of every field value in registration order; `0` when absent.
    pub fn hash_code_from<'a>(&self, instance: impl Into<Option<&'a T>>) -> u64
    where
        T: 'a,
    {
        instance
            .into()
            .map_or(0, |instance| self.hash_values(instance, 0))
    }

    pub(crate) fn values_equal(&self, us: &T, them: &T, from_index: usize) -> bool {
        self.all()
            .skip(from_index)
            .all(|accessor| accessor.values_equal(us, them))
    }

    pub(crate) fn hash_values(&self, instance: &T, from_index: usize) -> u64 {
        let mut hasher = Xxh3::new();
        for accessor in self.all().skip(from_index) {
            accessor.hash_value(instance, &mut hasher);
        }
        hasher.finish()
    }

    /// Copy every mutable field of `from` into `us`. Read-only fields of
    /// `us` are left alone.
    pub fn populate_us(&self, us: &mut T, from: &T) {
        let mut copied = 0;
        for accessor in self.accessors.values() {
            if accessor.copy_value(us, from) {
                copied += 1;
            }
        }
        trace!(entity = %self.entity, copied, "populated instance");
    }

    // --- Printing ---

    /// Append every field value of `instance` to `builder`.
    pub fn add_fields_to(&self, builder: &mut ToStringBuilder, instance: &T) {
        for accessor in self.accessors.values() {
            accessor.add_value_to(instance, builder);
        }
    }

    /// Every field value of `instance`, one `name: value` line each.
    pub fn describe_instance(&self, instance: &T) -> String {
        let mut builder = ToStringBuilder::with_config(None, &self.config);
        self.add_fields_to(&mut builder, instance);
        builder.to_string()
    }
}

fn record_failure(errors: &mut Vec<FieldError>, name: &str, outcome: Validation) {
    if let Err(failure) = outcome {
        errors.push(FieldError::from_failure(name, failure));
    }
}

/// Both absent, or the very same value seen through the same type.
pub(crate) fn is_identical<A: 'static, B: 'static>(us: Option<&A>, them: Option<&B>) -> bool {
    match (us, them) {
        (None, None) => true,
        (Some(us), Some(them)) => {
            TypeId::of::<A>() == TypeId::of::<B>()
                && std::ptr::eq(us as *const A as *const (), them as *const B as *const ())
        }
        _ => false,
    }
}

impl<T: 'static> fmt::Display for FieldAccessors<T> {
    /// One aligned description line per descriptor.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_width = self
            .all()
            .map(|accessor| accessor.name_length_for_description())
            .max()
            .unwrap_or(0);
        let type_width = self
            .all()
            .map(|accessor| accessor.type_length_for_description())
            .max()
            .unwrap_or(0);
        let mut buffer = String::new();
        for accessor in self.all() {
            accessor.description_into(&mut buffer, Some(name_width), Some(type_width));
            buffer.push('\n');
        }
        f.write_str(&buffer)
    }
}

impl<T: 'static> fmt::Debug for FieldAccessors<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldAccessors")
            .field("entity", &self.entity)
            .field("fields", &self.accessors.keys().collect::<Vec<_>>())
            .field("validators", &self.validators)
            .field("generators", &self.generators)
            .finish()
    }
}
