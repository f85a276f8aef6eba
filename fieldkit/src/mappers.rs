//! Declarative field-to-field copying between two entity types.
//!
//! Entries are resolved against the target and source registries when the
//! mapper is built, so a misspelled or read-only field is reported by
//! [`FieldMappersBuilder::build`] rather than on first use.

use std::fmt;

use fieldkit_common::Pretty;
use indexmap::IndexMap;
use tracing::debug;

use crate::accessor::{Getter, Setter};
use crate::error::{MapperError, RegistryError};
use crate::failure::{Validation, ValidationFailure};
use crate::field_error::FieldError;
use crate::registry::FieldAccessors;
use crate::value::{short_type_name, FieldValue};

type Entry<Target, Source> = Box<dyn Fn(&mut Target, &Source) -> Validation + Send + Sync>;

/// Ordered mapping entries from `Source` fields onto `Target` fields.
pub struct FieldMappers<Target, Source> {
    target: String,
    source: String,
    entries: IndexMap<String, Entry<Target, Source>>,
}

/// Collects mapping entries until [`build`](Self::build). The first
/// resolution failure is kept and reported by `build`.
pub struct FieldMappersBuilder<Target, Source> {
    entries: IndexMap<String, Entry<Target, Source>>,
    error: Option<MapperError>,
}

impl<Target: 'static, Source: 'static> FieldMappers<Target, Source> {
    pub fn of() -> FieldMappersBuilder<Target, Source> {
        FieldMappersBuilder {
            entries: IndexMap::new(),
            error: None,
        }
    }

    /// Apply every entry in order, stopping at the first failure.
    pub fn map(&self, target: &mut Target, source: &Source) -> Result<(), MapperError> {
        for (name, entry) in &self.entries {
            entry(target, source).map_err(|failure| MapperError::EntryFailed {
                name: name.clone(),
                failure,
            })?;
        }
        Ok(())
    }

    /// Apply every entry in order, recording failures in `errors` keyed by
    /// entry name instead of stopping.
    pub fn map_collecting(
        &self,
        target: &mut Target,
        source: &Source,
        errors: &mut IndexMap<String, FieldError>,
    ) {
        for (name, entry) in &self.entries {
            let Err(failure) = entry(target, source) else {
                continue;
            };
            let error = FieldError::from_failure(name, failure);
            debug!(
                target_type = %self.target,
                source_type = %self.source,
                error = %Pretty(&error),
                "collected mapping failure"
            );
            errors.insert(name.clone(), error);
        }
    }

    /// Entry names in application order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<Target, Source> fmt::Debug for FieldMappers<Target, Source> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMappers")
            .field("target", &self.target)
            .field("source", &self.source)
            .field("entries", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<Target: 'static, Source: 'static> FieldMappersBuilder<Target, Source> {
    fn apply(mut self, step: impl FnOnce(&mut Self) -> Result<(), MapperError>) -> Self {
        if self.error.is_none() {
            if let Err(error) = step(&mut self) {
                self.error = Some(error);
            }
        }
        self
    }

    fn insert(&mut self, name: &str, entry: Entry<Target, Source>) -> Result<(), MapperError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RegistryError::BlankName { what: "Mapper" }.into());
        }
        if self.entries.contains_key(name) {
            return Err(MapperError::DuplicateEntry {
                name: name.to_string(),
            });
        }
        self.entries.insert(name.to_string(), entry);
        Ok(())
    }

    /// Map the source field onto the target field of the same name.
    pub fn map_same<R: FieldValue>(
        self,
        name: &str,
        target: &FieldAccessors<Target>,
        source: &FieldAccessors<Source>,
    ) -> Self {
        self.map_named::<R>(name, target, name, source)
    }

    /// Map a source field onto a differently named target field.
    pub fn map_named<R: FieldValue>(
        self,
        target_name: &str,
        target: &FieldAccessors<Target>,
        source_name: &str,
        source: &FieldAccessors<Source>,
    ) -> Self {
        self.map_transformed(target_name, target, source_name, source, |value: R| value)
    }

    /// Map a source field through `transformer` onto a target field.
    pub fn map_transformed<S, R, F>(
        self,
        target_name: &str,
        target: &FieldAccessors<Target>,
        source_name: &str,
        source: &FieldAccessors<Source>,
        transformer: F,
    ) -> Self
    where
        S: FieldValue,
        R: FieldValue,
        F: Fn(S) -> R + Send + Sync + 'static,
    {
        self.try_map_transformed(target_name, target, source_name, source, move |value: S| {
            Ok(transformer(value))
        })
    }

    /// Like [`map_transformed`](Self::map_transformed), for a transformer
    /// that can reject the source value.
    pub fn try_map_transformed<S, R, F>(
        self,
        target_name: &str,
        target: &FieldAccessors<Target>,
        source_name: &str,
        source: &FieldAccessors<Source>,
        transformer: F,
    ) -> Self
    where
        S: FieldValue,
        R: FieldValue,
        F: Fn(S) -> Result<R, ValidationFailure> + Send + Sync + 'static,
    {
        self.apply(|builder| {
            let getter = resolve_getter::<Source, S>(source, source_name)?;
            let setter = resolve_setter::<Target, R>(target, target_name)?;
            builder.insert(
                target_name,
                Box::new(move |t: &mut Target, s: &Source| {
                    setter(t, transformer(getter(s))?);
                    Ok(())
                }),
            )
        })
    }

    /// Map a computed source value onto the named target field.
    pub fn map_getter<R, G>(self, name: &str, target: &FieldAccessors<Target>, getter: G) -> Self
    where
        R: FieldValue,
        G: Fn(&Source) -> R + Send + Sync + 'static,
    {
        self.map_getter_transformed(name, target, getter, |value: R| value)
    }

    pub fn map_getter_transformed<S, R, G, F>(
        self,
        name: &str,
        target: &FieldAccessors<Target>,
        getter: G,
        transformer: F,
    ) -> Self
    where
        R: FieldValue,
        G: Fn(&Source) -> S + Send + Sync + 'static,
        F: Fn(S) -> R + Send + Sync + 'static,
    {
        self.apply(|builder| {
            let setter = resolve_setter::<Target, R>(target, name)?;
            builder.insert(
                name,
                Box::new(move |t: &mut Target, s: &Source| {
                    setter(t, transformer(getter(s)));
                    Ok(())
                }),
            )
        })
    }

    /// A free-form entry that writes the target however it likes.
    pub fn add_mapper<F>(self, name: &str, mapper: F) -> Self
    where
        F: Fn(&mut Target, &Source) -> Validation + Send + Sync + 'static,
    {
        self.apply(|builder| builder.insert(name, Box::new(mapper)))
    }

    pub fn build(self) -> Result<FieldMappers<Target, Source>, MapperError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let mappers = FieldMappers {
            target: short_type_name::<Target>(),
            source: short_type_name::<Source>(),
            entries: self.entries,
        };
        debug!(
            target_type = %mappers.target,
            source_type = %mappers.source,
            entries = mappers.entries.len(),
            "field mappers built"
        );
        Ok(mappers)
    }
}

fn resolve_getter<T: 'static, R: FieldValue>(
    fields: &FieldAccessors<T>,
    name: &str,
) -> Result<Getter<T, R>, MapperError> {
    match fields.accessor::<R>(name) {
        Ok(accessor) => Ok(accessor.getter()),
        Err(RegistryError::UnknownField { .. }) => Err(MapperError::Unresolved {
            kind: "Accessor",
            entity: fields.entity_type().to_string(),
            name: name.to_string(),
        }),
        Err(error) => Err(error.into()),
    }
}

fn resolve_setter<T: 'static, R: FieldValue>(
    fields: &FieldAccessors<T>,
    name: &str,
) -> Result<Setter<T, R>, MapperError> {
    let unresolved = || MapperError::Unresolved {
        kind: "MutableAccessor",
        entity: fields.entity_type().to_string(),
        name: name.to_string(),
    };
    match fields.accessor::<R>(name) {
        Ok(accessor) => accessor.setter().ok_or_else(unresolved),
        Err(RegistryError::UnknownField { .. }) => Err(unresolved()),
        Err(error) => Err(error.into()),
    }
}
