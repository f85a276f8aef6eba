//! Stand-alone structural equality and hashing over a registry's fields.
//!
//! Unlike the registry's own equality, these helpers can skip a leading run
//! of descriptors (an id or version field, say) and take a precomputed
//! type-compatibility flag. Two absent instances are never equal here, even
//! though [`Equivalance::same_types`] reports them as identical.

use std::any::TypeId;

use crate::instance::InstanceOf;
use crate::registry::{is_identical, FieldAccessors};

pub struct Equivalance;

impl Equivalance {
    /// Identity, or both present with exactly the same type.
    pub fn same_types<A: 'static, B: 'static>(us: Option<&A>, them: Option<&B>) -> bool {
        if is_identical(us, them) {
            return true;
        }
        us.is_some() && them.is_some() && TypeId::of::<A>() == TypeId::of::<B>()
    }

    /// Every field equal, for operands of exactly the same type.
    pub fn absolute<T, A, B>(us: Option<&A>, them: Option<&B>, fields: &FieldAccessors<T>) -> bool
    where
        T: 'static,
        A: InstanceOf<T>,
        B: InstanceOf<T>,
    {
        Self::mostly(us, them, fields, 0)
    }

    /// Every field equal, with type compatibility decided by the caller.
    pub fn absolute_with<T, A, B>(
        same_types: bool,
        us: Option<&A>,
        them: Option<&B>,
        fields: &FieldAccessors<T>,
    ) -> bool
    where
        T: 'static,
        A: InstanceOf<T>,
        B: InstanceOf<T>,
    {
        Self::mostly_with(same_types, us, them, fields, 0)
    }

    /// Fields from `from_index` onwards equal, for operands of exactly the
    /// same type.
    pub fn mostly<T, A, B>(
        us: Option<&A>,
        them: Option<&B>,
        fields: &FieldAccessors<T>,
        from_index: usize,
    ) -> bool
    where
        T: 'static,
        A: InstanceOf<T>,
        B: InstanceOf<T>,
    {
        Self::mostly_with(Self::same_types(us, them), us, them, fields, from_index)
    }

    pub fn mostly_with<T, A, B>(
        same_types: bool,
        us: Option<&A>,
        them: Option<&B>,
        fields: &FieldAccessors<T>,
        from_index: usize,
    ) -> bool
    where
        T: 'static,
        A: InstanceOf<T>,
        B: InstanceOf<T>,
    {
        match (same_types, us, them) {
            (true, Some(us), Some(them)) => {
                fields.values_equal(us.as_instance(), them.as_instance(), from_index)
            }
            _ => false,
        }
    }

    /// Hash of every field value; `0` when absent.
    pub fn absolute_hash<T: 'static>(us: Option<&T>, fields: &FieldAccessors<T>) -> u64 {
        Self::mostly_hash(us, fields, 0)
    }

    /// Hash of the field values from `from_index` onwards; `0` when absent.
    pub fn mostly_hash<T: 'static>(us: Option<&T>, fields: &FieldAccessors<T>, from_index: usize) -> u64 {
        us.map_or(0, |us| fields.hash_values(us, from_index))
    }
}
