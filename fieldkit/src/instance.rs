//! Subtype relationship between entity types.

use std::any::Any;

/// A value that can be viewed as an instance of the registered entity type.
///
/// Every type is an instance of itself. A type that embeds a base entity
/// implements `InstanceOf<Base>` to take part in the base registry's
/// sub-type aware equality.
pub trait InstanceOf<T>: Any {
    fn as_instance(&self) -> &T;
}

impl<T: 'static> InstanceOf<T> for T {
    fn as_instance(&self) -> &T {
        self
    }
}
