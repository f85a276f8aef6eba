//! Values that can live behind an accessor.

use std::any::type_name;
use std::hash::Hash;
use std::sync::LazyLock;

use fieldkit_common::{significant, Describe};
use regex::Regex;

static MODULE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\w+::)+").expect("module path pattern is valid"));

/// A field value a registry can validate, compare, hash, and print.
///
/// `is_significant` decides whether a value counts as present for required
/// field checks. `measured_length` is the length compared against a max
/// length; `None` means the value has no measurable length and can never
/// exceed one.
pub trait FieldValue: Clone + PartialEq + Hash + Describe + Send + Sync + 'static {
    fn is_significant(&self) -> bool {
        true
    }

    fn measured_length(&self) -> Option<usize> {
        None
    }
}

impl FieldValue for String {
    fn is_significant(&self) -> bool {
        significant::is_significant(self)
    }

    fn measured_length(&self) -> Option<usize> {
        Some(self.chars().count())
    }
}

impl FieldValue for &'static str {
    fn is_significant(&self) -> bool {
        significant::is_significant(self)
    }

    fn measured_length(&self) -> Option<usize> {
        Some(self.chars().count())
    }
}

impl<V: FieldValue> FieldValue for Option<V> {
    fn is_significant(&self) -> bool {
        self.as_ref().is_some_and(FieldValue::is_significant)
    }

    fn measured_length(&self) -> Option<usize> {
        self.as_ref().and_then(FieldValue::measured_length)
    }
}

impl<V: FieldValue> FieldValue for Vec<V> {
    fn is_significant(&self) -> bool {
        !self.is_empty()
    }
}

impl<V: FieldValue> FieldValue for Box<V> {
    fn is_significant(&self) -> bool {
        (**self).is_significant()
    }

    fn measured_length(&self) -> Option<usize> {
        (**self).measured_length()
    }
}

macro_rules! impl_field_value {
    ($($t:ty),* $(,)?) => {
        $(impl FieldValue for $t {})*
    };
}

impl_field_value!(bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl FieldValue for char {}

/// The type name of `X` with module paths stripped.
///
/// `alloc::string::String` becomes `String` and
/// `core::option::Option<alloc::string::String>` becomes `Option<String>`.
pub fn short_type_name<X: ?Sized>() -> String {
    MODULE_PATH.replace_all(type_name::<X>(), "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_significance_and_length() {
        assert!("hello".to_string().is_significant());
        assert!(!"   ".to_string().is_significant());
        assert_eq!("héllo".to_string().measured_length(), Some(5));
        assert_eq!("abc".measured_length(), Some(3));
    }

    #[test]
    fn test_option_delegates() {
        assert!(!None::<String>.is_significant());
        assert!(!Some(" ".to_string()).is_significant());
        assert!(Some(3i32).is_significant());
        assert_eq!(Some("hello!".to_string()).measured_length(), Some(6));
        assert_eq!(None::<String>.measured_length(), None);
    }

    #[test]
    fn test_non_text_never_measures() {
        assert_eq!(123_456_789u64.measured_length(), None);
        assert_eq!(vec![1i32, 2, 3].measured_length(), None);
        assert!(!Vec::<i32>::new().is_significant());
        assert!(0i32.is_significant());
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<String>(), "String");
        assert_eq!(short_type_name::<Option<String>>(), "Option<String>");
        assert_eq!(short_type_name::<i32>(), "i32");
        assert_eq!(short_type_name::<Vec<Option<u8>>>(), "Vec<Option<u8>>");
    }
}
