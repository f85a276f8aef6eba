use std::fmt;

use serde::{Deserialize, Serialize};

/// How a field participates in required-value checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessorKind {
    /// Populated by the system (ids, timestamps); absent values are allowed.
    Auto,
    /// Must hold a significant value.
    Required,
    /// May be absent.
    Optional,
}

impl AccessorKind {
    /// Metadata a new descriptor of this kind starts with.
    pub fn initial_meta_data(self) -> &'static str {
        match self {
            AccessorKind::Auto => "auto",
            AccessorKind::Required => "required",
            AccessorKind::Optional => "",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccessorKind::Auto => "auto",
            AccessorKind::Required => "required",
            AccessorKind::Optional => "optional",
        }
    }
}

impl fmt::Display for AccessorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_meta_data() {
        assert_eq!(AccessorKind::Auto.initial_meta_data(), "auto");
        assert_eq!(AccessorKind::Required.initial_meta_data(), "required");
        assert_eq!(AccessorKind::Optional.initial_meta_data(), "");
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&AccessorKind::Required).unwrap();
        assert_eq!(json, "\"required\"");
        let kind: AccessorKind = serde_json::from_str("\"optional\"").unwrap();
        assert_eq!(kind, AccessorKind::Optional);
    }
}
