//! Tagged configuration values.
//!
//! Every source that enters the assembler is converted into a [`ConfigValue`]
//! at the boundary. The variant decides how the merge engine treats it:
//! mappings and sequences recurse, everything else is copied as a unit.

mod convert;
mod opaque;

use std::collections::BTreeMap;
use std::ops::Index;

use serde_json::Number;

pub use opaque::{OpaqueHandle, OpaqueValue};

/// Mapping from string keys to configuration values.
pub type ConfigMap = BTreeMap<String, ConfigValue>;

static ABSENT: ConfigValue = ConfigValue::Absent;

/// A single configuration value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ConfigValue {
    /// No value. Absent entries never overwrite existing ones during a merge.
    #[default]
    Absent,
    /// Explicit null.
    Null,
    /// Boolean scalar.
    Bool(bool),
    /// Numeric scalar.
    Number(Number),
    /// String scalar.
    String(String),
    /// Nested key/value container.
    Mapping(ConfigMap),
    /// Ordered container merged index by index.
    Sequence(Vec<Self>),
    /// Host value merged by handle, never by structure.
    Opaque(OpaqueHandle),
}

impl ConfigValue {
    /// Create an empty mapping.
    #[must_use]
    pub const fn mapping() -> Self {
        Self::Mapping(ConfigMap::new())
    }

    /// Create an empty sequence.
    #[must_use]
    pub const fn sequence() -> Self {
        Self::Sequence(Vec::new())
    }

    /// Returns `true` for [`ConfigValue::Absent`].
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Returns `true` for mappings and sequences.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Mapping(_) | Self::Sequence(_))
    }

    /// Returns `true` for mappings.
    #[must_use]
    pub const fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }

    /// Borrow the inner mapping, if any.
    #[must_use]
    pub const fn as_mapping(&self) -> Option<&ConfigMap> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow the inner sequence, if any.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow the inner string, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }

    /// Copy out the inner boolean, if any.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Read the inner number as `i64`, if it fits.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(number) => number.as_i64(),
            _ => None,
        }
    }

    /// Look up `key` in a mapping.
    ///
    /// Returns `None` for missing keys and for non-mapping values.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Follow a dotted path through nested mappings and sequences.
    ///
    /// Sequence segments must be decimal indices.
    ///
    /// ```rust
    /// use envlayer::ConfigValue;
    /// use serde_json::json;
    ///
    /// let value = ConfigValue::from(json!({"db": {"hosts": ["a", "b"]}}));
    /// assert_eq!(value.lookup("db.hosts.1"), Some(&ConfigValue::from("b")));
    /// assert!(value.lookup("db.port").is_none());
    /// ```
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<&Self> {
        path.split('.').try_fold(self, |current, segment| match current {
            Self::Mapping(map) => map.get(segment),
            Self::Sequence(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|index| items.get(index)),
            _ => None,
        })
    }
}

impl Index<&str> for ConfigValue {
    type Output = Self;

    /// Missing keys and non-mapping values index to [`ConfigValue::Absent`].
    fn index(&self, key: &str) -> &Self::Output {
        self.get(key).unwrap_or(&ABSENT)
    }
}

impl Index<usize> for ConfigValue {
    type Output = Self;

    fn index(&self, index: usize) -> &Self::Output {
        self.as_sequence()
            .and_then(|items| items.get(index))
            .unwrap_or(&ABSENT)
    }
}
