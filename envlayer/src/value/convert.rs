//! Conversions between [`ConfigValue`] and serde/JSON representations.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use super::{ConfigMap, ConfigValue, OpaqueHandle};

impl ConfigValue {
    /// Render the value as JSON.
    ///
    /// Absent mapping entries are dropped, absent sequence items become
    /// `null`, and opaque values use their own JSON rendering.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Absent | Self::Null => Value::Null,
            Self::Bool(flag) => Value::Bool(*flag),
            Self::Number(number) => Value::Number(number.clone()),
            Self::String(text) => Value::String(text.clone()),
            Self::Mapping(map) => Value::Object(
                map.iter()
                    .filter(|(_, value)| !value.is_absent())
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect::<Map<String, Value>>(),
            ),
            Self::Sequence(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Opaque(handle) => handle.to_json(),
        }
    }
}

impl From<Value> for ConfigValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(flag),
            Value::Number(number) => Self::Number(number),
            Value::String(text) => Self::String(text),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&ConfigValue> for Value {
    fn from(value: &ConfigValue) -> Self {
        value.to_json()
    }
}

impl From<&str> for ConfigValue {
    fn from(text: &str) -> Self {
        Self::String(text.to_owned())
    }
}

impl From<String> for ConfigValue {
    fn from(text: String) -> Self {
        Self::String(text)
    }
}

impl From<bool> for ConfigValue {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<i64> for ConfigValue {
    fn from(number: i64) -> Self {
        Self::Number(number.into())
    }
}

impl From<u64> for ConfigValue {
    fn from(number: u64) -> Self {
        Self::Number(number.into())
    }
}

impl From<f64> for ConfigValue {
    /// Non-finite floats have no JSON form and become [`ConfigValue::Null`].
    fn from(number: f64) -> Self {
        Number::from_f64(number).map_or(Self::Null, Self::Number)
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(map: ConfigMap) -> Self {
        Self::Mapping(map)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(items: Vec<Self>) -> Self {
        Self::Sequence(items)
    }
}

impl From<OpaqueHandle> for ConfigValue {
    fn from(handle: OpaqueHandle) -> Self {
        Self::Opaque(handle)
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Absent | Self::Null => serializer.serialize_unit(),
            Self::Bool(flag) => serializer.serialize_bool(*flag),
            Self::Number(number) => number.serialize(serializer),
            Self::String(text) => serializer.serialize_str(text),
            Self::Mapping(map) => {
                let present = map.iter().filter(|(_, value)| !value.is_absent());
                let mut state = serializer.serialize_map(Some(present.clone().count()))?;
                for (key, value) in present {
                    state.serialize_entry(key, value)?;
                }
                state.end()
            }
            Self::Sequence(items) => {
                let mut state = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    state.serialize_element(item)?;
                }
                state.end()
            }
            Self::Opaque(handle) => handle.to_json().serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ConfigValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}
