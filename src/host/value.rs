//! Dynamically typed values crossing the host boundary
//!
//! The host speaks in loosely typed records. `HostValue` keeps the
//! distinctions that matter on the Rust side: `Null` versus `Undefined`,
//! and a NaN number versus a missing one (JSON cannot carry NaN, so the
//! host model is not `serde_json::Value` itself).

use std::collections::BTreeMap;

/// A value passed to or received from the host collaborator
#[derive(Debug, Clone, PartialEq, Default)]
pub enum HostValue {
    /// Key not present on the record
    #[default]
    Undefined,
    /// Explicit null
    Null,
    Bool(bool),
    /// Numbers are floating point, NaN included
    Number(f64),
    String(String),
    Object(BTreeMap<String, HostValue>),
}

static UNDEFINED: HostValue = HostValue::Undefined;

impl HostValue {
    /// Create an empty object
    pub fn object() -> Self {
        HostValue::Object(BTreeMap::new())
    }

    /// Look up a property. Missing keys and non-objects yield `Undefined`.
    pub fn get(&self, key: &str) -> &HostValue {
        match self {
            HostValue::Object(map) => map.get(key).unwrap_or(&UNDEFINED),
            _ => &UNDEFINED,
        }
    }

    /// Set a property, turning `self` into an object if it was not one
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<HostValue>) {
        if !matches!(self, HostValue::Object(_)) {
            *self = HostValue::object();
        }
        if let HostValue::Object(map) = self {
            map.insert(key.into(), value.into());
        }
    }

    /// Builder form of [`HostValue::set`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<HostValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn contains_key(&self, key: &str) -> bool {
        match self {
            HostValue::Object(map) => map.contains_key(key),
            _ => false,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, HostValue::Null)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, HostValue::Undefined)
    }

    /// True for `Null` and `Undefined`
    pub fn is_nullish(&self) -> bool {
        self.is_null() || self.is_undefined()
    }

    pub fn is_nan(&self) -> bool {
        matches!(self, HostValue::Number(n) if n.is_nan())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HostValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Integer view of a number, truncating any fraction. NaN and infinities
    /// have no integer view.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            HostValue::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            HostValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for HostValue {
    fn from(value: f64) -> Self {
        HostValue::Number(value)
    }
}

impl From<i64> for HostValue {
    fn from(value: i64) -> Self {
        HostValue::Number(value as f64)
    }
}

impl From<u64> for HostValue {
    fn from(value: u64) -> Self {
        HostValue::Number(value as f64)
    }
}

impl From<bool> for HostValue {
    fn from(value: bool) -> Self {
        HostValue::Bool(value)
    }
}

impl From<&str> for HostValue {
    fn from(value: &str) -> Self {
        HostValue::String(value.to_string())
    }
}

impl From<String> for HostValue {
    fn from(value: String) -> Self {
        HostValue::String(value)
    }
}

impl<T: Into<HostValue>> From<Option<T>> for HostValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(HostValue::Null, Into::into)
    }
}

impl From<serde_json::Value> for HostValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => HostValue::Null,
            Value::Bool(b) => HostValue::Bool(b),
            Value::Number(n) => HostValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => HostValue::String(s),
            // Arrays never appear in geolocation records; keep them opaque.
            Value::Array(_) => HostValue::Undefined,
            Value::Object(map) => HostValue::Object(
                map.into_iter().map(|(k, v)| (k, HostValue::from(v))).collect(),
            ),
        }
    }
}

impl From<&HostValue> for serde_json::Value {
    fn from(value: &HostValue) -> Self {
        use serde_json::Value;

        match value {
            HostValue::Undefined | HostValue::Null => Value::Null,
            HostValue::Bool(b) => Value::Bool(*b),
            HostValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            HostValue::String(s) => Value::String(s.clone()),
            HostValue::Object(map) => Value::Object(
                map.iter()
                    .filter(|(_, v)| !v.is_undefined())
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}
