//! Request parameter bags and merge semantics.
//!
//! API calls carry a flat set of named parameters. Values are either plain
//! strings or arbitrary JSON data; non-string values are encoded to their
//! canonical JSON text when the form body is built. Client-level default
//! parameters merge with per-call parameters, call-level entries winning on
//! key collision.

use std::collections::HashMap;

use serde::Serialize;

/// A single parameter value: either a plain string, sent as-is, or JSON
/// data, sent as its canonical JSON text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// A plain string, placed into the form encoding unchanged.
    String(String),
    /// Arbitrary JSON data, serialized to canonical JSON text.
    Json(serde_json::Value),
}

impl ParamValue {
    /// Builds a JSON parameter value from any serializable type.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if the value cannot be represented
    /// as JSON.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self::Json)
    }

    /// Renders the value as it will appear in the form body.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if a JSON value cannot be
    /// serialized.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::String(s) => Ok(s.clone()),
            Self::Json(v) => serde_json::to_string(v),
        }
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<serde_json::Value> for ParamValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Json(serde_json::Value::from(value))
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Json(serde_json::Value::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Json(serde_json::Value::from(value))
    }
}

/// A named parameter set for an API call.
///
/// # Example
///
/// ```rust
/// use capture_api::Params;
/// use serde_json::json;
///
/// let mut params = Params::new();
/// params.set("type_name", "user");
/// params.set("attributes", json!(["displayName", "email"]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Params(HashMap<String, ParamValue>);

impl Params {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, replacing any previous value for the key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Sets a parameter and returns the set, for fluent construction.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Returns the value for `key`, if set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Removes the value for `key`, returning it if it was set.
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.0.remove(key)
    }

    /// Returns `true` if no parameters are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of parameters set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Overlays `overrides` onto a copy of this set; entries in `overrides`
    /// win on key collision, keys absent from it keep their value here.
    #[must_use]
    pub fn merged(&self, overrides: &Self) -> Self {
        let mut merged = self.clone();
        for (key, value) in &overrides.0 {
            merged.0.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Encodes the set into form values, serializing non-string values to
    /// canonical JSON text.
    ///
    /// # Errors
    ///
    /// Returns a [`serde_json::Error`] if any value cannot be serialized;
    /// no partial encoding is produced.
    pub fn form_values(&self) -> Result<HashMap<String, String>, serde_json::Error> {
        let mut values = HashMap::with_capacity(self.0.len());
        for (key, value) in &self.0 {
            values.insert(key.clone(), value.encode()?);
        }
        Ok(values)
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
