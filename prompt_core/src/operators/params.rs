//! Operator invocations and their parameters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Named parameters for one operator invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatorParams(Map<String, Value>);

impl OperatorParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The first non-blank string found under any of `keys`.
    ///
    /// Aliases let callers use either the short or the long parameter name.
    pub fn text(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|key| self.0.get(*key))
            .filter_map(Value::as_str)
            .map(str::trim)
            .find(|text| !text.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for OperatorParams {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// One entry of an operator pipeline: `{name, params}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorCall {
    pub name: String,
    #[serde(default)]
    pub params: OperatorParams,
}

impl OperatorCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: OperatorParams::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params = self.params.with(key, value);
        self
    }
}
