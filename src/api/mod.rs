pub mod client;
#[cfg(test)]
pub mod stub;

use serde_json::Value;
use std::fmt;

/// Endpoints exposed by the offset API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `topic -> {total, <partition>...}`
    LatestOffset,
    /// `group -> topic -> {total, <partition>...}`
    ConsumerGroupDistance,
}

impl Endpoint {
    pub const fn path(self) -> &'static str {
        match self {
            Self::LatestOffset => "latest_offset",
            Self::ConsumerGroupDistance => "consumer_group_distance",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Classified response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiPayload {
    /// Top-level entries in the order the API returned them.
    WellFormed(Vec<(String, Value)>),
    Malformed(String),
}

impl ApiPayload {
    pub fn from_body(body: &[u8]) -> Self {
        let value: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(e) => return Self::Malformed(format!("invalid JSON: {e}")),
        };

        match container_entries(value) {
            Ok(entries) => Self::WellFormed(entries),
            Err(kind) => Self::Malformed(format!("expected a JSON object or array, got {kind}")),
        }
    }
}

/// Keyed entries of a JSON object, or of an array keyed by index. Any other value
/// is rejected with its kind.
pub fn container_entries(value: Value) -> Result<Vec<(String, Value)>, &'static str> {
    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        Value::Array(items) => Ok(items
            .into_iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item))
            .collect()),
        other => Err(value_kind(&other)),
    }
}

pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
