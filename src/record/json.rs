// SPDX-License-Identifier: MIT

//! JSON objects as records

use super::{Record, Value};
use crate::condition::parse_time;
use crate::error::{FilterError, Result};
use serde_json::{Map, Value as JsonValue};

impl Record for Map<String, JsonValue> {
    fn attribute(&self, name: &str) -> Option<Value> {
        self.get(name).and_then(json_to_value)
    }

    fn sub_record(&self, key: &str) -> Result<Option<&dyn Record>> {
        match self.get(key) {
            None | Some(JsonValue::Null) => Ok(None),
            Some(JsonValue::Object(map)) => Ok(Some(map)),
            Some(_) => Err(FilterError::UnableToCastRecord(key.to_string())),
        }
    }

    fn type_name(&self) -> &str {
        "object"
    }
}

/// Scalar JSON values become attributes; strings in the timestamp layout
/// are timestamps.
fn json_to_value(value: &JsonValue) -> Option<Value> {
    match value {
        JsonValue::Bool(b) => Some(Value::Bool(*b)),
        JsonValue::Number(n) => n
            .as_i64()
            .map(Value::Int)
            .or_else(|| n.as_f64().map(Value::Float)),
        JsonValue::String(s) => Some(match parse_time(s) {
            Some(time) => Value::Time(time),
            None => Value::Str(s.clone()),
        }),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}
