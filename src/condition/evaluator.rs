//! Condition evaluator against concrete records

use super::ast::{accumulate, Attribute, CompareOp, Condition, Node};
use super::compare::{compare_numeric, compare_temporal, float_or_zero, parse_bool, time_or_zero};
use crate::error::{FilterError, Result};
use crate::record::{Record, Value};
use serde_json::Value as JsonValue;

/// Evaluate a condition tree against one record.
///
/// Every child of a group is evaluated, left to right; each child after the
/// first is combined with the running result by its own operator.
pub fn evaluate(condition: &Condition, record: &dyn Record) -> Result<bool> {
    match &condition.node {
        Node::Group(children) => {
            let mut matched = None;
            for child in children {
                let child_matched = evaluate(child, record)?;
                matched = Some(accumulate(matched, child.operator, child_matched));
            }
            Ok(matched.unwrap_or(false))
        }
        Node::Leaf(attribute) => evaluate_leaf(attribute, record),
    }
}

/// Evaluate a condition against a JSON value, which must be an object
pub fn evaluate_json(condition: &Condition, data: &JsonValue) -> Result<bool> {
    match data {
        JsonValue::Null => Err(FilterError::invalid_input("nil")),
        JsonValue::Object(map) => evaluate(condition, map),
        _ => Err(FilterError::invalid_type("object")),
    }
}

/// Look up an attribute by exact name, then through a one-level `key.` qualifier
pub(crate) fn lookup(record: &dyn Record, name: &str) -> Result<Option<Value>> {
    if let Some(value) = record.attribute(name) {
        return Ok(Some(value));
    }
    if let Some((key, rest)) = name.split_once('.') {
        if let Some(sub) = record.sub_record(key)? {
            return Ok(sub.attribute(rest));
        }
    }
    Ok(None)
}

fn evaluate_leaf(attribute: &Attribute, record: &dyn Record) -> Result<bool> {
    let Some(op) = attribute.operator else {
        return Ok(false);
    };
    if attribute.is_empty() {
        return Ok(false);
    }
    let Some(value) = lookup(record, &attribute.name)? else {
        log::trace!("attribute '{}' not present in record", attribute.name);
        return Ok(false);
    };

    let literal = attribute.value.as_str();
    let matched = match value {
        // fractional literals compare as floats so `1000` and `1000.0` agree
        Value::Int(n) => match literal.parse::<i64>() {
            Ok(expected) if op == CompareOp::Eq => n == expected,
            Ok(expected) => compare_numeric(n as f64, op, expected as f64),
            Err(_) => compare_numeric(n as f64, op, float_or_zero(literal)),
        },
        Value::Float(n) => compare_numeric(n, op, float_or_zero(literal)),
        Value::Time(t) => compare_temporal(&t, op, &time_or_zero(literal)),
        // text and booleans only support equality; ordering is always false
        Value::Bool(b) => op == CompareOp::Eq && b == parse_bool(literal),
        Value::Str(s) => op == CompareOp::Eq && s == literal,
    };
    Ok(matched)
}

impl Condition {
    /// Whether `record` satisfies this condition
    pub fn matches(&self, record: &dyn Record) -> Result<bool> {
        evaluate(self, record)
    }

    /// Whether a JSON object satisfies this condition
    pub fn matches_json(&self, data: &JsonValue) -> Result<bool> {
        evaluate_json(self, data)
    }
}
