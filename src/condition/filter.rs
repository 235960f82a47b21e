// SPDX-License-Identifier: MIT

//! Collection filtering and multi-record evaluation

use super::ast::Condition;
use super::evaluator::{evaluate, evaluate_json};
use crate::error::{FilterError, Result};
use crate::record::{Record, Value};
use serde_json::Value as JsonValue;

/// Records that satisfy `condition`, in their original order.
///
/// Stops at the first evaluation error.
pub fn filter<'a, R: Record>(condition: &Condition, items: &'a [R]) -> Result<Vec<&'a R>> {
    let mut passed = Vec::new();
    for item in items {
        if evaluate(condition, item)? {
            passed.push(item);
        }
    }
    log::debug!("filter kept {}/{} record(s)", passed.len(), items.len());
    Ok(passed)
}

/// Elements of a JSON array that satisfy `condition`, in their original order
pub fn filter_json(condition: &Condition, items: &JsonValue) -> Result<Vec<JsonValue>> {
    let items = match items {
        JsonValue::Null => return Err(FilterError::invalid_input("nil")),
        JsonValue::Array(items) => items,
        _ => return Err(FilterError::invalid_type("array")),
    };

    let mut passed = Vec::new();
    for item in items {
        if evaluate_json(condition, item)? {
            passed.push(item.clone());
        }
    }
    log::debug!("filter kept {}/{} element(s)", passed.len(), items.len());
    Ok(passed)
}

/// Several records viewed as one, each reachable as `TypeName.field`
pub struct CompositeRecord<'a> {
    parts: Vec<(&'a str, &'a dyn Record)>,
}

impl<'a> CompositeRecord<'a> {
    pub fn new() -> Self {
        Self { parts: Vec::new() }
    }

    /// File `record` under its own [`Record::type_name`]
    pub fn push(&mut self, record: &'a dyn Record) {
        self.parts.push((record.type_name(), record));
    }

    /// File `record` under an explicit key
    pub fn insert(&mut self, key: &'a str, record: &'a dyn Record) {
        self.parts.push((key, record));
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl Default for CompositeRecord<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Record for CompositeRecord<'_> {
    fn attribute(&self, _name: &str) -> Option<Value> {
        None
    }

    fn sub_record(&self, key: &str) -> Result<Option<&dyn Record>> {
        for (name, record) in &self.parts {
            if *name == key {
                return Ok(Some(*record));
            }
        }
        Ok(None)
    }

    fn type_name(&self) -> &str {
        "composite"
    }
}

/// Evaluate `condition` against several records at once.
///
/// A single record is evaluated directly; several are combined into a
/// [`CompositeRecord`] keyed by type name.
pub fn evaluate_many(condition: &Condition, records: &[&dyn Record]) -> Result<bool> {
    match records {
        [] => Err(FilterError::invalid_input("empty")),
        [record] => evaluate(condition, *record),
        records => {
            let mut composite = CompositeRecord::new();
            for record in records {
                composite.push(*record);
            }
            evaluate(condition, &composite)
        }
    }
}

impl Condition {
    /// Records that satisfy this condition, in their original order
    pub fn filter<'a, R: Record>(&self, items: &'a [R]) -> Result<Vec<&'a R>> {
        filter(self, items)
    }

    /// Elements of a JSON array that satisfy this condition
    pub fn filter_json(&self, items: &JsonValue) -> Result<Vec<JsonValue>> {
        filter_json(self, items)
    }

    /// Whether several records together satisfy this condition
    pub fn matches_many(&self, records: &[&dyn Record]) -> Result<bool> {
        evaluate_many(self, records)
    }
}
