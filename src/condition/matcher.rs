// SPDX-License-Identifier: MIT

//! Rule-against-rule matching
//!
//! Checks whether a candidate condition tree satisfies a reference tree. The
//! walk follows the shape of the reference; for each reference leaf the
//! candidate is searched for leaves on the same attribute, and candidate
//! leaves on other attributes are skipped rather than counted as failures.

use super::ast::{accumulate, Attribute, CompareOp, Condition, LogicalOp, Node};
use super::classify::{classify, ValueKind};
use super::compare::{
    compare_numeric, compare_temporal, eq_ignore_case, float_or_zero, time_or_zero,
};
use crate::error::Result;

/// Whether `candidate` satisfies `reference`
pub fn evaluate(reference: &Condition, candidate: &Condition) -> Result<bool> {
    let candidate = normalize(reference, candidate);
    Ok(match_reference(reference, &candidate))
}

/// Copy of `candidate` with a failing `name=""` leaf ANDed on for every
/// attribute the reference names but the candidate does not.
///
/// Neither input is modified. A leaf candidate is wrapped in a new group
/// when leaves have to be added.
pub fn normalize(reference: &Condition, candidate: &Condition) -> Condition {
    let present = candidate.attribute_names();
    let missing: Vec<Condition> = reference
        .attribute_names()
        .into_iter()
        .filter(|name| !present.contains(name))
        .map(|name| {
            Condition::leaf(Attribute::new(name, CompareOp::Eq, ""))
                .with_operator(Some(LogicalOp::And))
        })
        .collect();

    if missing.is_empty() {
        return candidate.clone();
    }
    log::debug!(
        "candidate lacks {} referenced attribute(s), adding failing placeholders",
        missing.len()
    );

    let mut children = match &candidate.node {
        Node::Group(children) => children.clone(),
        Node::Leaf(_) => vec![candidate.clone().with_operator(None)],
    };
    children.extend(missing);
    Condition::group(children).with_operator(candidate.operator)
}

fn match_reference(reference: &Condition, candidate: &Condition) -> bool {
    match &reference.node {
        Node::Group(children) => {
            let mut matched = None;
            for child in children {
                let child_matched = match_reference(child, candidate);
                matched = Some(accumulate(matched, child.operator, child_matched));
            }
            matched.unwrap_or(false)
        }
        Node::Leaf(attribute) if attribute.is_empty() => false,
        Node::Leaf(attribute) => match_leaf(attribute, candidate).unwrap_or(false),
    }
}

/// Result of one reference leaf against a candidate subtree; `None` means
/// the subtree says nothing about the attribute (skip).
fn match_leaf(reference: &Attribute, candidate: &Condition) -> Option<bool> {
    match &candidate.node {
        Node::Group(children) => {
            let mut matched = None;
            for child in children {
                if let Some(child_matched) = match_leaf(reference, child) {
                    matched = Some(accumulate(matched, child.operator, child_matched));
                }
            }
            matched
        }
        Node::Leaf(attribute) if attribute.name == reference.name => {
            Some(compare_leaves(reference, attribute))
        }
        Node::Leaf(_) => None,
    }
}

/// `candidate.value op reference.value`, typed by the reference literal
fn compare_leaves(reference: &Attribute, candidate: &Attribute) -> bool {
    match reference.operator {
        None => false,
        Some(CompareOp::Eq) => eq_ignore_case(&candidate.value, &reference.value),
        Some(op) => match classify(&reference.value) {
            ValueKind::Temporal => compare_temporal(
                &time_or_zero(&candidate.value),
                op,
                &time_or_zero(&reference.value),
            ),
            ValueKind::Numeric | ValueKind::Opaque => compare_numeric(
                float_or_zero(&candidate.value),
                op,
                float_or_zero(&reference.value),
            ),
        },
    }
}

impl Condition {
    /// Whether `candidate` satisfies this condition, treating this
    /// condition as the reference rule
    pub fn matches_condition(&self, candidate: &Condition) -> Result<bool> {
        evaluate(self, candidate)
    }
}
