// SPDX-License-Identifier: MIT

//! Filter query parsing and evaluation
//!
//! Queries like `member_id>100 && (division=engineering || division=finance)`
//! are parsed into a [`Condition`] tree, which can then be:
//! - evaluated against a [`Record`] (typed structs or JSON objects)
//! - used to filter a collection of records
//! - matched against another condition
//! - serialized to and from JSON

pub mod condition;
pub mod error;
pub mod record;
pub mod rules;

pub use condition::{parse, Attribute, CompareOp, Condition, LogicalOp, Node};
pub use error::{FilterError, Result};
pub use record::{Record, Value};
pub use rules::{Rule, RuleLoader, RuleSet};
