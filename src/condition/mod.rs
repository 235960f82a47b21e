// SPDX-License-Identifier: MIT

//! Filter query language
//!
//! This module provides parsing and evaluation of filter queries.
//! Queries are `name op value` terms joined by `&&`/`||` and grouped with
//! parentheses, like:
//! - `id=1`
//! - `member_id>100 && (division=engineering || division=finance)`
//! - `join_date>="2020-01-01 00:00:00"`
//!
//! A parsed [`Condition`] can be evaluated against a record, against a
//! collection of records, or against another condition.

mod ast;
mod classify;
mod compare;
mod evaluator;
mod filter;
mod lexer;
pub mod matcher;
mod parser;

pub use ast::{Attribute, CompareOp, Condition, LogicalOp, Node};
pub use classify::{classify, ValueKind};
pub use compare::{parse_time, DATE_TIME_FORMAT};
pub use evaluator::{evaluate, evaluate_json};
pub use filter::{evaluate_many, filter, filter_json, CompositeRecord};
pub use lexer::{tokenize, Token};
pub use parser::parse;
