// SPDX-License-Identifier: MIT

//! Scalar coercions and typed comparators
//!
//! Coercions are lenient: unparseable numbers become 0 and unparseable
//! timestamps become the zero time, so a bad literal makes a comparison
//! false instead of failing the evaluation.

use super::ast::CompareOp;
use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;

/// The only timestamp layout understood in queries and JSON records
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `0001-01-01 00:00:00`, what an unparseable timestamp coerces to
pub static ZERO_TIME: Lazy<NaiveDateTime> = Lazy::new(|| {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
});

pub fn parse_time(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT).ok()
}

pub fn time_or_zero(text: &str) -> NaiveDateTime {
    parse_time(text).unwrap_or(*ZERO_TIME)
}

pub fn float_or_zero(text: &str) -> f64 {
    text.parse().unwrap_or(0.0)
}

/// Only `t` and `true` are true
pub fn parse_bool(text: &str) -> bool {
    matches!(text, "t" | "true")
}

/// Case-insensitive text equality
pub fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}

/// `left op right` over numbers
pub fn compare_numeric(left: f64, op: CompareOp, right: f64) -> bool {
    match op {
        CompareOp::Eq => left == right,
        CompareOp::Lt => left < right,
        CompareOp::Lte => left <= right,
        CompareOp::Gt => left > right,
        CompareOp::Gte => left >= right,
    }
}

/// `left op right` over timestamps
pub fn compare_temporal(left: &NaiveDateTime, op: CompareOp, right: &NaiveDateTime) -> bool {
    match op {
        CompareOp::Eq => left == right,
        CompareOp::Lt => left < right,
        CompareOp::Lte => left <= right,
        CompareOp::Gt => left > right,
        CompareOp::Gte => left >= right,
    }
}
