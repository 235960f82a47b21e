// SPDX-License-Identifier: MIT

//! Literal type classification
//!
//! Decides whether a literal compares as a number, a timestamp or opaque text.

use super::compare::parse_time;

/// Comparison family of a literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Numeric,
    Temporal,
    Opaque,
}

/// Classify a literal.
///
/// Commas are ignored as thousands separators. Digits make the text numeric,
/// a single decimal point must be followed by another digit, and a second
/// decimal point or any other character makes it opaque. Opaque text in the
/// `YYYY-MM-DD HH:MM:SS` layout is temporal.
pub fn classify(text: &str) -> ValueKind {
    let mut kind = ValueKind::Opaque;
    let mut index = 0;
    let mut dots = 0;

    for c in text.chars() {
        match c {
            ',' => continue,
            '0'..='9' => {
                if index == 0 || dots == 1 {
                    kind = ValueKind::Numeric;
                }
            }
            '.' => {
                if index > 0 && kind == ValueKind::Numeric {
                    dots += 1;
                    kind = ValueKind::Opaque;
                }
                if dots > 1 {
                    kind = ValueKind::Opaque;
                    break;
                }
            }
            _ => {
                kind = ValueKind::Opaque;
                break;
            }
        }
        index += 1;
    }

    if kind == ValueKind::Opaque && parse_time(text).is_some() {
        ValueKind::Temporal
    } else {
        kind
    }
}
