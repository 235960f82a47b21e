// SPDX-License-Identifier: MIT

//! Records that conditions are evaluated against
//!
//! This module provides:
//! - `Value` - the typed value of one record attribute
//! - `Record` - attribute lookup by external name, plus qualified sub-records
//! - `impl_record!` - implements `Record` for a plain struct
//! - a `Record` implementation for JSON objects

mod json;

use crate::error::Result;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::fmt;

/// Typed value of a record attribute
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Time(NaiveDateTime),
    Bool(bool),
    Str(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Time(t) => write!(f, "{}", t.format(crate::condition::DATE_TIME_FORMAT)),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Something a condition can be evaluated against
pub trait Record {
    /// Value of the named attribute.
    ///
    /// `None` when the record has no such attribute or the attribute is
    /// nullable and currently holds nothing.
    fn attribute(&self, name: &str) -> Option<Value>;

    /// Nested record addressed by a `key.` qualifier
    fn sub_record(&self, _key: &str) -> Result<Option<&dyn Record>> {
        Ok(None)
    }

    /// Key this record is filed under inside a composite record
    fn type_name(&self) -> &str {
        "record"
    }
}

/// Conversion of a struct field into an attribute value
pub trait AttributeValue {
    fn to_value(&self) -> Option<Value>;
}

macro_rules! int_attribute {
    ($($ty:ty),*) => {
        $(
            impl AttributeValue for $ty {
                fn to_value(&self) -> Option<Value> {
                    i64::try_from(*self).ok().map(Value::Int)
                }
            }
        )*
    };
}

int_attribute!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl AttributeValue for f32 {
    fn to_value(&self) -> Option<Value> {
        Some(Value::Float(f64::from(*self)))
    }
}

impl AttributeValue for f64 {
    fn to_value(&self) -> Option<Value> {
        Some(Value::Float(*self))
    }
}

impl AttributeValue for bool {
    fn to_value(&self) -> Option<Value> {
        Some(Value::Bool(*self))
    }
}

impl AttributeValue for String {
    fn to_value(&self) -> Option<Value> {
        Some(Value::Str(self.clone()))
    }
}

impl AttributeValue for &str {
    fn to_value(&self) -> Option<Value> {
        Some(Value::Str((*self).to_string()))
    }
}

impl AttributeValue for NaiveDateTime {
    fn to_value(&self) -> Option<Value> {
        Some(Value::Time(*self))
    }
}

impl AttributeValue for DateTime<Utc> {
    fn to_value(&self) -> Option<Value> {
        Some(Value::Time(self.naive_utc()))
    }
}

impl<T: AttributeValue> AttributeValue for Option<T> {
    fn to_value(&self) -> Option<Value> {
        self.as_ref().and_then(AttributeValue::to_value)
    }
}

/// Implement [`Record`] for a struct by mapping attribute names to fields.
///
/// ```
/// use ast_filter::impl_record;
///
/// struct Account {
///     id: i64,
///     division: String,
///     score: Option<i32>,
/// }
///
/// impl_record!(Account {
///     "id" => id,
///     "division" => division,
///     "score" => score,
/// });
/// ```
#[macro_export]
macro_rules! impl_record {
    ($ty:ident { $($name:literal => $field:ident),* $(,)? }) => {
        impl $crate::record::Record for $ty {
            fn attribute(&self, name: &str) -> Option<$crate::record::Value> {
                match name {
                    $($name => $crate::record::AttributeValue::to_value(&self.$field),)*
                    _ => None,
                }
            }

            fn type_name(&self) -> &str {
                stringify!($ty)
            }
        }
    };
}
