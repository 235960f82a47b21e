// SPDX-License-Identifier: MIT

//! Condition tree produced by the parser and walked by every evaluator
//!
//! A node is either a leaf holding one attribute comparison or a group of
//! child nodes. Every node except the root carries the logical operator that
//! joins it to its preceding sibling.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// =
    Eq,
    /// <
    Lt,
    /// <=
    Lte,
    /// >
    Gt,
    /// >=
    Gte,
}

impl CompareOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CompareOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(CompareOp::Eq),
            "<" => Ok(CompareOp::Lt),
            "<=" => Ok(CompareOp::Lte),
            ">" => Ok(CompareOp::Gt),
            ">=" => Ok(CompareOp::Gte),
            other => Err(format!("unknown comparison operator '{}'", other)),
        }
    }
}

/// Logical connectives between sibling conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    /// && (stored as "AND")
    And,
    /// || (stored as "OR")
    Or,
}

impl LogicalOp {
    /// Query syntax for this connective
    pub fn symbol(&self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
        }
    }

    pub fn apply(self, left: bool, right: bool) -> bool {
        match self {
            LogicalOp::And => left && right,
            LogicalOp::Or => left || right,
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOp::And => write!(f, "AND"),
            LogicalOp::Or => write!(f, "OR"),
        }
    }
}

impl FromStr for LogicalOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AND" | "&&" => Ok(LogicalOp::And),
            "OR" | "||" => Ok(LogicalOp::Or),
            other => Err(format!("unknown logical operator '{}'", other)),
        }
    }
}

/// Fold one sibling result into the running result of its group.
///
/// The first contributing sibling seeds the accumulator; later ones combine
/// with their own operator, where anything other than OR means AND.
pub(crate) fn accumulate(acc: Option<bool>, operator: Option<LogicalOp>, value: bool) -> bool {
    match acc {
        None => value,
        Some(acc) => operator.unwrap_or(LogicalOp::And).apply(acc, value),
    }
}

/// A single `name op value` comparison.
///
/// The value is kept as raw text and coerced by each evaluator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(default)]
    pub name: String,
    /// Unset only for the empty leaf and for malformed terms
    #[serde(default, with = "op_text")]
    pub operator: Option<CompareOp>,
    #[serde(default)]
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, operator: CompareOp, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operator: Some(operator),
            value: value.into(),
        }
    }

    /// Attribute with a name only, as the parser starts one
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        write_literal(f, &self.name)?;
        match self.operator {
            Some(op) => {
                write!(f, "{}", op)?;
                write_literal(f, &self.value)
            }
            None if self.value.is_empty() => Ok(()),
            None => {
                write!(f, " ")?;
                write_literal(f, &self.value)
            }
        }
    }
}

fn write_literal(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    let needs_quotes = text.is_empty()
        || text
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '=' | '<' | '>' | '&' | '|'));
    if needs_quotes {
        write!(f, "\"{}\"", text)
    } else {
        write!(f, "{}", text)
    }
}

/// Shape of a condition node: exactly one of leaf or group
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf(Attribute),
    Group(Vec<Condition>),
}

/// A node of the condition tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConditionRepr", into = "ConditionRepr")]
pub struct Condition {
    /// Joins this node to its preceding sibling; unset on the root and on
    /// first children
    pub operator: Option<LogicalOp>,
    pub node: Node,
}

impl Condition {
    pub fn leaf(attribute: Attribute) -> Self {
        Self {
            operator: None,
            node: Node::Leaf(attribute),
        }
    }

    pub fn group(children: Vec<Condition>) -> Self {
        Self {
            operator: None,
            node: Node::Group(children),
        }
    }

    /// The leaf an empty query parses to; it never matches anything
    pub fn empty() -> Self {
        Self::leaf(Attribute::default())
    }

    pub fn with_operator(mut self, operator: Option<LogicalOp>) -> Self {
        self.operator = operator;
        self
    }

    pub fn attribute(&self) -> Option<&Attribute> {
        match &self.node {
            Node::Leaf(attribute) => Some(attribute),
            Node::Group(_) => None,
        }
    }

    /// Children of a group; empty for a leaf
    pub fn children(&self) -> &[Condition] {
        match &self.node {
            Node::Leaf(_) => &[],
            Node::Group(children) => children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.node, Node::Leaf(_))
    }

    /// Names of every non-empty leaf attribute in the tree
    pub fn attribute_names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names(&self, names: &mut BTreeSet<String>) {
        match &self.node {
            Node::Leaf(attribute) if !attribute.is_empty() => {
                names.insert(attribute.name.clone());
            }
            Node::Leaf(_) => {}
            Node::Group(children) => {
                for child in children {
                    child.collect_names(names);
                }
            }
        }
    }
}

/// Renders query text that parses back to the same tree.
///
/// Empty-leaf children render as `()`. The query syntax has no escapes, so a
/// name or value containing `"` (only reachable through deserialization) and
/// a leaf with an empty name but a value do not survive a round trip.
impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node {
            Node::Leaf(attribute) => write!(f, "{}", attribute),
            Node::Group(children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        let op = child.operator.unwrap_or(LogicalOp::And);
                        write!(f, " {} ", op.symbol())?;
                    }
                    if child.attribute().is_some_and(Attribute::is_empty) {
                        write!(f, "()")?;
                    } else if child.is_leaf() {
                        write!(f, "{}", child)?;
                    } else {
                        write!(f, "({})", child)?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// JSON form: `operator`, `attribute` and `conditions`, each omitted when unset
#[derive(Serialize, Deserialize)]
struct ConditionRepr {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "op_text"
    )]
    operator: Option<LogicalOp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attribute: Option<Attribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    conditions: Vec<Condition>,
}

impl TryFrom<ConditionRepr> for Condition {
    type Error = String;

    fn try_from(repr: ConditionRepr) -> Result<Self, Self::Error> {
        let node = match (repr.attribute, repr.conditions.is_empty()) {
            (Some(_), false) => {
                return Err("condition can't have both an attribute and conditions".to_string())
            }
            (None, true) => {
                return Err("condition needs either an attribute or conditions".to_string())
            }
            (Some(attribute), true) => Node::Leaf(attribute),
            (None, false) => Node::Group(repr.conditions),
        };
        Ok(Condition {
            operator: repr.operator,
            node,
        })
    }
}

impl From<Condition> for ConditionRepr {
    fn from(condition: Condition) -> Self {
        let (attribute, conditions) = match condition.node {
            Node::Leaf(attribute) => (Some(attribute), Vec::new()),
            Node::Group(children) => (None, children),
        };
        ConditionRepr {
            operator: condition.operator,
            attribute,
            conditions,
        }
    }
}

/// Operators travel as text, with "" standing for unset
mod op_text {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::fmt::Display;
    use std::str::FromStr;

    pub fn serialize<S, T>(op: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Display,
    {
        match op {
            Some(op) => serializer.collect_str(op),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
        T::Err: Display,
    {
        let text = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        if text.is_empty() {
            return Ok(None);
        }
        text.parse().map(Some).map_err(de::Error::custom)
    }
}
