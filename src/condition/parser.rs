//! Recursive-descent parser for filter queries
//!
//! Parses queries like:
//! - `id=1`
//! - `member_id>100 && (division=engineering || division=finance)`
//! - `join_date>="2020-01-01 00:00:00"`
//!
//! Parsing is lenient: malformed input degrades to a best-effort tree and
//! never returns an error.

use super::ast::{Attribute, Condition, LogicalOp};
use super::lexer::{tokenize, Token};

/// Parse a query string into a condition tree.
///
/// The root is a group of the top-level terms. A query without any complete
/// `name op value` term yields [`Condition::empty`].
pub fn parse(query: &str) -> Condition {
    let tokens = tokenize(query);
    let (children, _) = parse_group(&tokens);
    log::debug!(
        "parsed {:?} into {} top-level condition(s)",
        query,
        children.len()
    );
    group_or_empty(children)
}

/// Parse one nesting level.
///
/// Returns the children built at this level and the number of tokens
/// consumed, including the closing `)` if one ended the level.
fn parse_group(tokens: &[Token]) -> (Vec<Condition>, usize) {
    let mut children = Vec::new();
    let mut pending: Option<LogicalOp> = None;
    let mut current: Option<Attribute> = None;
    let mut pos = 0;

    while pos < tokens.len() {
        let token = &tokens[pos];
        pos += 1;

        match token {
            Token::RParen => break,
            Token::LParen => {
                let (nested, consumed) = parse_group(&tokens[pos..]);
                pos += consumed;
                children.push(group_or_empty(nested).with_operator(pending));
            }
            Token::Logical(op) => {
                pending = Some(*op);
                current = None;
            }
            Token::Compare(op) => {
                if let Some(attribute) = current.as_mut() {
                    attribute.operator = Some(*op);
                }
            }
            Token::Ident(text) => match current.take() {
                None => current = Some(Attribute::named(text.as_str())),
                Some(mut attribute) => {
                    attribute.value = text.clone();
                    children.push(Condition::leaf(attribute).with_operator(pending));
                }
            },
        }
    }

    (children, pos)
}

fn group_or_empty(children: Vec<Condition>) -> Condition {
    if children.is_empty() {
        Condition::empty()
    } else {
        Condition::group(children)
    }
}
