// SPDX-License-Identifier: MIT

//! Query tokenizer
//!
//! Splits `id=1 && (division=engineering || division="people ops")` into
//! identifiers, comparison operators, logical connectives and parentheses.
//! Lexing never fails; odd input simply yields odd tokens.

use super::ast::{CompareOp, LogicalOp};

/// A lexical token of the query language
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Attribute name or literal value (quotes already stripped)
    Ident(String),
    Compare(CompareOp),
    Logical(LogicalOp),
    LParen,
    RParen,
}

/// Tokenize a query string, left to right
pub fn tokenize(query: &str) -> Vec<Token> {
    let mut lexer = Lexer::default();
    let mut chars = query.chars().peekable();

    while let Some(c) = chars.next() {
        if lexer.in_quote {
            if c == '"' {
                lexer.in_quote = false;
            } else {
                lexer.buffer.push(c);
            }
            continue;
        }

        match c {
            '"' => {
                lexer.in_quote = true;
                lexer.quoted = true;
            }
            c if c.is_whitespace() => lexer.flush(),
            '(' => lexer.emit(Token::LParen),
            ')' => lexer.emit(Token::RParen),
            '=' => lexer.emit(Token::Compare(CompareOp::Eq)),
            '<' => {
                let op = match chars.next_if_eq(&'=') {
                    Some(_) => CompareOp::Lte,
                    None => CompareOp::Lt,
                };
                lexer.emit(Token::Compare(op));
            }
            '>' => {
                let op = match chars.next_if_eq(&'=') {
                    Some(_) => CompareOp::Gte,
                    None => CompareOp::Gt,
                };
                lexer.emit(Token::Compare(op));
            }
            '&' | '|' => match chars.next_if_eq(&c) {
                Some(_) => {
                    let op = if c == '&' {
                        LogicalOp::And
                    } else {
                        LogicalOp::Or
                    };
                    lexer.emit(Token::Logical(op));
                }
                // unpaired: part of the surrounding literal
                None => lexer.buffer.push(c),
            },
            _ => lexer.buffer.push(c),
        }
    }
    lexer.flush();

    log::trace!("tokenized {:?} into {:?}", query, lexer.tokens);
    lexer.tokens
}

#[derive(Default)]
struct Lexer {
    tokens: Vec<Token>,
    buffer: String,
    in_quote: bool,
    /// Set once the pending literal contained a quote, so `""` still counts
    quoted: bool,
}

impl Lexer {
    fn flush(&mut self) {
        if !self.buffer.is_empty() || self.quoted {
            self.tokens.push(Token::Ident(std::mem::take(&mut self.buffer)));
        }
        self.quoted = false;
    }

    fn emit(&mut self, token: Token) {
        self.flush();
        self.tokens.push(token);
    }
}
