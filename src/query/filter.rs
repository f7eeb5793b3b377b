//! Filter expression validation
//!
//! Filters use a small SQL-like grammar. Validation is token-level only:
//! parentheses must balance and every token must be a quoted literal, an
//! integer, a known operator or conjunction, or a lowercase dotted field
//! name. Operator arity and conjunction placement are left to the server.

use super::encoder::collapse_whitespace;
use crate::error::{Error, Result};
use crate::fields::FieldMap;
use regex::Regex;
use std::sync::LazyLock;

/// Comparison operators accepted inside a filter
pub const FILTER_OPERATIONS: &[&str] = &[
    "=", "!=", "<", "<=", ">", ">=", "IS", "NOT", "NULL", "IN", "LIKE", "RLIKE", "REGEXP",
    "BETWEEN",
];

/// Conjunctions accepted between filter terms
pub const FILTER_CONJUNCTIONS: &[&str] = &["AND", "OR"];

static QUOTED_LITERAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^'\w+'$").unwrap());

static FIELD_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9._]+$").unwrap());

/// Kind of a single filter token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterToken {
    QuotedLiteral,
    Integer,
    Operator,
    Conjunction,
    Field,
}

/// Check that every `(` has a matching `)` and none closes early
pub fn is_parentheses_balanced(s: &str) -> bool {
    let mut depth: i64 = 0;
    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// Classify a token without consulting any field catalog
pub fn classify_token(token: &str) -> Option<FilterToken> {
    if QUOTED_LITERAL.is_match(token) {
        Some(FilterToken::QuotedLiteral)
    } else if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
        Some(FilterToken::Integer)
    } else if FILTER_OPERATIONS.contains(&token) {
        Some(FilterToken::Operator)
    } else if FILTER_CONJUNCTIONS.contains(&token) {
        Some(FilterToken::Conjunction)
    } else if FIELD_NAME.is_match(token) {
        Some(FilterToken::Field)
    } else {
        None
    }
}

/// Validate a filter and return it in canonical parenthesised form
///
/// With `catalog` set, field tokens must also name a known field. The
/// result is wrapped in exactly one outer pair of parentheses: a filter that
/// is already fully enclosed is returned as is.
pub fn validate_filter(filter: &str, catalog: Option<&FieldMap>) -> Result<String> {
    let invalid = || Error::validation("filter", format!("'{filter}'"));

    let collapsed = collapse_whitespace(filter);
    if collapsed.is_empty() {
        return Err(invalid());
    }
    if !is_parentheses_balanced(&collapsed) {
        return Err(invalid());
    }

    let bare = collapse_whitespace(&collapsed.replace(['(', ')'], " "));
    if bare.is_empty() {
        return Err(invalid());
    }

    for token in bare.split(' ') {
        match classify_token(token) {
            Some(FilterToken::Field) => {
                if let Some(fields) = catalog {
                    if !fields.contains_key(token) {
                        return Err(invalid());
                    }
                }
            }
            Some(_) => {}
            None => return Err(invalid()),
        }
    }

    Ok(wrap_once(&collapsed))
}

/// Wrap `expr` in parentheses unless one pair already encloses all of it
pub(crate) fn wrap_once(expr: &str) -> String {
    if is_fully_enclosed(expr) {
        expr.to_string()
    } else {
        format!("({expr})")
    }
}

fn is_fully_enclosed(expr: &str) -> bool {
    if !(expr.starts_with('(') && expr.ends_with(')')) {
        return false;
    }
    let mut depth = 0i64;
    let last = expr.len() - 1;
    for (i, c) in expr.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 && i != last {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}
