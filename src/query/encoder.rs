//! Query string encoding
//!
//! Turns logical request parameters into the URL query string the
//! Management API expects. A handful of parameter names get special
//! treatment before encoding:
//!
//! | name     | transform                                              |
//! |----------|--------------------------------------------------------|
//! | `fields` | all whitespace removed                                 |
//! | `group`  | all whitespace removed                                 |
//! | `filter` | whitespace runs collapsed to a single space            |
//! | `sort`   | one `sort[<field>]=<ASC\|DESC>` pair per entry         |
//!
//! Booleans become `true`/`false`. Missing and blank values are dropped.

use crate::error::{Error, Result};
use crate::types::SortDirection;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use url::form_urlencoded;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Remove every whitespace character
pub(crate) fn strip_whitespace(value: &str) -> String {
    WHITESPACE.replace_all(value, "").into_owned()
}

/// Collapse whitespace runs to one space and trim the ends
pub(crate) fn collapse_whitespace(value: &str) -> String {
    WHITESPACE.replace_all(value.trim(), " ").into_owned()
}

/// A single query parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Free-form string
    Str(String),
    /// Integer (limit, page, ...)
    Int(i64),
    /// Boolean flag
    Bool(bool),
    /// List of names, sent comma-joined
    List(Vec<String>),
    /// Ordered field → direction pairs (only meaningful for `sort`)
    Sort(Vec<(String, String)>),
}

impl ParamValue {
    /// Sort value from already validated directions
    pub fn sort<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, SortDirection)>,
        S: Into<String>,
    {
        Self::Sort(
            entries
                .into_iter()
                .map(|(field, dir)| (field.into(), dir.as_str().to_string()))
                .collect(),
        )
    }

    /// Whether the value would produce no query output
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Str(s) => s.trim().is_empty(),
            Self::List(items) => items.iter().all(|s| s.trim().is_empty()),
            Self::Sort(entries) => entries.is_empty(),
            Self::Int(_) | Self::Bool(_) => false,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::List(items) => f.write_str(&items.join(",")),
            Self::Sort(entries) => {
                let parts: Vec<String> = entries.iter().map(|(k, v)| format!("{k}:{v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Builds an `application/x-www-form-urlencoded` query string
#[derive(Debug, Clone, Default)]
pub struct QueryStringBuilder {
    pairs: Vec<(String, String)>,
}

impl QueryStringBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one parameter, applying its name-specific transform
    ///
    /// `None` and blank values are skipped without error.
    pub fn add(&mut self, name: &str, value: Option<&ParamValue>) -> Result<&mut Self> {
        let Some(value) = value else {
            return Ok(self);
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid_argument("name"));
        }
        if value.is_blank() {
            return Ok(self);
        }

        self.add_checked(name, value)
            .map_err(|e| Error::encode(name, value.to_string(), e.to_string()))?;
        Ok(self)
    }

    /// Add every `(name, value)` pair in order
    pub fn extend<'a, I>(&mut self, params: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (&'a str, Option<&'a ParamValue>)>,
    {
        for (name, value) in params {
            self.add(name, value)?;
        }
        Ok(self)
    }

    fn add_checked(&mut self, name: &str, value: &ParamValue) -> Result<()> {
        match (name, value) {
            ("sort", ParamValue::Sort(entries)) => {
                for (field, direction) in entries {
                    let direction: SortDirection = direction.parse()?;
                    self.push(format!("sort[{}]", field.trim()), direction.as_str());
                }
            }
            ("sort", _) => {
                return Err(Error::validation(
                    "sort",
                    "value is not a field to direction mapping",
                ));
            }
            ("fields" | "group", value) => {
                self.push(name, strip_whitespace(&plain(value)));
            }
            ("filter", value) => {
                self.push(name, collapse_whitespace(&plain(value)));
            }
            (_, ParamValue::Bool(b)) => {
                self.push(name, if *b { "true" } else { "false" });
            }
            (_, ParamValue::Str(s)) => {
                self.push(name, s.trim());
            }
            (_, value) => {
                self.push(name, plain(value));
            }
        }
        Ok(())
    }

    fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Number of encoded pairs
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether nothing has been added
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Percent-encoded query string, without the leading `?`
    pub fn build(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (name, value) in &self.pairs {
            serializer.append_pair(name, value);
        }
        serializer.finish()
    }
}

impl fmt::Display for QueryStringBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

/// Unencoded textual form of a non-sort value
fn plain(value: &ParamValue) -> String {
    match value {
        ParamValue::List(items) => items
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}
