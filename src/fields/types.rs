//! Field catalog types

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// Field name → descriptor, ordered by name
pub type FieldMap = BTreeMap<String, FieldDescriptor>;

/// One queryable field of a report endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    /// Returned when no explicit field list is requested
    pub default: bool,
    /// Belongs to a joined entity (`site.name`, `publisher.ref`, ...)
    pub related: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, default: bool, related: bool) -> Self {
        Self {
            name: name.into(),
            default,
            related,
        }
    }
}

// ============================================================================
// Field Selection
// ============================================================================

/// Bit flags choosing which catalog fields to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldSelection(u8);

impl FieldSelection {
    pub const ALL: Self = Self(0);
    pub const DEFAULT: Self = Self(1);
    pub const RELATED: Self = Self(2);
    pub const MINIMAL: Self = Self(4);
    pub const RECOMMENDED: Self = Self(8);

    /// Raw flag bits
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Whether every bit of `other` is set
    pub fn contains(self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }
}

impl BitOr for FieldSelection {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FieldSelection {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl FromStr for FieldSelection {
    type Err = Error;

    /// Parses `default`, `related+minimal`, `all`, ...
    fn from_str(s: &str) -> Result<Self> {
        let mut selection = Self::ALL;
        for part in s.split(['+', ',', '|']).map(str::trim).filter(|p| !p.is_empty()) {
            selection |= match part.to_lowercase().as_str() {
                "all" => Self::ALL,
                "default" => Self::DEFAULT,
                "related" => Self::RELATED,
                "minimal" => Self::MINIMAL,
                "recommended" => Self::RECOMMENDED,
                other => return Err(Error::validation("fields", format!("'{other}'"))),
            };
        }
        Ok(selection)
    }
}

impl fmt::Display for FieldSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("all");
        }
        let names: Vec<&str> = [
            (Self::DEFAULT, "default"),
            (Self::RELATED, "related"),
            (Self::MINIMAL, "minimal"),
            (Self::RECOMMENDED, "recommended"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect();
        f.write_str(&names.join("+"))
    }
}

// ============================================================================
// API metadata
// ============================================================================

/// One entry of `apidoc/get_controllers` `fields`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiField {
    pub name: String,
    #[serde(default, deserialize_with = "flag")]
    pub related: bool,
    #[serde(default, rename = "type")]
    pub field_type: Option<String>,
    #[serde(default, rename = "fieldDefault", deserialize_with = "flag")]
    pub field_default: bool,
}

/// One controller entry of `apidoc/get_controllers`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiModel {
    #[serde(default, rename = "modelName")]
    pub model_name: Option<String>,
    #[serde(default)]
    pub fields: Vec<ApiField>,
}

/// Accepts `true`, `1`, `"1"` and `"true"` as set
fn flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        serde_json::Value::String(s) => matches!(s.as_str(), "1" | "true"),
        _ => false,
    })
}
