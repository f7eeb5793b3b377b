//! Report row types and the decoder trait

use crate::error::Result;
use crate::types::{ExportFormat, JsonValue};

/// One record of a downloaded report
#[derive(Debug, Clone, PartialEq)]
pub enum ReportRow {
    /// CSV record, cells in column order
    Csv(Vec<String>),
    /// JSON array element
    Json(JsonValue),
}

impl ReportRow {
    /// Row as JSON: CSV cells become an array of strings
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::Csv(cells) => JsonValue::Array(
                cells.iter().cloned().map(JsonValue::String).collect(),
            ),
            Self::Json(value) => value.clone(),
        }
    }

    /// CSV cells, if this is a CSV row
    pub fn as_cells(&self) -> Option<&[String]> {
        match self {
            Self::Csv(cells) => Some(cells),
            Self::Json(_) => None,
        }
    }
}

/// Turns a downloaded report body into rows
pub trait ReportDecoder: Send + Sync {
    /// Format this decoder reads
    fn format(&self) -> ExportFormat;

    /// Decode the whole body
    fn decode(&self, body: &str) -> Result<Vec<ReportRow>>;
}
