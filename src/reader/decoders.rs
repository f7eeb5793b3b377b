//! Decoder implementations

use super::types::{ReportDecoder, ReportRow};
use crate::error::Result;
use crate::types::{ExportFormat, JsonValue};

// ============================================================================
// CSV Decoder
// ============================================================================

/// CSV decoder
///
/// The header row is returned as the first record. Records may differ in
/// length.
#[derive(Debug, Clone)]
pub struct CsvReportDecoder {
    delimiter: u8,
}

impl Default for CsvReportDecoder {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvReportDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoder for another single-byte delimiter
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl ReportDecoder for CsvReportDecoder {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn decode(&self, body: &str) -> Result<Vec<ReportRow>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(body.as_bytes());

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(ReportRow::Csv(record.iter().map(str::to_string).collect()));
        }
        Ok(rows)
    }
}

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON decoder: an array yields one row per element
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReportDecoder;

impl JsonReportDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Parse the body without splitting it into rows
    pub fn decode_raw(&self, body: &str) -> Result<JsonValue> {
        Ok(serde_json::from_str(body)?)
    }
}

impl ReportDecoder for JsonReportDecoder {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn decode(&self, body: &str) -> Result<Vec<ReportRow>> {
        Ok(match self.decode_raw(body)? {
            JsonValue::Array(items) => items.into_iter().map(ReportRow::Json).collect(),
            other => vec![ReportRow::Json(other)],
        })
    }
}

/// Decoder for `format`
pub fn decoder_for(format: ExportFormat) -> Box<dyn ReportDecoder> {
    match format {
        ExportFormat::Csv => Box::new(CsvReportDecoder::new()),
        ExportFormat::Json => Box::new(JsonReportDecoder::new()),
    }
}
