//! Downloaded report reader

use super::decoders::decoder_for;
use super::types::ReportRow;
use crate::error::{Error, Result};
use crate::http::{redact_api_key, HttpClient};
use crate::types::{ExportFormat, JsonValue};
use tracing::debug;

/// Fetches a report file and holds its rows in memory
#[derive(Debug, Clone)]
pub struct ReportReader {
    url: String,
    format: ExportFormat,
    http: Option<HttpClient>,
    rows: Vec<ReportRow>,
    loaded: bool,
}

impl ReportReader {
    /// Reader for the report at `url`
    pub fn new(url: impl Into<String>, format: ExportFormat) -> Result<Self> {
        let url = url.into().trim().to_string();
        if url.is_empty() {
            return Err(Error::invalid_argument("report_url"));
        }
        Ok(Self {
            url,
            format,
            http: None,
            rows: Vec::new(),
            loaded: false,
        })
    }

    /// Download through `http` instead of a default client
    #[must_use]
    pub fn with_client(mut self, http: HttpClient) -> Self {
        self.http = Some(http);
        self
    }

    /// Download and decode the report
    pub async fn read(&mut self) -> Result<&[ReportRow]> {
        let http = match &self.http {
            Some(http) => http.clone(),
            None => HttpClient::new()?,
        };

        let body = http.get_text(&self.url).await?;
        self.rows = decoder_for(self.format).decode(&body)?;
        self.loaded = true;

        debug!(
            "Read {} {} rows from {}",
            self.rows.len(),
            self.format,
            redact_api_key(&self.url)
        );
        Ok(&self.rows)
    }

    pub fn report_url(&self) -> &str {
        &self.url
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    /// Whether [`read`](Self::read) has completed
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Number of rows; a CSV header counts as a row
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReportRow> {
        self.rows.iter()
    }

    /// All rows as one JSON array
    pub fn data(&self) -> JsonValue {
        JsonValue::Array(self.rows.iter().map(ReportRow::to_json).collect())
    }

    /// Take the rows out of the reader
    pub fn into_rows(self) -> Vec<ReportRow> {
        self.rows
    }
}

impl<'a> IntoIterator for &'a ReportReader {
    type Item = &'a ReportRow;
    type IntoIter = std::slice::Iter<'a, ReportRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
