//! Endpoint configuration and report parameters

use crate::types::{AggregationType, CohortInterval, CohortType, ExportFormat, Timestamp};
use serde::{Deserialize, Serialize};

/// How `fields`, `group`, `sort` and `filter` names are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Syntax only, no server round trip
    #[default]
    Local,
    /// Names must also exist in the endpoint's field catalog
    Catalog,
}

impl ValidationMode {
    pub fn from_flag(validate_fields: bool) -> Self {
        if validate_fields {
            Self::Catalog
        } else {
            Self::Local
        }
    }
}

/// Parameters shared by `count`, `find` and `export`
///
/// Each action sends only the parameters it understands; insights
/// endpoints additionally require `cohort_type` (and `aggregation_type` for
/// `find`/`export`) and a non-empty `group`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportParams {
    pub start_date: String,
    pub end_date: String,
    pub fields: Vec<String>,
    pub filter: Option<String>,
    pub group: Vec<String>,
    pub sort: Vec<(String, String)>,
    pub limit: Option<u32>,
    pub page: Option<u32>,
    pub format: Option<ExportFormat>,
    pub timestamp: Option<Timestamp>,
    pub cohort_type: Option<CohortType>,
    pub aggregation_type: Option<AggregationType>,
    pub cohort_interval: Option<CohortInterval>,
    pub response_timezone: Option<String>,
}

impl ReportParams {
    /// Parameters for the given date range
    pub fn new(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
            ..Self::default()
        }
    }

    /// Requested fields; names are trimmed when validated
    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    #[must_use]
    pub fn group<I, S>(mut self, group: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group = group.into_iter().map(Into::into).collect();
        self
    }

    /// Add one sort entry; direction is checked when the request is built
    #[must_use]
    pub fn sort(mut self, field: impl Into<String>, direction: impl Into<String>) -> Self {
        self.sort.push((field.into(), direction.into()));
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn format(mut self, format: ExportFormat) -> Self {
        self.format = Some(format);
        self
    }

    #[must_use]
    pub fn timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    #[must_use]
    pub fn cohort_type(mut self, cohort_type: CohortType) -> Self {
        self.cohort_type = Some(cohort_type);
        self
    }

    #[must_use]
    pub fn aggregation_type(mut self, aggregation_type: AggregationType) -> Self {
        self.aggregation_type = Some(aggregation_type);
        self
    }

    #[must_use]
    pub fn cohort_interval(mut self, interval: CohortInterval) -> Self {
        self.cohort_interval = Some(interval);
        self
    }

    #[must_use]
    pub fn response_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.response_timezone = Some(timezone.into());
        self
    }
}
