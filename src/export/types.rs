//! Export job types

use crate::error::{Error, Result};
use crate::service::ReportResponse;
use crate::types::{BackoffType, JsonValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default delay between status requests
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

// ============================================================================
// Job State
// ============================================================================

/// State of a queued export as reported by the status endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportStatus {
    /// Queued or being generated
    #[default]
    Running,
    /// Report file is ready
    Complete,
    /// Generation failed on the server
    Fail,
}

impl ExportStatus {
    /// Map a server status string; anything not terminal counts as running
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "complete" => Self::Complete,
            "fail" => Self::Fail,
            _ => Self::Running,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Fail)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Complete => "complete",
            Self::Fail => "fail",
        }
    }
}

impl fmt::Display for ExportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A report generation job on the export queue
#[derive(Debug, Clone, PartialEq)]
pub struct ExportJob {
    pub job_id: String,
    pub status: ExportStatus,
    /// Most recent status response
    pub last_response: Option<ReportResponse>,
    /// Non-terminal status responses seen so far
    pub attempts: u32,
}

impl ExportJob {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            status: ExportStatus::Running,
            last_response: None,
            attempts: 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Download URL from the last response, read with `shape`
    pub fn report_url(&self, shape: ResponseShape) -> Result<String> {
        let response = self.last_response.as_ref().ok_or(Error::NoResponse)?;
        shape.report_url(response)
    }
}

// ============================================================================
// Endpoint Families
// ============================================================================

/// Where a value sits inside the response `data`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// Directly in `data`: job id is `data`, url is `data.url`
    TopLevel,
    /// One level down: job id is `data.job_id`, url is `data.data.url`
    Nested,
}

impl ResponseShape {
    /// Job id from an export submission response
    pub fn job_id(self, response: &ReportResponse) -> Result<String> {
        let data = response.data().ok_or_else(|| Error::MissingData {
            url: response.request_url().to_string(),
        })?;

        let value = match self {
            Self::TopLevel => Some(data),
            Self::Nested => data.get("job_id"),
        };

        match value.and_then(scalar_string) {
            Some(job_id) if !job_id.is_empty() => Ok(job_id),
            _ => Err(Error::decode(format!(
                "Failed to return job id: {}",
                response.request_url()
            ))),
        }
    }

    /// Download URL from a completed status response
    pub fn report_url(self, response: &ReportResponse) -> Result<String> {
        let data = response.data().ok_or_else(|| Error::MissingData {
            url: response.request_url().to_string(),
        })?;

        let holder = match self {
            Self::TopLevel => Some(data),
            Self::Nested => data.get("data"),
        };

        holder
            .and_then(|h| h.get("url"))
            .and_then(JsonValue::as_str)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::decode(format!(
                    "Export response does not contain a report url: {}",
                    response.request_url()
                ))
            })
    }
}

fn scalar_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.trim().to_string()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Report endpoint families that share one export protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointFamily {
    /// Row-level logs (installs, clicks, events, ...)
    Logs,
    /// Aggregated stats
    Actuals,
    /// Cohort, retention and lifetime value
    Insights,
}

impl EndpointFamily {
    /// Action that queues an export
    pub fn export_action(self) -> &'static str {
        match self {
            Self::Logs | Self::Actuals => "find_export_queue",
            Self::Insights => "export",
        }
    }

    /// Controller polled for export status
    pub fn status_controller(self, controller: &str) -> String {
        match self {
            Self::Logs | Self::Actuals => "export".to_string(),
            Self::Insights => controller.to_string(),
        }
    }

    /// Action polled for export status
    pub fn status_action(self) -> &'static str {
        match self {
            Self::Logs | Self::Actuals => "download",
            Self::Insights => "status",
        }
    }

    /// Where the job id sits in an export response
    pub fn job_id_shape(self) -> ResponseShape {
        match self {
            Self::Logs | Self::Actuals => ResponseShape::TopLevel,
            Self::Insights => ResponseShape::Nested,
        }
    }

    /// Where the report url sits in a completed status response
    pub fn report_url_shape(self) -> ResponseShape {
        match self {
            Self::Logs | Self::Actuals => ResponseShape::Nested,
            Self::Insights => ResponseShape::TopLevel,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Logs => "logs",
            Self::Actuals => "actuals",
            Self::Insights => "insights",
        }
    }
}

impl fmt::Display for EndpointFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Poll Policy
// ============================================================================

/// Pacing and bounds of a status polling loop
///
/// Without `max_attempts` or `timeout` the loop runs until the job reaches
/// a terminal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay after the first non-terminal response
    pub interval: Duration,
    /// Upper bound for a growing delay
    pub max_interval: Duration,
    /// How the delay grows between attempts
    pub backoff: BackoffType,
    /// Maximum number of status requests
    pub max_attempts: Option<u32>,
    /// Maximum wall time for the whole loop
    pub timeout: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_interval: Duration::from_secs(300),
            backoff: BackoffType::Constant,
            max_attempts: None,
            timeout: None,
        }
    }
}

impl PollPolicy {
    /// Constant polling every `interval`, unbounded
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_backoff(mut self, backoff: BackoffType, max_interval: Duration) -> Self {
        self.backoff = backoff;
        self.max_interval = max_interval;
        self
    }

    /// Sleep after the given zero-based non-terminal attempt
    pub fn delay(&self, attempt: u32) -> Duration {
        let max = self.max_interval.max(self.interval);
        self.backoff.delay(self.interval, max, attempt)
    }
}
