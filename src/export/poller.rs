//! Export status polling
//!
//! Polls the status endpoint of a queued export until it reports `complete`
//! or `fail`. Polls are strictly sequential. A non-200 status response ends
//! the loop immediately. Cancellation and the optional [`PollPolicy`] bounds
//! are checked around every request and every sleep.

use super::types::{EndpointFamily, ExportJob, ExportStatus, PollPolicy};
use crate::error::{Error, Result};
use crate::http::RequestConfig;
use crate::service::{ReportRequest, ReportRequestClient, ReportResponse};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

// ============================================================================
// Status Source
// ============================================================================

/// Answers one status request for a job
///
/// `Ok(None)` means the request produced no response at all.
#[async_trait]
pub trait ExportStatusSource: Send + Sync {
    async fn status(&self, job_id: &str) -> Result<Option<ReportResponse>>;
}

/// Status source backed by the Management API
#[derive(Debug, Clone)]
pub struct ServiceStatusSource {
    client: ReportRequestClient,
    api_key: String,
    controller: String,
    action: String,
}

impl ServiceStatusSource {
    /// Status endpoint for exports of `controller` in `family`
    pub fn new(
        client: ReportRequestClient,
        api_key: impl Into<String>,
        family: EndpointFamily,
        controller: &str,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            controller: family.status_controller(controller),
            action: family.status_action().to_string(),
        }
    }

    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn action(&self) -> &str {
        &self.action
    }
}

#[async_trait]
impl ExportStatusSource for ServiceStatusSource {
    async fn status(&self, job_id: &str) -> Result<Option<ReportResponse>> {
        let request = ReportRequest::new(&self.controller, &self.action, &self.api_key)
            .param("job_id", job_id);
        // the poll loop is the only retry mechanism for status requests
        let response = self
            .client
            .send_with_config(&request, RequestConfig::new().retries(0))
            .await?;
        Ok(Some(response))
    }
}

// ============================================================================
// Poller
// ============================================================================

/// Drives one export job to a terminal state
#[derive(Clone)]
pub struct ExportJobPoller {
    source: Arc<dyn ExportStatusSource>,
    policy: PollPolicy,
    verbose: bool,
    cancel: CancellationToken,
}

impl ExportJobPoller {
    pub fn new(source: Arc<dyn ExportStatusSource>) -> Self {
        Self {
            source,
            policy: PollPolicy::default(),
            verbose: false,
            cancel: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Log every attempt at info level instead of debug
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Stop polling when `token` is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Token that stops this poller
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Poll until `job_id` completes
    ///
    /// Returns the terminal job with its last response. A `fail` status is
    /// returned as [`Error::ReportFailed`].
    pub async fn fetch(&self, job_id: &str) -> Result<ExportJob> {
        let job_id = job_id.trim();
        if job_id.is_empty() {
            return Err(Error::invalid_argument("job_id"));
        }

        let deadline = self.policy.timeout.map(|t| Instant::now() + t);
        let mut job = ExportJob::new(job_id);

        if self.verbose {
            info!("Polling export job '{}'", job_id);
        }

        loop {
            let polled = tokio::select! {
                biased;
                () = self.cancel.cancelled() => return Err(cancelled(&job)),
                () = sleep_until_deadline(deadline) => return Err(timed_out(&job, "deadline reached")),
                polled = self.source.status(job_id) => polled?,
            };

            let response = polled.ok_or(Error::NoResponse)?;
            job.status = check_status(&response)?;
            job.last_response = Some(response);

            if job.is_terminal() {
                break;
            }

            job.attempts += 1;
            if self.verbose {
                info!("Export job '{}' running, attempt {}", job_id, job.attempts);
            } else {
                debug!("Export job '{}' running, attempt {}", job_id, job.attempts);
            }

            if let Some(max) = self.policy.max_attempts {
                if job.attempts >= max {
                    return Err(timed_out(&job, &format!("{max} status requests made")));
                }
            }

            let delay = self.policy.delay(job.attempts - 1);
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => return Err(cancelled(&job)),
                () = sleep_until_deadline(deadline) => return Err(timed_out(&job, "deadline reached")),
                () = tokio::time::sleep(delay) => {}
            }
        }

        if self.verbose {
            info!(
                "Export job '{}' finished with status '{}' after {} attempts",
                job_id, job.status, job.attempts
            );
        }

        if job.status == ExportStatus::Fail {
            return Err(report_failed(&job));
        }

        Ok(job)
    }

    /// Run [`fetch`](Self::fetch) on a spawned task
    pub fn spawn(self, job_id: impl Into<String>) -> JoinHandle<Result<ExportJob>> {
        let job_id = job_id.into();
        tokio::spawn(async move { self.fetch(&job_id).await })
    }
}

impl std::fmt::Debug for ExportJobPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExportJobPoller")
            .field("policy", &self.policy)
            .field("verbose", &self.verbose)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// Validate one status response and read its job status
fn check_status(response: &ReportResponse) -> Result<ExportStatus> {
    if response.http_code() != 200 || response.has_errors() {
        return Err(Error::service(
            response.http_code(),
            response.request_url(),
        ));
    }

    let data = response.data().ok_or_else(|| Error::MissingData {
        url: response.request_url().to_string(),
    })?;

    data.get("status")
        .and_then(|s| s.as_str())
        .map(ExportStatus::parse)
        .ok_or_else(|| {
            Error::decode(format!(
                "Export data does not contain report 'status': {}",
                response.request_url()
            ))
        })
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn cancelled(job: &ExportJob) -> Error {
    Error::Cancelled {
        job_id: job.job_id.clone(),
        attempts: job.attempts,
    }
}

fn timed_out(job: &ExportJob, reason: &str) -> Error {
    Error::PollTimeout {
        job_id: job.job_id.clone(),
        attempts: job.attempts,
        message: reason.to_string(),
    }
}

fn report_failed(job: &ExportJob) -> Error {
    let (status, url, body) = job.last_response.as_ref().map_or_else(
        || (0, String::new(), serde_json::Value::Null),
        |r| {
            (
                r.http_code(),
                r.request_url().to_string(),
                r.json_body().cloned().unwrap_or_default(),
            )
        },
    );
    Error::ReportFailed {
        status,
        job_status: job.status.to_string(),
        url,
        response: Box::new(body),
    }
}
