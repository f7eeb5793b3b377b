//! Management API request client

use super::types::{ReportRequest, ReportResponse};
use crate::error::{Error, Result};
use crate::http::{redact_api_key, HttpClient, RequestConfig};
use crate::types::JsonValue;
use std::collections::HashMap;
use tracing::debug;

/// Default Management API host
pub const DEFAULT_API_URL: &str = "https://api.mobileapptracking.com";

/// Default Management API version path segment
pub const DEFAULT_API_VERSION: &str = "v2";

/// Sends [`ReportRequest`]s and decodes the JSON envelope
#[derive(Debug, Clone)]
pub struct ReportRequestClient {
    http: HttpClient,
    api_url: String,
    api_version: String,
    response: Option<ReportResponse>,
}

impl ReportRequestClient {
    pub fn new(http: HttpClient, api_url: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into(),
            api_version: api_version.into(),
            response: None,
        }
    }

    /// Client against the public API with a default transport
    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(
            HttpClient::new()?,
            DEFAULT_API_URL,
            DEFAULT_API_VERSION,
        ))
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// URL `request` would be sent to
    pub fn request_url(&self, request: &ReportRequest) -> Result<String> {
        request.url(&self.api_url, &self.api_version)
    }

    /// Execute `request` and return the decoded response for any status
    pub async fn send(&self, request: &ReportRequest) -> Result<ReportResponse> {
        self.send_with_config(request, RequestConfig::default()).await
    }

    /// [`send`](Self::send) with per-request transport overrides
    pub async fn send_with_config(
        &self,
        request: &ReportRequest,
        config: RequestConfig,
    ) -> Result<ReportResponse> {
        let url = self.request_url(request)?;
        let masked = redact_api_key(&url);

        let response = self.http.get_with_config(&url, config).await?;
        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
            .collect();
        let body = response.text().await?;

        let json = if body.trim().is_empty() {
            None
        } else {
            match serde_json::from_str::<JsonValue>(&body) {
                Ok(json) => Some(json),
                Err(e) if status == 200 => {
                    return Err(Error::decode(format!("{e}: {masked}")));
                }
                Err(e) => {
                    debug!("Discarding non-JSON body from {}: {}", masked, e);
                    None
                }
            }
        };

        debug!(
            "{}/{} -> HTTP {}",
            request.controller(),
            request.action(),
            status
        );
        Ok(ReportResponse::new(status, json, headers, masked))
    }

    /// Execute `request`, keeping the response for [`response`](Self::response)
    ///
    /// Returns `Ok(true)` only for HTTP 200. Transport failures are errors.
    pub async fn call(&mut self, request: &ReportRequest) -> Result<bool> {
        self.response = None;
        let response = self.send(request).await?;
        let ok = response.is_success();
        self.response = Some(response);
        Ok(ok)
    }

    /// Response of the last [`call`](Self::call)
    pub fn response(&self) -> Option<&ReportResponse> {
        self.response.as_ref()
    }
}
