//! Request and response types for the Management API

use crate::error::{Error, Result};
use crate::query::{ParamValue, QueryStringBuilder};
use crate::types::JsonValue;
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Request
// ============================================================================

/// One `<controller>/<action>.json` call
///
/// Built once with [`ReportRequest::param`] and then only read.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    controller: String,
    action: String,
    api_key: String,
    params: Vec<(String, ParamValue)>,
}

impl ReportRequest {
    pub fn new(
        controller: impl Into<String>,
        action: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            controller: controller.into(),
            action: action.into(),
            api_key: api_key.into(),
            params: Vec::new(),
        }
    }

    /// Append a parameter
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Append a parameter when a value is present
    #[must_use]
    pub fn param_opt<V: Into<ParamValue>>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(name, value),
            None => self,
        }
    }

    pub fn controller(&self) -> &str {
        &self.controller
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn params(&self) -> &[(String, ParamValue)] {
        &self.params
    }

    /// Value of the first parameter called `name`
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Encoded query string, `api_key` first
    pub fn query_string(&self) -> Result<String> {
        for (name, value) in [
            ("controller", &self.controller),
            ("action", &self.action),
            ("api_key", &self.api_key),
        ] {
            if value.trim().is_empty() {
                return Err(Error::invalid_argument(name));
            }
        }

        let api_key = ParamValue::Str(self.api_key.clone());
        let mut qs = QueryStringBuilder::new();
        qs.add("api_key", Some(&api_key))?;
        for (name, value) in &self.params {
            qs.add(name, Some(value))?;
        }
        Ok(qs.build())
    }

    /// Full request URL below `api_url`
    pub fn url(&self, api_url: &str, api_version: &str) -> Result<String> {
        let query = self.query_string()?;
        let url = format!(
            "{}/{}/{}/{}.json?{}",
            api_url.trim_end_matches('/'),
            api_version.trim_matches('/'),
            self.controller.trim_matches('/'),
            self.action.trim_matches('/'),
            query
        );
        url::Url::parse(&url)?;
        Ok(url)
    }
}

// ============================================================================
// Response
// ============================================================================

/// Parsed Management API answer
///
/// The JSON envelope carries `data`, `errors`, `status_code` and
/// `response_size`; all are optional here because error pages and proxies
/// do not always send them.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportResponse {
    http_code: u16,
    json: Option<JsonValue>,
    headers: HashMap<String, String>,
    request_url: String,
}

impl ReportResponse {
    /// `request_url` should already have its api key masked
    pub fn new(
        http_code: u16,
        json: Option<JsonValue>,
        headers: HashMap<String, String>,
        request_url: impl Into<String>,
    ) -> Self {
        Self {
            http_code,
            json,
            headers,
            request_url: request_url.into(),
        }
    }

    /// Response with a JSON body and no headers
    pub fn from_json(http_code: u16, json: JsonValue, request_url: impl Into<String>) -> Self {
        Self::new(http_code, Some(json), HashMap::new(), request_url)
    }

    pub fn http_code(&self) -> u16 {
        self.http_code
    }

    pub fn is_success(&self) -> bool {
        self.http_code == 200
    }

    /// Whole decoded body
    pub fn json_body(&self) -> Option<&JsonValue> {
        self.json.as_ref()
    }

    /// Envelope `data`, if present and not null
    pub fn data(&self) -> Option<&JsonValue> {
        self.envelope("data")
    }

    /// Envelope `errors`, if present and not null
    pub fn errors(&self) -> Option<&JsonValue> {
        self.envelope("errors")
    }

    /// Whether `errors` holds anything
    pub fn has_errors(&self) -> bool {
        match self.errors() {
            Some(JsonValue::Array(items)) => !items.is_empty(),
            Some(JsonValue::Object(map)) => !map.is_empty(),
            Some(JsonValue::String(s)) => !s.is_empty(),
            Some(JsonValue::Bool(b)) => *b,
            Some(_) => true,
            None => false,
        }
    }

    /// Envelope `status_code`
    pub fn status_code(&self) -> Option<i64> {
        self.envelope("status_code").and_then(JsonValue::as_i64)
    }

    /// Envelope `response_size`
    pub fn response_size(&self) -> Option<i64> {
        self.envelope("response_size").and_then(|v| {
            v.as_i64()
                .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
        })
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Request URL with the api key masked
    pub fn request_url(&self) -> &str {
        &self.request_url
    }

    fn envelope(&self, key: &str) -> Option<&JsonValue> {
        self.json
            .as_ref()
            .and_then(|json| json.get(key))
            .filter(|value| !value.is_null())
    }
}

impl fmt::Display for ReportResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {} {}", self.http_code, self.request_url)?;
        if let Some(errors) = self.errors() {
            write!(f, " errors={errors}")?;
        }
        Ok(())
    }
}
