//! SDK configuration
//!
//! Settings can be loaded from YAML, from `TUNE_REPORTING_*` environment
//! variables, or both: [`SdkConfig::with_env_overrides`] applies the
//! environment on top of a file.

use crate::error::{Error, Result, ResultExt};
use crate::export::PollPolicy;
use crate::http::{HttpClient, HttpClientConfig, RateLimiterConfig};
use crate::service::{ReportRequestClient, DEFAULT_API_URL, DEFAULT_API_VERSION};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete SDK configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SdkConfig {
    /// Management API key
    #[serde(default)]
    pub api_key: String,

    /// API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// API version path segment
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Check names against the endpoint's field catalog
    #[serde(default)]
    pub validate_fields: bool,

    /// Seconds between export status requests
    #[serde(default = "default_sleep_seconds")]
    pub export_status_sleep_seconds: u64,

    /// Overall polling deadline in seconds (0 = none)
    #[serde(default)]
    pub export_status_timeout_seconds: u64,

    /// Maximum status requests per job
    #[serde(default)]
    pub export_status_max_attempts: Option<u32>,

    /// Transport settings
    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_api_url(),
            api_version: default_api_version(),
            validate_fields: false,
            export_status_sleep_seconds: default_sleep_seconds(),
            export_status_timeout_seconds: 0,
            export_status_max_attempts: None,
            http: HttpConfig::default(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_sleep_seconds() -> u64 {
    10
}

/// HTTP transport configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Retries for connection failures and timeouts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Request quota (0 disables rate limiting)
    #[serde(default = "default_rps")]
    pub requests_per_second: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            requests_per_second: default_rps(),
        }
    }
}

fn default_timeout() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    2
}

fn default_rps() -> u32 {
    5
}

// ============================================================================
// Loading
// ============================================================================

impl SdkConfig {
    /// Config with the given API key and defaults elsewhere
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;
        Self::from_yaml_str(&yaml)
    }

    /// Defaults overridden by `TUNE_REPORTING_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Apply `TUNE_REPORTING_*` environment variables to this config
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, keyed by environment variable name
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("TUNE_REPORTING_API_KEY") {
            self.api_key = v;
        }
        if let Some(v) = lookup("TUNE_REPORTING_API_URL") {
            self.api_url = v;
        }
        if let Some(v) = lookup("TUNE_REPORTING_API_VERSION") {
            self.api_version = v;
        }
        if let Some(v) = lookup("TUNE_REPORTING_VALIDATE_FIELDS") {
            self.validate_fields = parse_flag("TUNE_REPORTING_VALIDATE_FIELDS", &v)?;
        }
        if let Some(v) = lookup("TUNE_REPORTING_EXPORT_STATUS_SLEEP_SECONDS") {
            self.export_status_sleep_seconds =
                parse_number("TUNE_REPORTING_EXPORT_STATUS_SLEEP_SECONDS", &v)?;
        }
        if let Some(v) = lookup("TUNE_REPORTING_EXPORT_STATUS_TIMEOUT_SECONDS") {
            self.export_status_timeout_seconds =
                parse_number("TUNE_REPORTING_EXPORT_STATUS_TIMEOUT_SECONDS", &v)?;
        }
        if let Some(v) = lookup("TUNE_REPORTING_EXPORT_STATUS_MAX_ATTEMPTS") {
            self.export_status_max_attempts = Some(parse_number(
                "TUNE_REPORTING_EXPORT_STATUS_MAX_ATTEMPTS",
                &v,
            )?);
        }
        Ok(self)
    }

    /// Check required settings
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::config("api_key is required"));
        }
        url::Url::parse(&self.api_url)?;
        if self.api_version.trim().is_empty() {
            return Err(Error::config("api_version must not be empty"));
        }
        if self.export_status_sleep_seconds == 0 {
            return Err(Error::config(
                "export_status_sleep_seconds must be greater than 0",
            ));
        }
        if self.export_status_max_attempts == Some(0) {
            return Err(Error::config(
                "export_status_max_attempts must be greater than 0",
            ));
        }
        Ok(())
    }

    // ========================================================================
    // Derived settings
    // ========================================================================

    /// Export polling policy
    pub fn poll_policy(&self) -> PollPolicy {
        let mut policy = PollPolicy::every(Duration::from_secs(self.export_status_sleep_seconds));
        if self.export_status_timeout_seconds > 0 {
            policy = policy.with_timeout(Duration::from_secs(self.export_status_timeout_seconds));
        }
        if let Some(max) = self.export_status_max_attempts {
            policy = policy.with_max_attempts(max);
        }
        policy
    }

    /// Transport configuration
    pub fn http_client_config(&self) -> HttpClientConfig {
        let builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.http.timeout_seconds))
            .max_retries(self.http.max_retries);

        let builder = if self.http.requests_per_second == 0 {
            builder.no_rate_limit()
        } else {
            builder.rate_limit(RateLimiterConfig::per_second(self.http.requests_per_second))
        };
        builder.build()
    }

    /// Request client against the configured API
    pub fn request_client(&self) -> Result<ReportRequestClient> {
        let http = HttpClient::with_config(self.http_client_config())?;
        Ok(ReportRequestClient::new(
            http,
            self.api_url.clone(),
            self.api_version.clone(),
        ))
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(Error::config(format!("{key}: expected a boolean, got '{other}'"))),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::config(format!("{key}: expected a number, got '{value}'")))
}
