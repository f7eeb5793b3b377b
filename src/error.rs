//! Error types for the TUNE Reporting SDK
//!
//! Every public API returns `Result<T, Error>`. Errors fall into two kinds:
//! SDK-level errors are local problems (bad input, unparseable data, missing
//! response); service-level errors mean the remote side answered and signalled
//! failure, or could not be reached at all.

use thiserror::Error;

/// Broad classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Client-side problem
    Sdk,
    /// The service responded with (or transport reported) a failure
    Service,
}

/// The main error type for the SDK
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // ============================================================================
    // Argument / Validation Errors
    // ============================================================================
    #[error("Parameter '{name}' is not defined.")]
    InvalidArgument { name: String },

    #[error("Parameter '{param}' is invalid: {message}")]
    Validation { param: String, message: String },

    #[error("Failed to add query string parameter ({name},{value}): {message}")]
    Encode {
        name: String,
        value: String,
        message: String,
    },

    // ============================================================================
    // Service Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request failed: HTTP Error Code: {status}: {url}")]
    Service { status: u16, url: String },

    #[error("Report request failed: HTTP {status}, status '{job_status}': {url}")]
    ReportFailed {
        status: u16,
        job_status: String,
        url: String,
        response: Box<serde_json::Value>,
    },

    #[error("Failed to get fields for endpoint: '{controller}'")]
    Catalog { controller: String },

    #[error("Failed to download report '{url}': HTTP {status}")]
    Download { status: u16, url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Response Errors
    // ============================================================================
    #[error("No response returned from export request.")]
    NoResponse,

    #[error("No response data returned. Request URL: {url}")]
    MissingData { url: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("CSV parsing error: {0}")]
    CsvParse(#[from] csv::Error),

    // ============================================================================
    // Export Job Errors
    // ============================================================================
    #[error("Export job '{job_id}' stopped after {attempts} attempts")]
    Cancelled { job_id: String, attempts: u32 },

    #[error("Export job '{job_id}' did not finish: {message}")]
    PollTimeout {
        job_id: String,
        attempts: u32,
        message: String,
    },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing/empty argument error
    pub fn invalid_argument(name: impl Into<String>) -> Self {
        Self::InvalidArgument { name: name.into() }
    }

    /// Create a parameter validation error
    pub fn validation(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create a query encoding error
    pub fn encode(
        name: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Encode {
            name: name.into(),
            value: value.into(),
            message: message.into(),
        }
    }

    /// Create a service error from an HTTP status and request URL
    pub fn service(status: u16, url: impl Into<String>) -> Self {
        Self::Service {
            status,
            url: url.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Which side of the wire this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport(_)
            | Error::Service { .. }
            | Error::ReportFailed { .. }
            | Error::Catalog { .. }
            | Error::Download { .. } => ErrorKind::Service,
            _ => ErrorKind::Sdk,
        }
    }

    /// Shorthand for `kind() == ErrorKind::Service`
    pub fn is_service(&self) -> bool {
        self.kind() == ErrorKind::Service
    }

    /// HTTP status carried by the error, if any
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Error::Service { status, .. }
            | Error::ReportFailed { status, .. }
            | Error::Download { status, .. } => Some(*status),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the transport layer may retry after this error
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// Result type alias for the SDK
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("missing api_key");
        assert_eq!(err.to_string(), "Configuration error: missing api_key");

        let err = Error::invalid_argument("job_id");
        assert_eq!(err.to_string(), "Parameter 'job_id' is not defined.");

        let err = Error::service(500, "https://api.example.com/v2/export/download.json");
        assert_eq!(
            err.to_string(),
            "Request failed: HTTP Error Code: 500: https://api.example.com/v2/export/download.json"
        );
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(Error::service(404, "u").kind(), ErrorKind::Service);
        assert!(Error::Download {
            status: 403,
            url: "u".into()
        }
        .is_service());

        assert_eq!(Error::validation("filter", "bad").kind(), ErrorKind::Sdk);
        assert_eq!(Error::NoResponse.kind(), ErrorKind::Sdk);
        assert_eq!(
            Error::MissingData { url: "u".into() }.kind(),
            ErrorKind::Sdk
        );
        assert_eq!(
            Error::Cancelled {
                job_id: "j".into(),
                attempts: 1
            }
            .kind(),
            ErrorKind::Sdk
        );
    }

    #[test]
    fn test_http_status() {
        assert_eq!(Error::service(502, "u").http_status(), Some(502));
        assert_eq!(Error::NoResponse.http_status(), None);
    }

    #[test]
    fn test_validation_not_retryable() {
        assert!(!Error::validation("sort", "bad direction").is_retryable());
        assert!(!Error::service(503, "u").is_retryable());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
