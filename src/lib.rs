// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # TUNE Reporting SDK
//!
//! Client for the TUNE (MobileAppTracking) Management API report
//! endpoints: build and validate report queries, queue exports, poll them
//! to completion and read the resulting CSV or JSON files.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tune_reporting::{ReportEndpoint, ReportParams, SdkConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> tune_reporting::Result<()> {
//!     let config = SdkConfig::from_env()?;
//!     let installs = ReportEndpoint::from_config("installs", &config)?;
//!
//!     let params = ReportParams::new("2024-01-01", "2024-01-07")
//!         .fields(["id", "created", "publisher.name"])
//!         .filter("publisher_id > 0");
//!
//!     let reader = installs
//!         .export_report(&params, true, CancellationToken::new())
//!         .await?;
//!     println!("{} rows", reader.count());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        ReportEndpoint                        │
//! │  define  count  find  export → job id  status  fetch  fields │
//! └──────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬──────────┬────────┴───────┬────────────┬──────────┐
//! │  Query   │  Fields  │    Service     │   Export   │  Reader  │
//! ├──────────┼──────────┼────────────────┼────────────┼──────────┤
//! │ Encoder  │ Catalog  │ ReportRequest  │ Poller     │ CSV      │
//! │ Filter   │ Cache    │ ReportResponse │ PollPolicy │ JSON     │
//! │ Validate │ Select   │ HttpClient     │ Families   │          │
//! └──────────┴──────────┴────────────────┴────────────┴──────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the SDK
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP client with retry and rate limiting
pub mod http;

/// Query string encoding and parameter validation
pub mod query;

/// Endpoint field catalogs
pub mod fields;

/// Management API requests and responses
pub mod service;

/// Export job polling
pub mod export;

/// Report file download and decoding
pub mod reader;

/// Report endpoint operations
pub mod endpoint;

/// Built-in endpoint definitions
pub mod endpoints;

/// SDK configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, Result};
pub use types::*;

// Re-export commonly used types
pub use config::SdkConfig;
pub use endpoint::{ReportEndpoint, ReportParams, ValidationMode};
pub use export::{EndpointFamily, ExportJob, ExportJobPoller, ExportStatus, PollPolicy};
pub use fields::FieldSelection;
pub use reader::{ReportReader, ReportRow};
pub use service::{ReportRequest, ReportRequestClient, ReportResponse};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
