//! Report endpoints
//!
//! [`ReportEndpoint`] exposes the actions of one report controller: `count`,
//! `find`, `export`, `status` and `define`, plus the polling, download and
//! field catalog helpers built on top of them.

mod report;
mod types;


pub use report::ReportEndpoint;
pub use types::{ReportParams, ValidationMode};
