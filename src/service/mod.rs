//! Management API service layer
//!
//! A [`ReportRequest`] names a controller, an action and its parameters.
//! [`ReportRequestClient`] turns it into
//! `<api_url>/<version>/<controller>/<action>.json?api_key=...&...`, sends it
//! through [`crate::http::HttpClient`] and wraps the answer in a
//! [`ReportResponse`].

mod client;
mod types;

#[cfg(test)]
mod tests;

pub use client::{ReportRequestClient, DEFAULT_API_URL, DEFAULT_API_VERSION};
pub use types::{ReportRequest, ReportResponse};
