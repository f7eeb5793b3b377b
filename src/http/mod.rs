//! HTTP transport module
//!
//! Provides the GET transport used for API calls and report downloads.
//!
//! # Features
//!
//! - **Retries**: connection failures, timeouts and 429 with backoff
//! - **Rate Limiting**: token bucket rate limiter using governor
//! - **Pass-through statuses**: non-2xx responses are returned, not raised

mod client;
mod rate_limit;

pub use client::{redact_api_key, HttpClient, HttpClientConfig, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
