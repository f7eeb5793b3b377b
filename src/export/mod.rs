//! Export job workflow
//!
//! Report exports are asynchronous on the server side:
//!
//! 1. an export request queues a job and answers with its id
//! 2. the status endpoint is polled until the job is `complete` or `fail`
//! 3. the completed status response carries the report download url
//!
//! Endpoint families disagree on where the job id and the url live inside
//! `data`; [`EndpointFamily`] names the [`ResponseShape`] for each.

mod poller;
mod types;


pub use poller::{ExportJobPoller, ExportStatusSource, ServiceStatusSource};
pub use types::{
    EndpointFamily, ExportJob, ExportStatus, PollPolicy, ResponseShape, DEFAULT_POLL_INTERVAL,
};
