//! CLI module
//!
//! Command-line interface for the reporting API.
//!
//! # Commands
//!
//! - `export` - Export a report, poll until complete and print its rows
//! - `status` - One status request for an export job
//! - `fields` - List an endpoint's fields
//! - `endpoints` - List built-in report endpoints

mod commands;
mod runner;

pub use commands::{Cli, Commands, ExportArgs, OutputFormat};
pub use runner::Runner;
