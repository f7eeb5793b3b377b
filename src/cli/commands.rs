//! CLI commands and argument parsing

use crate::fields::FieldSelection;
use crate::types::{AggregationType, CohortInterval, CohortType, ExportFormat, Timestamp};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// TUNE Reporting CLI
#[derive(Parser, Debug)]
#[command(name = "tune-reporting")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Management API key
    #[arg(long, global = true, env = "TUNE_REPORTING_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export a report, wait for it and print its rows
    Export(ExportArgs),

    /// Request the status of an export job once
    Status {
        /// Endpoint alias or controller path
        endpoint: String,

        /// Export job id
        job_id: String,
    },

    /// List an endpoint's fields
    Fields {
        /// Endpoint alias or controller path
        endpoint: String,

        /// Field selection, e.g. `default+related` or `recommended`
        #[arg(short, long, default_value = "default")]
        selection: FieldSelection,
    },

    /// List built-in report endpoints
    Endpoints,
}

/// Arguments of the `export` command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Endpoint alias or controller path
    pub endpoint: String,

    /// Start date (YYYY-MM-DD or YYYY-MM-DD HH:MM:SS)
    #[arg(long)]
    pub start_date: String,

    /// End date (YYYY-MM-DD or YYYY-MM-DD HH:MM:SS)
    #[arg(long)]
    pub end_date: String,

    /// Fields to export (comma-separated)
    #[arg(long)]
    pub fields: Option<String>,

    /// Export the endpoint's recommended fields when --fields is absent
    #[arg(long)]
    pub recommended: bool,

    /// Filter expression
    #[arg(long)]
    pub filter: Option<String>,

    /// Group by fields (comma-separated)
    #[arg(long)]
    pub group: Option<String>,

    /// Time breakdown of actuals reports
    #[arg(long)]
    pub timestamp: Option<Timestamp>,

    /// Cohort anchor of insights reports
    #[arg(long)]
    pub cohort_type: Option<CohortType>,

    /// Cohort rollup of insights reports
    #[arg(long)]
    pub aggregation_type: Option<AggregationType>,

    /// Cohort bucket of insights reports
    #[arg(long)]
    pub cohort_interval: Option<CohortInterval>,

    /// Report file format
    #[arg(long, default_value = "csv")]
    pub report_format: ExportFormat,

    /// Timezone of returned timestamps
    #[arg(long)]
    pub response_timezone: Option<String>,

    /// Maximum rows to print (all when absent)
    #[arg(long)]
    pub max_rows: Option<usize>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
