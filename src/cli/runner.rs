//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, ExportArgs, OutputFormat};
use crate::config::SdkConfig;
use crate::endpoint::{ReportEndpoint, ReportParams};
use crate::endpoints::ENDPOINTS;
use crate::error::Result;
use crate::fields::FieldSelection;
use crate::query::split_list;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Export(args) => self.export(args).await,
            Commands::Status { endpoint, job_id } => self.status(endpoint, job_id).await,
            Commands::Fields {
                endpoint,
                selection,
            } => self.fields(endpoint, *selection).await,
            Commands::Endpoints => {
                self.list_endpoints();
                Ok(())
            }
        }
    }

    /// Config file, then environment, then command-line flags
    fn load_config(&self) -> Result<SdkConfig> {
        let mut config = match &self.cli.config {
            Some(path) => SdkConfig::from_file(path)?,
            None => SdkConfig::default(),
        }
        .with_env_overrides()?;

        if let Some(api_key) = &self.cli.api_key {
            config.api_key.clone_from(api_key);
        }
        if let Some(api_url) = &self.cli.api_url {
            config.api_url.clone_from(api_url);
        }
        Ok(config)
    }

    fn endpoint(&self, name: &str) -> Result<ReportEndpoint> {
        ReportEndpoint::from_config(name, &self.load_config()?)
    }

    async fn export(&self, args: &ExportArgs) -> Result<()> {
        let endpoint = self.endpoint(&args.endpoint)?;

        let mut params = ReportParams::new(&args.start_date, &args.end_date)
            .format(args.report_format);
        params.fields = args.fields.as_deref().map(split_list).unwrap_or_default();
        if params.fields.is_empty() && args.recommended {
            params.fields = endpoint.fields(FieldSelection::RECOMMENDED).await?;
        }
        params.filter.clone_from(&args.filter);
        params.group = args.group.as_deref().map(split_list).unwrap_or_default();
        params.timestamp = args.timestamp;
        params.cohort_type = args.cohort_type;
        params.aggregation_type = args.aggregation_type;
        params.cohort_interval = args.cohort_interval;
        params.response_timezone.clone_from(&args.response_timezone);

        let cancel = CancellationToken::new();
        let interrupt = tokio::spawn({
            let cancel = cancel.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted, cancelling export");
                    cancel.cancel();
                }
            }
        });

        let result = self.run_export(&endpoint, &params, args, cancel).await;
        interrupt.abort();
        result
    }

    async fn run_export(
        &self,
        endpoint: &ReportEndpoint,
        params: &ReportParams,
        args: &ExportArgs,
        cancel: CancellationToken,
    ) -> Result<()> {
        let job_id = endpoint.export(params).await?;
        self.output_message(&json!({
            "type": "JOB",
            "endpoint": endpoint.controller(),
            "job_id": job_id
        }));

        let job = endpoint.fetch(&job_id, self.cli.verbose, cancel).await?;
        let url = endpoint.report_url(&job)?;
        info!("Reading report from {}", url);

        let reader = endpoint.read_report(&url, args.report_format).await?;
        self.output_message(&json!({
            "type": "REPORT",
            "job_id": job.job_id,
            "status": job.status.as_str(),
            "attempts": job.attempts,
            "url": url,
            "count": reader.count()
        }));

        let limit = args.max_rows.unwrap_or(usize::MAX);
        for row in reader.iter().take(limit) {
            self.output_message(&json!({ "type": "ROW", "row": row.to_json() }));
        }
        Ok(())
    }

    async fn status(&self, name: &str, job_id: &str) -> Result<()> {
        let endpoint = self.endpoint(name)?;
        let response = endpoint.status(job_id).await?;

        self.output_message(&json!({
            "type": "STATUS",
            "job_id": job_id,
            "http_code": response.http_code(),
            "data": response.data(),
            "errors": response.errors()
        }));
        Ok(())
    }

    async fn fields(&self, name: &str, selection: FieldSelection) -> Result<()> {
        let endpoint = self.endpoint(name)?;
        let fields = endpoint.fields(selection).await?;

        self.output_message(&json!({
            "type": "FIELDS",
            "endpoint": endpoint.controller(),
            "selection": selection.to_string(),
            "fields": fields
        }));
        Ok(())
    }

    fn list_endpoints(&self) {
        let endpoints: Vec<Value> = ENDPOINTS
            .iter()
            .map(|d| {
                json!({
                    "name": d.alias,
                    "controller": d.controller,
                    "family": d.family.as_str(),
                    "description": d.description,
                    "filter_debug_mode": d.filter_debug_mode,
                    "filter_test_profile_id": d.filter_test_profile_id
                })
            })
            .collect();

        self.output_message(&json!({
            "type": "ENDPOINTS",
            "endpoints": endpoints
        }));
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
