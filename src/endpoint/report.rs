//! Report endpoint operations

use super::types::{ReportParams, ValidationMode};
use crate::config::SdkConfig;
use crate::endpoints::{self, EndpointDefinition};
use crate::error::{Error, Result};
use crate::export::{EndpointFamily, ExportJob, ExportJobPoller, PollPolicy, ServiceStatusSource};
use crate::fields::{FieldCatalog, FieldCatalogCache, FieldMap, FieldSelection};
use crate::query::{
    validate_datetime, validate_fields, validate_filter, validate_group, validate_sort, wrap_once,
    ParamValue,
};
use crate::reader::ReportReader;
use crate::service::{ReportRequest, ReportRequestClient, ReportResponse};
use crate::types::ExportFormat;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

const DEBUG_MODE_FILTER: &str = "(debug_mode=0 OR debug_mode is NULL)";
const TEST_PROFILE_FILTER: &str = "(test_profile_id=0 OR test_profile_id IS NULL)";

/// One report controller of the Management API
#[derive(Debug)]
pub struct ReportEndpoint {
    definition: EndpointDefinition,
    client: ReportRequestClient,
    api_key: String,
    validation: ValidationMode,
    poll_policy: PollPolicy,
    catalog: FieldCatalogCache,
}

impl ReportEndpoint {
    pub fn new(
        definition: EndpointDefinition,
        client: ReportRequestClient,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            definition,
            client,
            api_key: api_key.into(),
            validation: ValidationMode::default(),
            poll_policy: PollPolicy::default(),
            catalog: FieldCatalogCache::new(),
        }
    }

    /// Built-in endpoint `name` configured from `config`
    pub fn from_config(name: &str, config: &SdkConfig) -> Result<Self> {
        let definition = endpoints::get(name)
            .ok_or_else(|| Error::config(format!("Unknown report endpoint '{name}'")))?;
        config.validate()?;

        Ok(Self::new(*definition, config.request_client()?, config.api_key.clone())
            .with_validation(ValidationMode::from_flag(config.validate_fields))
            .with_poll_policy(config.poll_policy()))
    }

    #[must_use]
    pub fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    #[must_use]
    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.poll_policy = policy;
        self
    }

    pub fn definition(&self) -> &EndpointDefinition {
        &self.definition
    }

    pub fn controller(&self) -> &str {
        self.definition.controller
    }

    pub fn family(&self) -> EndpointFamily {
        self.definition.family
    }

    pub fn validation(&self) -> ValidationMode {
        self.validation
    }

    pub fn poll_policy(&self) -> &PollPolicy {
        &self.poll_policy
    }

    pub fn client(&self) -> &ReportRequestClient {
        &self.client
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Describe the endpoint's model
    pub async fn define(&self) -> Result<ReportResponse> {
        self.client
            .send(&ReportRequest::new(self.controller(), "define", &self.api_key))
            .await
    }

    /// Count records matching `params`
    pub async fn count(&self, params: &ReportParams) -> Result<ReportResponse> {
        let catalog = self.validation_catalog().await?;
        let known = catalog.as_deref().map(FieldCatalog::fields);

        let request = self.dated_request("count", params)?;
        let request = self.with_family_params(request, params, known, false)?;
        let request = self.with_filter(request, params, known)?;
        let request = request.param_opt("response_timezone", params.response_timezone.clone());

        self.client.send(&request).await
    }

    /// Find records matching `params`
    ///
    /// Without explicit fields the endpoint's default fields are requested.
    /// Sort fields missing from the field list are appended to it.
    pub async fn find(&self, params: &ReportParams) -> Result<ReportResponse> {
        let catalog = self.validation_catalog().await?;
        let known = catalog.as_deref().map(FieldCatalog::fields);

        let mut request = self.dated_request("find", params)?;
        request = self.with_family_params(request, params, known, true)?;
        request = self.with_filter(request, params, known)?;

        let mut fields = if params.fields.is_empty() {
            self.fields(FieldSelection::DEFAULT).await?
        } else {
            params.fields.clone()
        };

        let sort = validate_sort(&params.sort, known)?;
        for (field, _) in &sort {
            if !fields.iter().any(|f| f.trim() == field.as_str()) {
                fields.push(field.clone());
            }
        }

        request = request.param("fields", validate_fields(&fields, known)?);
        if !sort.is_empty() {
            request = request.param("sort", ParamValue::sort(sort));
        }

        let request = request
            .param_opt("limit", params.limit)
            .param_opt("page", params.page)
            .param_opt("format", params.format.map(|f| f.as_str()))
            .param_opt("response_timezone", params.response_timezone.clone());

        self.client.send(&request).await
    }

    /// Queue an export and return its job id
    pub async fn export(&self, params: &ReportParams) -> Result<String> {
        let catalog = self.validation_catalog().await?;
        let known = catalog.as_deref().map(FieldCatalog::fields);

        let mut request = self.dated_request(self.family().export_action(), params)?;
        request = self.with_family_params(request, params, known, true)?;
        request = self.with_filter(request, params, known)?;

        if !params.fields.is_empty() {
            request = request.param("fields", validate_fields(&params.fields, known)?);
        }

        let format = params.format.unwrap_or_default();
        let request = request
            .param("format", format.as_str())
            .param_opt("response_timezone", params.response_timezone.clone());

        let response = self.client.send(&request).await?;
        if !response.is_success() {
            return Err(Error::service(
                response.http_code(),
                response.request_url(),
            ));
        }

        let job_id = self.family().job_id_shape().job_id(&response)?;
        info!("Queued {} export '{}'", self.controller(), job_id);
        Ok(job_id)
    }

    /// One status request for an export job
    pub async fn status(&self, job_id: &str) -> Result<ReportResponse> {
        let job_id = job_id.trim();
        if job_id.is_empty() {
            return Err(Error::invalid_argument("job_id"));
        }

        let request = ReportRequest::new(
            self.family().status_controller(self.controller()),
            self.family().status_action(),
            &self.api_key,
        )
        .param("job_id", job_id);

        self.client.send(&request).await
    }

    /// Poll `job_id` until it completes, fails or `cancel` fires
    pub async fn fetch(
        &self,
        job_id: &str,
        verbose: bool,
        cancel: CancellationToken,
    ) -> Result<ExportJob> {
        self.poller(verbose, cancel).fetch(job_id).await
    }

    /// Poller bound to this endpoint's status action
    pub fn poller(&self, verbose: bool, cancel: CancellationToken) -> ExportJobPoller {
        let source = ServiceStatusSource::new(
            self.client.clone(),
            &self.api_key,
            self.family(),
            self.controller(),
        );
        ExportJobPoller::new(Arc::new(source))
            .with_policy(self.poll_policy.clone())
            .verbose(verbose)
            .with_cancellation(cancel)
    }

    /// Download URL of a completed job
    pub fn report_url(&self, job: &ExportJob) -> Result<String> {
        job.report_url(self.family().report_url_shape())
    }

    /// Download URL from a completed status response
    pub fn report_url_from(&self, response: &ReportResponse) -> Result<String> {
        self.family().report_url_shape().report_url(response)
    }

    /// Download and decode a report file
    pub async fn read_report(&self, url: &str, format: ExportFormat) -> Result<ReportReader> {
        let mut reader = ReportReader::new(url, format)?.with_client(self.client.http().clone());
        reader.read().await?;
        Ok(reader)
    }

    /// Export, wait for completion and read the report
    pub async fn export_report(
        &self,
        params: &ReportParams,
        verbose: bool,
        cancel: CancellationToken,
    ) -> Result<ReportReader> {
        let job_id = self.export(params).await?;
        let job = self.fetch(&job_id, verbose, cancel).await?;
        let url = self.report_url(&job)?;
        self.read_report(&url, params.format.unwrap_or_default())
            .await
    }

    // ========================================================================
    // Fields
    // ========================================================================

    /// Field names for `selection`
    ///
    /// [`FieldSelection::RECOMMENDED`] answers from the built-in list without
    /// contacting the server. A `DEFAULT` selection that matches nothing in
    /// the catalog falls back to the same list.
    pub async fn fields(&self, selection: FieldSelection) -> Result<Vec<String>> {
        if selection.contains(FieldSelection::RECOMMENDED) {
            return self.recommended_fields();
        }

        let fields = self.field_catalog().await?.select(selection);
        if fields.is_empty() && selection.contains(FieldSelection::DEFAULT) {
            debug!(
                "No default fields for '{}', using recommended fields",
                self.controller()
            );
            return self.recommended_fields();
        }
        Ok(fields)
    }

    fn recommended_fields(&self) -> Result<Vec<String>> {
        let recommended = self.definition.recommended_fields;
        if recommended.is_empty() {
            return Err(Error::validation(
                "fields",
                format!("no recommended fields for '{}'", self.controller()),
            ));
        }
        Ok(recommended.iter().map(ToString::to_string).collect())
    }

    /// Model name reported by the field catalog
    pub async fn model_name(&self) -> Result<Option<String>> {
        Ok(self.field_catalog().await?.model_name().map(str::to_string))
    }

    /// Resolved field catalog, fetched on first use
    pub async fn field_catalog(&self) -> Result<Arc<FieldCatalog>> {
        self.catalog
            .get_or_fetch(&self.client, &self.api_key, self.controller())
            .await
    }

    /// Fetch the field catalog again, replacing the cached one
    pub async fn refresh_fields(&self) -> Result<Arc<FieldCatalog>> {
        self.catalog
            .refresh(&self.client, &self.api_key, self.controller())
            .await
    }

    // ========================================================================
    // Request building
    // ========================================================================

    async fn validation_catalog(&self) -> Result<Option<Arc<FieldCatalog>>> {
        match self.validation {
            ValidationMode::Local => Ok(None),
            ValidationMode::Catalog => Ok(Some(self.field_catalog().await?)),
        }
    }

    fn dated_request(&self, action: &str, params: &ReportParams) -> Result<ReportRequest> {
        let start = validate_datetime("start_date", &params.start_date)?;
        let end = validate_datetime("end_date", &params.end_date)?;
        Ok(ReportRequest::new(self.controller(), action, &self.api_key)
            .param("start_date", start)
            .param("end_date", end))
    }

    /// Group, timestamp and cohort parameters of the endpoint's family
    fn with_family_params(
        &self,
        mut request: ReportRequest,
        params: &ReportParams,
        known: Option<&FieldMap>,
        aggregates: bool,
    ) -> Result<ReportRequest> {
        match self.family() {
            EndpointFamily::Logs => {}
            EndpointFamily::Actuals => {
                if !params.group.is_empty() {
                    request = request.param("group", validate_group(&params.group, known)?);
                }
                if aggregates {
                    request = request.param_opt("timestamp", params.timestamp.map(|t| t.as_str()));
                }
            }
            EndpointFamily::Insights => {
                let cohort_type = params
                    .cohort_type
                    .ok_or_else(|| Error::invalid_argument("cohort_type"))?;
                request = request.param("cohort_type", cohort_type.as_str());

                if aggregates {
                    let aggregation_type = params
                        .aggregation_type
                        .ok_or_else(|| Error::invalid_argument("aggregation_type"))?;
                    request = request.param("aggregation_type", aggregation_type.as_str());
                }

                request = request
                    .param("group", validate_group(&params.group, known)?)
                    .param_opt("interval", params.cohort_interval.map(|i| i.as_str()));
            }
        }
        Ok(request)
    }

    fn with_filter(
        &self,
        request: ReportRequest,
        params: &ReportParams,
        known: Option<&FieldMap>,
    ) -> Result<ReportRequest> {
        let user = params
            .filter
            .as_deref()
            .filter(|f| !f.trim().is_empty())
            .map(|f| validate_filter(f, known))
            .transpose()?;

        let filter = compose_filter(user.as_deref(), &self.definition);
        if let Some(ref filter) = filter {
            debug!("{} filter: {}", self.controller(), filter);
        }
        Ok(request.param_opt("filter", filter))
    }
}

/// Combine a validated user filter with the endpoint's SDK filters
pub(crate) fn compose_filter(user: Option<&str>, definition: &EndpointDefinition) -> Option<String> {
    let mut sdk = Vec::new();
    if definition.filter_debug_mode {
        sdk.push(DEBUG_MODE_FILTER);
    }
    if definition.filter_test_profile_id {
        sdk.push(TEST_PROFILE_FILTER);
    }
    let sdk = sdk.join(" AND ");

    let combined = match (user, sdk.is_empty()) {
        (Some(user), false) => format!("{} AND {}", wrap_once(user), sdk),
        (Some(user), true) => user.to_string(),
        (None, false) => sdk,
        (None, true) => return None,
    };
    Some(wrap_once(&combined))
}
