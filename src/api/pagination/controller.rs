//! Paginated fetch engine
//!
//! A fetch cycle starts with a first-page call carrying every configured
//! filter. While a response carries a continuation token and
//! auto-continuation is on, follow-up calls are made with only the token and
//! the required identifiers, charged to the continuation throttle group.
//! Records accumulate across pages; a failed call ends the cycle but keeps
//! the pages already stored and the last token, so `fetch` can resume.

use super::result::ResultStore;
use super::spec::{CountSpec, ListSpec, OperationRef};
use crate::api::constants::{self, params};
use crate::api::dispatch::Dispatcher;
use crate::api::error::{FetchError, FetchResult};
use crate::api::normalize::{self, Page, Record, RecordLayout};
use crate::api::params::RequestParameters;
use crate::api::resilience::{ApiLogger, CycleContext, MonitoringConfig, ThrottleDecision, ThrottleGovernor};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::Serialize;
use std::sync::Arc;

/// Which kind of call is being made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    FirstPage,
    Continuation,
}

/// Totals of one `fetch`/`fetch_next` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FetchSummary {
    pub pages: usize,
    pub records: usize,
    /// A token is still pending
    pub has_more: bool,
    /// No page produced any record
    pub no_data: bool,
}

pub struct PaginationController {
    spec: ListSpec,
    endpoint: String,
    /// Sent on every call (API version, seller identity)
    base: RequestParameters,
    /// Caller-configured filters and identifiers
    filters: RequestParameters,
    dispatcher: Arc<dyn Dispatcher>,
    governor: ThrottleGovernor,
    logger: ApiLogger,
    store: ResultStore,
    /// One store per companion layout of the `ListSpec`
    companions: IndexMap<String, ResultStore>,
    token: Option<String>,
    auto_continue: bool,
    max_pages: Option<usize>,
    last_request: Option<RequestParameters>,
}

impl PaginationController {
    pub fn new(spec: ListSpec, base_url: &str, dispatcher: Arc<dyn Dispatcher>, governor: ThrottleGovernor) -> Self {
        let endpoint = constants::section_endpoint(base_url, &spec.section_path);
        let mut base = RequestParameters::new();
        if !spec.version.is_empty() {
            base.set(params::VERSION, &spec.version);
        }

        Self {
            spec,
            endpoint,
            base,
            filters: RequestParameters::new(),
            dispatcher,
            governor,
            logger: ApiLogger::new(MonitoringConfig::default()),
            store: ResultStore::new(),
            companions: IndexMap::new(),
            token: None,
            auto_continue: false,
            max_pages: None,
            last_request: None,
        }
    }

    pub fn with_logger(mut self, logger: ApiLogger) -> Self {
        self.logger = logger;
        self
    }

    /// Stop a cycle after this many pages, leaving the token pending.
    /// A cap of zero is raised to one so every cycle makes progress.
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.set_max_pages(max_pages);
        self
    }

    /// Add parameters sent on every call, first page and continuation alike
    pub fn with_base_param(mut self, name: &str, value: &str) -> Self {
        self.base.set(name, value);
        self
    }

    /// Merge caller parameters into the filter set
    pub fn configure(&mut self, parameters: &RequestParameters) {
        self.filters.merge(parameters);
    }

    pub fn params(&self) -> &RequestParameters {
        &self.filters
    }

    pub fn params_mut(&mut self) -> &mut RequestParameters {
        &mut self.filters
    }

    pub fn set_auto_continue(&mut self, enabled: bool) {
        self.auto_continue = enabled;
    }

    pub fn auto_continue(&self) -> bool {
        self.auto_continue
    }

    pub fn set_max_pages(&mut self, max_pages: Option<usize>) {
        self.max_pages = match max_pages {
            Some(0) => {
                warn!("Page cap of 0 for '{}' raised to 1", self.spec.primary.action);
                Some(1)
            }
            other => other,
        };
    }

    pub fn max_pages(&self) -> Option<usize> {
        self.max_pages
    }

    pub fn has_more(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn results(&self) -> Option<&[Record]> {
        self.store.all()
    }

    pub fn result(&self, index: usize) -> Option<&Record> {
        self.store.get(index)
    }

    pub fn count(&self) -> Option<u64> {
        self.store.count()
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Records of a companion list, `None` for unknown names or before any fetch
    pub fn companion(&self, name: &str) -> Option<&ResultStore> {
        self.companions.get(name)
    }

    pub fn spec(&self) -> &ListSpec {
        &self.spec
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Parameters of the most recent call that reached the dispatcher
    pub fn last_request(&self) -> Option<&RequestParameters> {
        self.last_request.as_ref()
    }

    /// Run a fetch cycle.
    ///
    /// With auto-continuation on and a token pending from an interrupted
    /// cycle, the cycle resumes from that token instead of starting over.
    pub async fn fetch(&mut self) -> FetchResult<FetchSummary> {
        let context = self.logger.start_cycle(&self.spec.primary.action);
        let mut summary = FetchSummary::default();

        if !(self.auto_continue && self.token.is_some()) {
            self.check_required()?;
            self.token = None;
            self.reset_stores();
            self.fetch_page(&context, RequestMode::FirstPage, &mut summary).await?;
        }

        while self.can_continue() {
            if let Some(max_pages) = self.max_pages {
                if summary.pages >= max_pages {
                    warn!(
                        "Stopping '{}' after {} pages with a token still pending",
                        self.spec.primary.action, summary.pages
                    );
                    break;
                }
            }

            self.logger.log_continuation(&context, summary.pages + 1);
            self.fetch_page(&context, RequestMode::Continuation, &mut summary).await?;
        }

        summary.has_more = self.has_more();
        summary.no_data = summary.records == 0;
        self.logger.complete_cycle(&context, summary.pages, summary.records, summary.has_more);
        Ok(summary)
    }

    /// Fetch exactly one continuation page; `None` when no token is pending
    pub async fn fetch_next(&mut self) -> FetchResult<Option<FetchSummary>> {
        if self.token.is_none() {
            return Ok(None);
        }
        if self.spec.continuation.is_none() {
            return Err(FetchError::Configuration(format!(
                "'{}' has no continuation operation",
                self.spec.primary.action
            )));
        }

        let context = self.logger.start_cycle(&self.spec.primary.action);
        let mut summary = FetchSummary::default();
        self.fetch_page(&context, RequestMode::Continuation, &mut summary).await?;

        summary.has_more = self.has_more();
        summary.no_data = summary.records == 0;
        self.logger.complete_cycle(&context, summary.pages, summary.records, summary.has_more);
        Ok(Some(summary))
    }

    /// Run the count operation of the list; the record set is left alone
    pub async fn fetch_count(&mut self) -> FetchResult<Option<u64>> {
        let count_spec = self.spec.count.clone().ok_or_else(|| {
            FetchError::Configuration(format!("'{}' has no count operation", self.spec.primary.action))
        })?;

        let layout = RecordLayout::new("", Vec::new()).with_count(count_spec.tag.clone());
        let page = self.run_counted(&count_spec, &layout).await?;
        self.store.set_count(page.count);
        Ok(page.count)
    }

    /// Run a one-off operation that answers with a count plus records of the
    /// list's own kind (e.g. cancelled submissions). Those records replace the
    /// record set and any pending token is dropped.
    pub async fn fetch_action(&mut self, action: &CountSpec) -> FetchResult<Option<u64>> {
        let layout = self.spec.layout.clone().with_count(action.tag.clone());
        let page = self.run_counted(action, &layout).await?;

        self.token = None;
        self.reset_stores();
        self.store.extend(page.records);
        self.store.set_count(page.count);
        Ok(page.count)
    }

    async fn run_counted(&mut self, count_spec: &CountSpec, layout: &RecordLayout) -> FetchResult<Page> {
        self.check_required()?;
        let context = self.logger.start_cycle(&count_spec.operation.action);

        let mut outbound = self.base.clone();
        let mut filters = self.filters.clone();
        filters.remove(params::NEXT_TOKEN);
        for excluded in &count_spec.excluded {
            if excluded.ends_with('.') {
                filters.remove_prefix(excluded);
            } else {
                filters.remove(excluded);
            }
        }
        outbound.merge(&filters);
        outbound.set(params::ACTION, &count_spec.operation.action);

        let page = self
            .call(&context, &count_spec.operation, outbound, layout, &[])
            .await
            .inspect_err(|e| self.logger.log_failure(&context, &count_spec.operation.group, &e.to_string()))?;

        if page.count.is_none() {
            self.logger.log_no_data(&context, &count_spec.operation.group);
        }
        Ok(page)
    }

    fn reset_stores(&mut self) {
        self.store.reset();
        self.companions = self
            .spec
            .companions
            .iter()
            .map(|(name, _)| {
                let mut store = ResultStore::new();
                store.reset();
                (name.clone(), store)
            })
            .collect();
    }

    fn can_continue(&self) -> bool {
        self.auto_continue && self.token.is_some() && self.spec.continuation.is_some()
    }

    fn check_required(&self) -> FetchResult<()> {
        let missing: Vec<&str> = self
            .spec
            .required
            .iter()
            .map(String::as_str)
            .filter(|name| !self.filters.contains(name))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            warn!("{} must be set before calling '{}'", missing.join(", "), self.spec.primary.action);
            Err(FetchError::Configuration(format!(
                "missing required parameter(s) for {}: {}",
                self.spec.primary.action,
                missing.join(", ")
            )))
        }
    }

    /// Outbound parameter set for a call in the given mode
    fn outbound(&self, mode: RequestMode, operation: &OperationRef) -> RequestParameters {
        let mut outbound = self.base.clone();

        match mode {
            RequestMode::FirstPage => {
                let mut filters = self.filters.clone();
                filters.remove(params::NEXT_TOKEN);
                outbound.merge(&filters);
                outbound.set(params::ACTION, &operation.action);
            }
            RequestMode::Continuation => {
                outbound.merge(&self.filters.pick(self.spec.required.iter().map(String::as_str)));
                outbound.set(params::ACTION, &operation.action);
                if let Some(token) = &self.token {
                    outbound.set(params::NEXT_TOKEN, token);
                }
            }
        }

        outbound
    }

    async fn fetch_page(&mut self, context: &CycleContext, mode: RequestMode, summary: &mut FetchSummary) -> FetchResult<()> {
        let operation = match mode {
            RequestMode::FirstPage => self.spec.primary.clone(),
            RequestMode::Continuation => match &self.spec.continuation {
                Some(operation) => operation.clone(),
                None => {
                    return Err(FetchError::Configuration(format!(
                        "'{}' has no continuation operation",
                        self.spec.primary.action
                    )));
                }
            },
        };

        let outbound = self.outbound(mode, &operation);
        let layout = self.spec.layout.clone();
        let companions = self.spec.companions.clone();
        let mut page = self
            .call(context, &operation, outbound, &layout, &companions)
            .await
            .inspect_err(|e| self.logger.log_failure(context, &operation.group, &e.to_string()))?;

        // single-page operations never continue, whatever the response says
        self.token = page.token.clone().filter(|_| self.spec.continuation.is_some());
        summary.pages += 1;
        summary.records += page.records.len();

        if page.is_no_data() {
            self.logger.log_no_data(context, &operation.group);
        }
        self.logger.log_page(context, &operation.group, summary.pages, page.records.len(), self.has_more());

        for (name, records) in std::mem::take(&mut page.companions) {
            self.companions.entry(name).or_default().extend(records);
        }
        self.store.extend(page.records);
        Ok(())
    }

    /// Throttle check, dispatch, parse and normalize one call
    async fn call(
        &mut self,
        context: &CycleContext,
        operation: &OperationRef,
        outbound: RequestParameters,
        layout: &RecordLayout,
        companions: &[(String, RecordLayout)],
    ) -> FetchResult<Page> {
        if let ThrottleDecision::Throttled { restore_interval } = self.governor.check_and_consume(&operation.group) {
            self.logger.log_throttled(context, &operation.group, restore_interval);
            return Err(FetchError::Throttled {
                group: operation.group.clone(),
                restore_interval,
            });
        }

        self.logger.log_request(context, &operation.group, &outbound);
        let body = self.dispatcher.send(&self.endpoint, &outbound).await;
        self.last_request = Some(outbound);
        let body = body?;

        let document = normalize::parse_document(&body).map_err(|e| FetchError::Malformed(e.to_string()))?;
        let result = normalize::find_result(&document, &operation.action);
        let mut page = normalize::normalize(result, layout);
        if let Some(result) = result {
            for (name, companion) in companions {
                let records = normalize::normalize(Some(result), companion).records;
                page.companions.insert(name.clone(), records);
            }
        }
        debug!("'{}' returned {} records", operation.action, page.records.len());
        Ok(page)
    }
}
