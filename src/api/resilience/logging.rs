//! Structured logging with correlation tracking for list fetch cycles
//!
//! Every fetch cycle gets a correlation id; each page, throttle denial and
//! continuation within that cycle is logged as a JSON payload carrying it.

use super::config::{LogLevel, MonitoringConfig};
use crate::api::params::RequestParameters;
use log::{debug, error, info, trace, warn};
use serde_json::{Value, json};
use std::time::{Duration, Instant};

/// Structured logger for list operations
#[derive(Debug, Clone)]
pub struct ApiLogger {
    config: MonitoringConfig,
}

/// Context for one fetch cycle (first page plus continuations)
#[derive(Debug, Clone)]
pub struct CycleContext {
    /// Unique correlation ID for this cycle
    pub correlation_id: String,
    /// Primary action of the list (e.g. `GetReportList`)
    pub action: String,
    /// Start time for performance tracking
    pub start_time: Instant,
}

impl CycleContext {
    /// Calculate elapsed time since the cycle started
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl ApiLogger {
    pub fn new(config: MonitoringConfig) -> Self {
        Self { config }
    }

    /// Start tracking a new fetch cycle
    pub fn start_cycle(&self, action: &str) -> CycleContext {
        let correlation_id = if self.config.correlation_ids {
            uuid::Uuid::new_v4().to_string()
        } else {
            String::new()
        };

        let context = CycleContext {
            correlation_id,
            action: action.to_string(),
            start_time: Instant::now(),
        };

        if self.config.request_logging && self.should_log(LogLevel::Debug) {
            let log_data = json!({
                "event": "cycle_started",
                "correlation_id": context.correlation_id,
                "action": context.action,
                "timestamp": chrono::Utc::now().to_rfc3339()
            });

            debug!("Fetch Cycle Started: {}", log_data);
        }

        context
    }

    /// Log the outbound parameter set of a call
    pub fn log_request(&self, context: &CycleContext, group: &str, params: &RequestParameters) {
        if !self.config.request_logging || !self.should_log(LogLevel::Trace) {
            return;
        }

        let log_data = json!({
            "event": "request",
            "correlation_id": context.correlation_id,
            "group": group,
            "params": Self::sanitize(params),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        trace!("Request: {}", log_data);
    }

    /// Log a page that was fetched and normalized
    pub fn log_page(&self, context: &CycleContext, group: &str, page: usize, records: usize, has_more: bool) {
        if !self.config.request_logging || !self.should_log(LogLevel::Info) {
            return;
        }

        let log_data = json!({
            "event": "page_fetched",
            "correlation_id": context.correlation_id,
            "action": context.action,
            "group": group,
            "page": page,
            "records": records,
            "has_more": has_more,
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        info!("Fetched Page: {}", log_data);
    }

    /// Log a page whose document held nothing
    pub fn log_no_data(&self, context: &CycleContext, group: &str) {
        if !self.should_log(LogLevel::Warn) {
            return;
        }

        let log_data = json!({
            "event": "no_data",
            "correlation_id": context.correlation_id,
            "action": context.action,
            "group": group,
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        warn!("No Data In Response: {}", log_data);
    }

    /// Log a throttle denial
    pub fn log_throttled(&self, context: &CycleContext, group: &str, restore_interval: Duration) {
        if !self.should_log(LogLevel::Warn) {
            return;
        }

        let log_data = json!({
            "event": "throttled",
            "correlation_id": context.correlation_id,
            "action": context.action,
            "group": group,
            "restore_ms": restore_interval.as_millis(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        warn!("Throttled: {}", log_data);
    }

    /// Log that another page is about to be requested with a token
    pub fn log_continuation(&self, context: &CycleContext, next_page: usize) {
        if !self.config.request_logging || !self.should_log(LogLevel::Info) {
            return;
        }

        let log_data = json!({
            "event": "continuing",
            "correlation_id": context.correlation_id,
            "action": context.action,
            "next_page": next_page,
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        info!("Fetching More Pages: {}", log_data);
    }

    /// Log a cycle that aborted
    pub fn log_failure(&self, context: &CycleContext, group: &str, error: &str) {
        if !self.should_log(LogLevel::Error) {
            return;
        }

        let log_data = json!({
            "event": "fetch_failed",
            "correlation_id": context.correlation_id,
            "action": context.action,
            "group": group,
            "error": error,
            "duration_ms": context.elapsed().as_millis(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        error!("Fetch Failed: {}", log_data);
    }

    /// Complete a cycle and log its totals
    pub fn complete_cycle(&self, context: &CycleContext, pages: usize, records: usize, has_more: bool) {
        if !self.config.performance_metrics || !self.should_log(LogLevel::Info) {
            return;
        }

        let log_data = json!({
            "event": "cycle_completed",
            "correlation_id": context.correlation_id,
            "action": context.action,
            "pages": pages,
            "records": records,
            "has_more": has_more,
            "duration_ms": context.elapsed().as_millis(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        info!("Fetch Cycle Completed: {}", log_data);
    }

    /// Check if we should log at the given level
    fn should_log(&self, level: LogLevel) -> bool {
        level <= self.config.log_level
    }

    /// Mask values of identity parameters
    fn sanitize(params: &RequestParameters) -> Value {
        let map = params
            .iter()
            .map(|(key, value)| {
                let value = match key {
                    "SellerId" | "Merchant" | "MWSAuthToken" | "AWSAccessKeyId" | "Signature" => {
                        "[REDACTED]".to_string()
                    }
                    _ => value.to_string(),
                };
                (key.to_string(), Value::String(value))
            })
            .collect::<serde_json::Map<_, _>>();
        Value::Object(map)
    }
}
