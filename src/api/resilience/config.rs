//! Resilience configuration with builder pattern
//!
//! Provides a unified configuration for throttle budgets, pagination limits
//! and monitoring features with sane defaults.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Global resilience configuration for list operations
#[derive(Debug, Clone, Default)]
pub struct ResilienceConfig {
    pub throttle: ThrottleConfig,
    pub monitoring: MonitoringConfig,
    /// Upper bound on pages per fetch cycle; `None` keeps following tokens
    pub max_pages: Option<usize>,
}

/// Budget for a single throttle group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupLimit {
    /// Maximum burst of requests
    pub limit: u32,
    /// Time for one request of budget to come back
    #[serde(with = "duration_secs", rename = "restore_secs")]
    pub restore_interval: Duration,
}

impl GroupLimit {
    pub const fn new(limit: u32, restore_secs: u64) -> Self {
        Self {
            limit,
            restore_interval: Duration::from_secs(restore_secs),
        }
    }
}

/// Throttle budgets per operation group
#[derive(Debug, Clone)]
pub struct ThrottleConfig {
    pub groups: HashMap<String, GroupLimit>,
    /// Budget for groups without an explicit entry
    pub default_limit: GroupLimit,
    pub enabled: bool,
}

/// Monitoring and logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub correlation_ids: bool,
    pub request_logging: bool,
    pub performance_metrics: bool,
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Published MWS limits for the operations this crate knows about
static KNOWN_GROUPS: Lazy<HashMap<&'static str, GroupLimit>> = Lazy::new(|| {
    HashMap::from([
        ("GetReportList", GroupLimit::new(10, 60)),
        ("GetReportListByNextToken", GroupLimit::new(30, 2)),
        ("GetReportCount", GroupLimit::new(10, 45)),
        ("GetReportRequestList", GroupLimit::new(10, 45)),
        ("GetFeedSubmissionList", GroupLimit::new(10, 45)),
        ("GetFeedSubmissionListByNextToken", GroupLimit::new(30, 2)),
        ("GetFeedSubmissionCount", GroupLimit::new(10, 45)),
        ("CancelFeedSubmissions", GroupLimit::new(10, 45)),
        ("ListOrderItems", GroupLimit::new(30, 2)),
        ("ListOrderItemsByNextToken", GroupLimit::new(30, 2)),
        ("ListMarketplaceParticipations", GroupLimit::new(15, 60)),
        ("ListMarketplaceParticipationsByNextToken", GroupLimit::new(15, 60)),
        ("ListRegisteredDestinations", GroupLimit::new(1, 5)),
        ("ListMatchingProducts", GroupLimit::new(20, 5)),
    ])
});

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            groups: KNOWN_GROUPS
                .iter()
                .map(|(name, limit)| (name.to_string(), *limit))
                .collect(),
            default_limit: GroupLimit::new(10, 60),
            enabled: true,
        }
    }
}

impl ThrottleConfig {
    /// Budget that applies to `group`
    pub fn limit_for(&self, group: &str) -> GroupLimit {
        self.groups.get(group).copied().unwrap_or(self.default_limit)
    }

    /// Set or override a group's budget
    pub fn set_group(&mut self, group: impl Into<String>, limit: GroupLimit) {
        self.groups.insert(group.into(), limit);
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            correlation_ids: true,
            request_logging: true,
            performance_metrics: true,
            log_level: LogLevel::Info,
        }
    }
}

impl ResilienceConfig {
    /// Create a new builder for ResilienceConfig
    pub fn builder() -> ResilienceConfigBuilder {
        ResilienceConfigBuilder::new()
    }

    /// Disable throttling and logging (for tests against fixtures)
    pub fn disabled() -> Self {
        Self {
            throttle: ThrottleConfig {
                enabled: false,
                ..ThrottleConfig::default()
            },
            monitoring: MonitoringConfig {
                correlation_ids: false,
                request_logging: false,
                performance_metrics: false,
                log_level: LogLevel::Error,
            },
            max_pages: None,
        }
    }
}

/// Builder for ResilienceConfig
#[derive(Debug, Default)]
pub struct ResilienceConfigBuilder {
    config: ResilienceConfig,
}

impl ResilienceConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the budget of one throttle group
    pub fn group_limit(mut self, group: impl Into<String>, limit: u32, restore_interval: Duration) -> Self {
        self.config.throttle.set_group(group, GroupLimit { limit, restore_interval });
        self
    }

    /// Budget used for groups not listed explicitly
    pub fn default_limit(mut self, limit: u32, restore_interval: Duration) -> Self {
        self.config.throttle.default_limit = GroupLimit { limit, restore_interval };
        self
    }

    /// Enable/disable throttle bookkeeping
    pub fn enable_throttling(mut self, enabled: bool) -> Self {
        self.config.throttle.enabled = enabled;
        self
    }

    /// Cap the number of pages fetched per cycle
    pub fn max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.config.max_pages = max_pages;
        self
    }

    /// Enable/disable request logging
    pub fn request_logging(mut self, enabled: bool) -> Self {
        self.config.monitoring.request_logging = enabled;
        self
    }

    /// Set logging level
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.monitoring.log_level = level;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> ResilienceConfig {
        self.config
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResilienceConfig::default();

        assert!(config.throttle.enabled);
        assert_eq!(config.throttle.limit_for("GetReportList"), GroupLimit::new(10, 60));
        assert_eq!(config.throttle.limit_for("GetReportListByNextToken"), GroupLimit::new(30, 2));
        assert_eq!(config.max_pages, None);
        assert!(config.monitoring.request_logging);
    }

    #[test]
    fn test_unknown_group_uses_default() {
        let config = ThrottleConfig::default();
        assert_eq!(config.limit_for("SomethingNew"), config.default_limit);
    }

    #[test]
    fn test_disabled_config() {
        let config = ResilienceConfig::disabled();

        assert!(!config.throttle.enabled);
        assert!(!config.monitoring.request_logging);
    }

    #[test]
    fn test_builder_pattern() {
        let config = ResilienceConfig::builder()
            .group_limit("GetReportList", 2, Duration::from_secs(5))
            .default_limit(1, Duration::from_secs(1))
            .max_pages(Some(3))
            .log_level(LogLevel::Debug)
            .build();

        assert_eq!(config.throttle.limit_for("GetReportList").limit, 2);
        assert_eq!(config.throttle.limit_for("Unlisted").limit, 1);
        assert_eq!(config.max_pages, Some(3));
        assert_eq!(config.monitoring.log_level, LogLevel::Debug);
    }
}
