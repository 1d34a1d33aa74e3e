//! Throttle governance and monitoring
//!
//! Provides per-group throttle budgets and structured logging for
//! MWS list operations.

pub mod config;
pub mod governor;
pub mod logging;

pub use config::{GroupLimit, LogLevel, MonitoringConfig, ResilienceConfig, ResilienceConfigBuilder, ThrottleConfig};
pub use governor::{ThrottleDecision, ThrottleGovernor, ThrottleStats};
pub use logging::{ApiLogger, CycleContext};
