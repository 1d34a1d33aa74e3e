//! Per-group throttle bookkeeping
//!
//! Tracks the remaining request budget of every throttle group. Budget is
//! consumed one request at a time and is never refilled in the background:
//! the restore interval is reported to callers so they can decide to wait.
//! A governor is cheap to clone and every clone shares the same counters, so
//! all list objects built from one governor draw from the same budgets.

use super::config::{GroupLimit, ThrottleConfig};
use log::{debug, warn};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of a budget check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// The call may proceed; `remaining` is what is left after this one
    Allowed { remaining: u32 },
    /// No budget left; one request comes back every `restore_interval`
    Throttled { restore_interval: Duration },
}

impl ThrottleDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, ThrottleDecision::Allowed { .. })
    }
}

#[derive(Debug, Clone)]
pub struct ThrottleGovernor {
    inner: Arc<Mutex<HashMap<String, GroupState>>>,
    config: Arc<ThrottleConfig>,
}

#[derive(Debug, Clone)]
struct GroupState {
    remaining: u32,
    limit: GroupLimit,
    requests_made: u64,
    requests_rejected: u64,
}

impl GroupState {
    fn fresh(limit: GroupLimit) -> Self {
        Self {
            remaining: limit.limit,
            limit,
            requests_made: 0,
            requests_rejected: 0,
        }
    }
}

impl ThrottleGovernor {
    pub fn new(config: ThrottleConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            config: Arc::new(config),
        }
    }

    /// Governor that allows every call
    pub fn unlimited() -> Self {
        Self::new(ThrottleConfig {
            enabled: false,
            ..ThrottleConfig::default()
        })
    }

    /// Check the group's budget and consume one request if any is left
    pub fn check_and_consume(&self, group: &str) -> ThrottleDecision {
        if !self.config.enabled {
            return ThrottleDecision::Allowed { remaining: u32::MAX };
        }

        let mut groups = self.inner.lock();
        let state = self.state_mut(&mut groups, group);

        if state.remaining > 0 {
            state.remaining -= 1;
            state.requests_made += 1;
            debug!("Throttle: '{}' approved, {} remaining", group, state.remaining);
            ThrottleDecision::Allowed {
                remaining: state.remaining,
            }
        } else {
            state.requests_rejected += 1;
            warn!(
                "Throttle: '{}' has no budget left, restores every {:?}",
                group, state.limit.restore_interval
            );
            ThrottleDecision::Throttled {
                restore_interval: state.limit.restore_interval,
            }
        }
    }

    /// Remaining budget for a group (the full limit if it was never used)
    pub fn remaining(&self, group: &str) -> u32 {
        let groups = self.inner.lock();
        groups
            .get(group)
            .map(|state| state.remaining)
            .unwrap_or_else(|| self.config.limit_for(group).limit)
    }

    /// Configured restore interval of a group
    pub fn restore_interval(&self, group: &str) -> Duration {
        self.config.limit_for(group).restore_interval
    }

    /// Give back `units` requests to a group, capped at its limit.
    /// Callers that waited out the restore interval use this to record it.
    pub fn replenish(&self, group: &str, units: u32) {
        let mut groups = self.inner.lock();
        let state = self.state_mut(&mut groups, group);
        state.remaining = state.remaining.saturating_add(units).min(state.limit.limit);
        debug!("Throttle: '{}' replenished to {}", group, state.remaining);
    }

    /// Force a group's remaining budget to an exact value
    pub fn set_remaining(&self, group: &str, remaining: u32) {
        let mut groups = self.inner.lock();
        let state = self.state_mut(&mut groups, group);
        state.remaining = remaining;
    }

    /// Reset every group to its full budget and clear statistics
    pub fn reset(&self) {
        self.inner.lock().clear();
    }

    /// Statistics for one group
    pub fn stats(&self, group: &str) -> ThrottleStats {
        let groups = self.inner.lock();
        let state = groups
            .get(group)
            .cloned()
            .unwrap_or_else(|| GroupState::fresh(self.config.limit_for(group)));

        ThrottleStats {
            group: group.to_string(),
            remaining: state.remaining,
            limit: state.limit.limit,
            restore_interval: state.limit.restore_interval,
            requests_made: state.requests_made,
            requests_rejected: state.requests_rejected,
            enabled: self.config.enabled,
        }
    }

    fn state_mut<'a>(&self, groups: &'a mut HashMap<String, GroupState>, group: &str) -> &'a mut GroupState {
        groups
            .entry(group.to_string())
            .or_insert_with(|| GroupState::fresh(self.config.limit_for(group)))
    }
}

impl Default for ThrottleGovernor {
    fn default() -> Self {
        Self::new(ThrottleConfig::default())
    }
}

/// Throttle statistics for one group
#[derive(Debug, Clone)]
pub struct ThrottleStats {
    pub group: String,
    /// Requests left before the group is throttled
    pub remaining: u32,
    /// Configured burst limit
    pub limit: u32,
    pub restore_interval: Duration,
    /// Total requests that were approved
    pub requests_made: u64,
    /// Total requests that were denied
    pub requests_rejected: u64,
    pub enabled: bool,
}

impl ThrottleStats {
    /// Calculate the acceptance rate (approved / total)
    pub fn acceptance_rate(&self) -> f64 {
        let total = self.requests_made + self.requests_rejected;
        if total == 0 {
            1.0
        } else {
            self.requests_made as f64 / total as f64
        }
    }
}
