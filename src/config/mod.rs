//! Application configuration
//!
//! Settings come from a TOML file, then `.env` and the process environment
//! override the seller identity and endpoint.

use crate::api::constants;
use crate::api::resilience::{GroupLimit, MonitoringConfig, ResilienceConfig, ThrottleConfig};
use anyhow::{Context, Result, bail};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_ENDPOINT: &str = "MWS_ENDPOINT";
pub const ENV_SELLER_ID: &str = "MWS_SELLER_ID";
pub const ENV_MARKETPLACE_ID: &str = "MWS_MARKETPLACE_ID";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    pub seller_id: Option<String>,
    pub marketplace_id: Option<String>,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub throttle: ThrottleSettings,
    pub monitoring: MonitoringConfig,
    pub pagination: PaginationSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleSettings {
    pub enabled: bool,
    pub default_limit: u32,
    pub default_restore_secs: u64,
    /// Overrides of the built-in per-group budgets
    pub groups: HashMap<String, GroupLimit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationSettings {
    pub max_pages: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: constants::DEFAULT_ENDPOINT.to_string(),
            seller_id: None,
            marketplace_id: None,
            user_agent: constants::USER_AGENT.to_string(),
            timeout_secs: 30,
            throttle: ThrottleSettings::default(),
            monitoring: MonitoringConfig::default(),
            pagination: PaginationSettings::default(),
        }
    }
}

impl Default for ThrottleSettings {
    fn default() -> Self {
        let defaults = ThrottleConfig::default();
        Self {
            enabled: true,
            default_limit: defaults.default_limit.limit,
            default_restore_secs: defaults.default_limit.restore_interval.as_secs(),
            groups: HashMap::new(),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("mws-client");
        Ok(config_dir.join("config.toml"))
    }

    /// Load from `path` (or the default location), then apply `.env` and
    /// environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };

        let mut config = Self::load_from(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Read a config file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", path);

        if !path.exists() {
            info!("Config file {:?} doesn't exist, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))?;
        config.validate().with_context(|| format!("Invalid config file: {:?}", path))?;

        debug!("Loaded config with {} throttle overrides", config.throttle.groups.len());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.pagination.max_pages == Some(0) {
            bail!("pagination.max_pages must be at least 1; leave it unset for no cap");
        }
        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
            }
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
        fs::write(path, content).with_context(|| format!("Failed to write config file: {:?}", path))?;

        info!("Config saved to {:?}", path);
        Ok(())
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(endpoint) = value(ENV_ENDPOINT) {
            debug!("Endpoint overridden by {}", ENV_ENDPOINT);
            self.endpoint = endpoint;
        }
        if let Some(seller_id) = value(ENV_SELLER_ID) {
            self.seller_id = Some(seller_id);
        }
        if let Some(marketplace_id) = value(ENV_MARKETPLACE_ID) {
            self.marketplace_id = Some(marketplace_id);
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Throttle, monitoring and pagination settings for the API layer
    pub fn resilience(&self) -> ResilienceConfig {
        let mut throttle = ThrottleConfig {
            enabled: self.throttle.enabled,
            default_limit: GroupLimit::new(self.throttle.default_limit, self.throttle.default_restore_secs),
            ..ThrottleConfig::default()
        };
        for (group, limit) in &self.throttle.groups {
            throttle.set_group(group.clone(), *limit);
        }

        ResilienceConfig {
            throttle,
            monitoring: self.monitoring.clone(),
            max_pages: self.pagination.max_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::resilience::LogLevel;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.endpoint, "https://mws.amazonservices.com");
        assert!(config.resilience().throttle.enabled);
    }

    #[test]
    fn test_toml_sections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
endpoint = "https://mws-eu.amazonservices.com"
seller_id = "A2SELLER"
timeout_secs = 10

[throttle]
default_limit = 4
default_restore_secs = 20

[throttle.groups.GetReportList]
limit = 2
restore_secs = 90

[monitoring]
log_level = "debug"

[pagination]
max_pages = 25
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.seller_id.as_deref(), Some("A2SELLER"));
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.monitoring.log_level, LogLevel::Debug);

        let resilience = config.resilience();
        assert_eq!(resilience.max_pages, Some(25));
        assert_eq!(resilience.throttle.limit_for("GetReportList"), GroupLimit::new(2, 90));
        assert_eq!(resilience.throttle.limit_for("SomethingNew"), GroupLimit::new(4, 20));
        // built-in budgets survive partial overrides
        assert_eq!(resilience.throttle.limit_for("GetReportListByNextToken"), GroupLimit::new(30, 2));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = \"soon\"").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_zero_page_cap_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[pagination]\nmax_pages = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("max_pages must be at least 1"));

        fs::write(&path, "[pagination]\nmax_pages = 1\n").unwrap();
        assert_eq!(Config::load_from(&path).unwrap().pagination.max_pages, Some(1));
    }

    #[test]
    fn test_environment_overrides() {
        let mut config = Config::default();
        config.apply_overrides(|key| match key {
            ENV_SELLER_ID => Some("A3ENV".to_string()),
            ENV_ENDPOINT => Some("  ".to_string()),
            _ => None,
        });

        assert_eq!(config.seller_id.as_deref(), Some("A3ENV"));
        assert_eq!(config.endpoint, constants::DEFAULT_ENDPOINT);
        assert_eq!(config.marketplace_id, None);
    }

    #[test]
    fn test_save_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.marketplace_id = Some("ATVPDKIKX0DER".to_string());
        config.pagination.max_pages = Some(3);

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }
}
