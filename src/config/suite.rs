//! Suite configuration types
//!
//! Defines the structure of the YAML configuration file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::checks::{CheckContext, CheckOptions};
use crate::client::{ApiClient, SuperheroClient, UserClient};
use crate::wait::{ContractError, DeadlinePolicy, WaitContract};

/// Default superhero service
pub const DEFAULT_SUPERHERO_URL: &str = "https://superhero.qa-test.csssr.com/";

/// Default pet-store service
pub const DEFAULT_PETSTORE_URL: &str = "https://petstore.swagger.io/";

/// Default pet-store API version prefix
pub const DEFAULT_PETSTORE_BASE_PATH: &str = "v2/";

/// Errors that can occur during configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid wait contract: {0}")]
    Contract(#[from] ContractError),

    #[error("Failed to create client: {0}")]
    Client(#[from] crate::client::ClientError),
}

/// Connection settings for one service
///
/// Passed explicitly to each client constructor; there is no process-wide
/// request default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Service root (e.g. "https://petstore.swagger.io/")
    pub base_url: String,
    /// Path prefix joined onto the root (e.g. "v2/")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    /// Timeout for a single request
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

impl ServiceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            base_path: None,
            request_timeout: default_request_timeout(),
        }
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Base URL with the base path appended
    pub fn endpoint(&self) -> String {
        let root = self.base_url.trim_end_matches('/');
        match self.base_path.as_deref().map(|p| p.trim_matches('/')) {
            Some(path) if !path.is_empty() => format!("{root}/{path}/"),
            _ => format!("{root}/"),
        }
    }
}

/// Services under test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicesConfig {
    #[serde(default = "default_superhero")]
    pub superhero: ServiceConfig,
    #[serde(default = "default_petstore")]
    pub petstore: ServiceConfig,
}

fn default_superhero() -> ServiceConfig {
    ServiceConfig::new(DEFAULT_SUPERHERO_URL)
}

fn default_petstore() -> ServiceConfig {
    ServiceConfig::new(DEFAULT_PETSTORE_URL).with_base_path(DEFAULT_PETSTORE_BASE_PATH)
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            superhero: default_superhero(),
            petstore: default_petstore(),
        }
    }
}

/// Eventual-consistency wait settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitConfig {
    /// Maximum total wait
    #[serde(default = "default_wait_timeout", with = "humantime_serde")]
    pub timeout: Duration,
    /// Fixed delay between reads
    #[serde(default = "default_wait_interval", with = "humantime_serde")]
    pub interval: Duration,
    /// Whether one last read is made at the deadline
    #[serde(default)]
    pub deadline: DeadlinePolicy,
}

fn default_wait_timeout() -> Duration {
    WaitContract::DEFAULT_TIMEOUT
}

fn default_wait_interval() -> Duration {
    WaitContract::DEFAULT_INTERVAL
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            timeout: default_wait_timeout(),
            interval: default_wait_interval(),
            deadline: DeadlinePolicy::default(),
        }
    }
}

impl WaitConfig {
    /// Validate into a wait contract
    pub fn to_contract(&self) -> Result<WaitContract, ContractError> {
        Ok(WaitContract::new(self.timeout, self.interval)?.with_policy(self.deadline))
    }
}

/// Configuration for a single check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Whether this check is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Timeout for this check
    #[serde(
        default,
        with = "humantime_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,

    /// Number of retries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,

    /// Delay between retries
    #[serde(
        default,
        with = "humantime_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub retry_delay: Option<Duration>,

    /// Additional check-specific options
    #[serde(default, flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

fn default_enabled() -> bool {
    true
}

impl CheckConfig {
    /// Convert to CheckOptions, layering configured values over `defaults`
    pub fn to_check_options(&self, defaults: &CheckOptions) -> CheckOptions {
        let mut extra = defaults.extra.clone();
        extra.extend(self.extra.clone());

        CheckOptions {
            timeout: self.timeout.or(defaults.timeout),
            retries: self.retries.unwrap_or(defaults.retries),
            retry_delay: self.retry_delay.or(defaults.retry_delay),
            extra,
        }
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout: None,
            retries: None,
            retry_delay: None,
            extra: HashMap::new(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Services under test
    #[serde(default)]
    pub services: ServicesConfig,

    /// Eventual-consistency wait settings
    #[serde(default)]
    pub wait: WaitConfig,

    /// Check configurations (check_name -> config)
    #[serde(default)]
    pub checks: HashMap<String, CheckConfig>,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.wait.to_contract()?;

        for (name, service) in [
            ("superhero", &self.services.superhero),
            ("petstore", &self.services.petstore),
        ] {
            if service.base_url.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "services.{name}.base_url must not be empty"
                )));
            }
        }

        Ok(())
    }

    /// Get configuration for a specific check
    pub fn check_config(&self, name: &str) -> Option<&CheckConfig> {
        self.checks.get(name)
    }

    /// Check if a specific check is enabled
    pub fn is_check_enabled(&self, name: &str) -> bool {
        self.checks.get(name).map(|c| c.enabled).unwrap_or(true) // Default to enabled if not specified
    }

    /// Get list of enabled checks
    pub fn enabled_checks(&self) -> Vec<&str> {
        self.checks
            .iter()
            .filter(|(_, c)| c.enabled)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Build the clients and wait contract the checks run against
    pub fn to_check_context(&self) -> Result<CheckContext, ConfigError> {
        let wait = self.wait.to_contract()?;

        let superhero = ApiClient::from_config(&self.services.superhero)?.with_name("superhero");
        let petstore = ApiClient::from_config(&self.services.petstore)?.with_name("petstore");

        Ok(CheckContext::new(
            Arc::new(SuperheroClient::new(superhero, wait)),
            Arc::new(UserClient::new(petstore, wait)),
            wait,
        ))
    }

    /// Generate a default configuration
    pub fn default_config() -> Self {
        Config {
            services: ServicesConfig::default(),
            wait: WaitConfig::default(),
            checks: crate::checks::list_checks()
                .into_iter()
                .map(|name| (name.to_string(), CheckConfig::default()))
                .collect(),
        }
    }

    /// Serialize to YAML string
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CONFIG: &str = r"
services:
  superhero:
    base_url: http://localhost:8080
    request_timeout: 5s
  petstore:
    base_url: http://localhost:9090/
    base_path: v2/

wait:
  timeout: 10s
  interval: 250ms
  deadline: final-attempt

checks:
  superhero-create:
    enabled: true
    timeout: 5m
    cleanup: false
  user-lifecycle:
    enabled: false
";

    #[test]
    fn test_parse_config() {
        let config = Config::from_yaml(SAMPLE_CONFIG).unwrap();
        assert_eq!(config.services.superhero.base_url, "http://localhost:8080");
        assert_eq!(
            config.services.superhero.request_timeout,
            Duration::from_secs(5)
        );
        assert_eq!(config.services.petstore.endpoint(), "http://localhost:9090/v2/");
        assert_eq!(config.wait.timeout, Duration::from_secs(10));
        assert_eq!(config.wait.interval, Duration::from_millis(250));
        assert_eq!(config.wait.deadline, DeadlinePolicy::FinalAttempt);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.services, ServicesConfig::default());
        assert_eq!(config.wait, WaitConfig::default());
        assert_eq!(
            config.services.petstore.endpoint(),
            "https://petstore.swagger.io/v2/"
        );
        assert_eq!(
            config.services.superhero.endpoint(),
            "https://superhero.qa-test.csssr.com/"
        );
    }

    #[test]
    fn test_rejects_degenerate_wait() {
        let yaml = "wait:\n  timeout: 100ms\n  interval: 500ms\n";
        assert!(matches!(
            Config::from_yaml(yaml),
            Err(ConfigError::Contract(
                ContractError::TimeoutNotAboveInterval { .. }
            ))
        ));

        let yaml = "wait:\n  interval: 0s\n";
        assert!(matches!(
            Config::from_yaml(yaml),
            Err(ConfigError::Contract(ContractError::ZeroInterval))
        ));
    }

    #[test]
    fn test_rejects_empty_base_url() {
        let yaml = "services:\n  superhero:\n    base_url: ''\n";
        assert!(matches!(
            Config::from_yaml(yaml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_check_enabled() {
        let config = Config::from_yaml(SAMPLE_CONFIG).unwrap();
        assert!(config.is_check_enabled("superhero-create"));
        assert!(!config.is_check_enabled("user-lifecycle"));
        assert!(config.is_check_enabled("unknown")); // Default to enabled
        assert_eq!(config.enabled_checks(), vec!["superhero-create"]);
    }

    #[test]
    fn test_check_options_layering() {
        let config = Config::from_yaml(SAMPLE_CONFIG).unwrap();
        let mut defaults = CheckOptions::default();
        defaults
            .extra
            .insert("include_known_issues".into(), serde_json::json!(false));

        let opts = config
            .check_config("superhero-create")
            .unwrap()
            .to_check_options(&defaults);
        assert_eq!(opts.timeout, Some(Duration::from_secs(300)));
        assert_eq!(opts.get_extra::<bool>("cleanup"), Some(false));
        assert_eq!(opts.get_extra::<bool>("include_known_issues"), Some(false));
    }

    #[test]
    fn test_default_config_lists_every_check() {
        let config = Config::default_config();
        for name in crate::checks::list_checks() {
            assert!(config.checks.contains_key(name), "missing {name}");
        }
    }

    #[test]
    fn test_roundtrip() {
        let config = Config::default_config();
        let yaml = config.to_yaml().unwrap();
        let parsed = Config::from_yaml(&yaml).unwrap();
        assert_eq!(config.services, parsed.services);
        assert_eq!(config.wait, parsed.wait);
        assert_eq!(config.checks.len(), parsed.checks.len());
    }

    #[test]
    fn test_to_check_context() {
        let config = Config::default_config();
        let ctx = config.to_check_context().unwrap();
        assert_eq!(ctx.superhero.api().name(), Some("superhero"));
        assert_eq!(
            ctx.users.api().base_url().as_str(),
            "https://petstore.swagger.io/v2/"
        );
        assert_eq!(ctx.wait, WaitContract::default());
    }
}
