//! Check trait and supporting types
//!
//! The `Check` trait defines the interface for all checks.
//! Each check can be configured via `CheckOptions` and returns a `CheckResult`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::assert::AssertionError;
use crate::client::{ClientError, SuperheroClient, UserClient};
use crate::wait::WaitContract;

/// Option: clear test data before and after each scenario
pub const OPT_CLEANUP: &str = "cleanup";

/// Option: also run scenarios documenting known service defects
pub const OPT_INCLUDE_KNOWN_ISSUES: &str = "include_known_issues";

/// Errors that can occur during check execution
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Assertion failed: {0}")]
    Assertion(#[from] AssertionError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Check failed: {0}")]
    Failed(String),
}

/// Result of a single scenario within a check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Scenario name
    pub scenario: String,
    /// Whether this scenario passed
    pub passed: bool,
    /// Optional error message if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Additional details (scenario-specific)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub details: HashMap<String, serde_json::Value>,
}

impl ScenarioResult {
    /// Create a passing result
    pub fn passed(scenario: impl Into<String>) -> Self {
        Self {
            scenario: scenario.into(),
            passed: true,
            error: None,
            details: HashMap::new(),
        }
    }

    /// Create a failing result
    pub fn failed(scenario: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            scenario: scenario.into(),
            passed: false,
            error: Some(error.into()),
            details: HashMap::new(),
        }
    }

    /// A scenario that was not run; counts as passed
    pub fn skipped(scenario: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::passed(scenario).with_detail("skipped", reason.into())
    }

    pub fn is_skipped(&self) -> bool {
        self.details.contains_key("skipped")
    }

    /// Add a detail to the result
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.details.insert(key.into(), v);
        }
        self
    }
}

/// Overall result of a check execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Name of the check
    pub check_name: String,
    /// Whether every scenario passed
    pub passed: bool,
    /// Individual scenario results
    pub scenario_results: Vec<ScenarioResult>,
    /// How long the check took
    pub duration: Duration,
    /// Summary message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckResult {
    /// Create a new check result
    pub fn new(
        check_name: impl Into<String>,
        scenario_results: Vec<ScenarioResult>,
        duration: Duration,
    ) -> Self {
        let passed = scenario_results.iter().all(|r| r.passed);
        Self {
            check_name: check_name.into(),
            passed,
            scenario_results,
            duration,
            message: None,
        }
    }

    /// Add a summary message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// "N passed, M failed, K skipped"
    pub fn summary(&self) -> String {
        let skipped = self
            .scenario_results
            .iter()
            .filter(|r| r.is_skipped())
            .count();
        let failed = self.scenario_results.iter().filter(|r| !r.passed).count();
        let passed = self.scenario_results.len() - failed - skipped;
        format!("{passed} passed, {failed} failed, {skipped} skipped")
    }
}

/// Configuration options for a check
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckOptions {
    /// Maximum time to wait for check completion
    #[serde(
        default,
        with = "humantime_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,

    /// Number of retry attempts for a failed check
    #[serde(default)]
    pub retries: u32,

    /// Delay between retry attempts
    #[serde(
        default,
        with = "humantime_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub retry_delay: Option<Duration>,

    /// Check-specific options (arbitrary key-value pairs)
    #[serde(default, flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl CheckOptions {
    /// Get the timeout or a default value
    pub fn timeout_or(&self, default: Duration) -> Duration {
        self.timeout.unwrap_or(default)
    }

    /// Get the retry delay or a default value
    pub fn retry_delay_or(&self, default: Duration) -> Duration {
        self.retry_delay.unwrap_or(default)
    }

    /// Get an extra option as a specific type
    pub fn get_extra<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Option<T> {
        self.extra
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Get a boolean extra option or a default value
    pub fn flag(&self, key: &str, default: bool) -> bool {
        self.get_extra(key).unwrap_or(default)
    }

    /// Set an extra option
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(value) {
            self.extra.insert(key.into(), v);
        }
        self
    }
}

/// Context provided to checks during execution
#[derive(Debug, Clone)]
pub struct CheckContext {
    /// Superhero service client
    pub superhero: Arc<SuperheroClient>,
    /// Pet-store user client
    pub users: Arc<UserClient>,
    /// Wait contract shared by both clients
    pub wait: WaitContract,
}

impl CheckContext {
    /// Create a new check context
    pub fn new(superhero: Arc<SuperheroClient>, users: Arc<UserClient>, wait: WaitContract) -> Self {
        Self {
            superhero,
            users,
            wait,
        }
    }
}

/// Trait for implementing checks
///
/// Each check exercises one area of a service through a list of scenarios.
/// Checks are registered in the `CHECKS` registry and can be invoked by name.
///
/// ## Example Implementation
///
/// ```ignore
/// use async_trait::async_trait;
/// use apiprobe::checks::{Check, CheckContext, CheckOptions, CheckResult, CheckError};
///
/// pub struct MyCheck;
///
/// #[async_trait]
/// impl Check for MyCheck {
///     fn name(&self) -> &'static str { "mycheck" }
///     fn description(&self) -> &'static str { "Verifies something important" }
///
///     async fn run(&self, ctx: &CheckContext, opts: &CheckOptions) -> Result<CheckResult, CheckError> {
///         // Implementation here
///         todo!()
///     }
/// }
/// ```
#[async_trait]
pub trait Check: Send + Sync {
    /// Unique name for this check (used in CLI and config)
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Run the check against the services
    async fn run(&self, ctx: &CheckContext, opts: &CheckOptions)
    -> Result<CheckResult, CheckError>;

    /// Default options for this check
    fn default_options(&self) -> CheckOptions {
        CheckOptions {
            timeout: Some(Duration::from_secs(300)), // 5 minutes default
            retries: 0,
            retry_delay: Some(Duration::from_secs(2)),
            extra: HashMap::new(),
        }
        .with_extra(OPT_CLEANUP, true)
        .with_extra(OPT_INCLUDE_KNOWN_ISSUES, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_passed_requires_all_scenarios() {
        let result = CheckResult::new(
            "demo",
            vec![
                ScenarioResult::passed("a"),
                ScenarioResult::failed("b", "boom"),
            ],
            Duration::from_millis(5),
        );
        assert!(!result.passed);
        assert_eq!(result.summary(), "1 passed, 1 failed, 0 skipped");
    }

    #[test]
    fn test_skipped_scenarios_count_as_passed() {
        let result = CheckResult::new(
            "demo",
            vec![
                ScenarioResult::passed("a"),
                ScenarioResult::skipped("b", "known issue"),
            ],
            Duration::ZERO,
        );
        assert!(result.passed);
        assert_eq!(result.summary(), "1 passed, 0 failed, 1 skipped");
    }

    #[test]
    fn test_options_flag() {
        let opts = CheckOptions::default().with_extra(OPT_CLEANUP, false);
        assert!(!opts.flag(OPT_CLEANUP, true));
        assert!(opts.flag("missing", true));
    }

    #[test]
    fn test_check_error_from_assertion() {
        let err: CheckError = AssertionError::Failed("nope".into()).into();
        assert_eq!(err.to_string(), "Assertion failed: nope");
    }
}
