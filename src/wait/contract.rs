//! Wait contract configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// What happens once the deadline is reached without a passing result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeadlinePolicy {
    /// No attempt starts at or after the deadline
    #[default]
    Strict,
    /// One last attempt is made at the deadline and its result still counts
    FinalAttempt,
}

impl std::fmt::Display for DeadlinePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeadlinePolicy::Strict => write!(f, "strict"),
            DeadlinePolicy::FinalAttempt => write!(f, "final-attempt"),
        }
    }
}

/// Rejected wait contract parameters
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("Poll interval must be greater than zero")]
    ZeroInterval,

    #[error("Timeout {timeout:?} must be greater than poll interval {interval:?}")]
    TimeoutNotAboveInterval {
        timeout: Duration,
        interval: Duration,
    },
}

/// Timeout, interval and deadline policy governing a poll
///
/// Always satisfies `0 < interval < timeout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitContract {
    timeout: Duration,
    interval: Duration,
    policy: DeadlinePolicy,
}

impl WaitContract {
    /// Default maximum wait
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

    /// Default delay between attempts
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

    /// Create a contract with the strict deadline policy
    pub fn new(timeout: Duration, interval: Duration) -> Result<Self, ContractError> {
        if interval.is_zero() {
            return Err(ContractError::ZeroInterval);
        }
        if timeout <= interval {
            return Err(ContractError::TimeoutNotAboveInterval { timeout, interval });
        }

        Ok(Self {
            timeout,
            interval,
            policy: DeadlinePolicy::Strict,
        })
    }

    /// Set the deadline policy
    pub fn with_policy(mut self, policy: DeadlinePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn policy(&self) -> DeadlinePolicy {
        self.policy
    }
}

impl Default for WaitContract {
    fn default() -> Self {
        Self {
            timeout: Self::DEFAULT_TIMEOUT,
            interval: Self::DEFAULT_INTERVAL,
            policy: DeadlinePolicy::Strict,
        }
    }
}
