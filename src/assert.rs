//! Assertion errors and soft assertions
//!
//! Fluent response checks (see [`crate::client::ApiResponse`]) fail fast with
//! an [`AssertionError`]. [`SoftAssertions`] instead collects every failure
//! and reports them together.

use std::fmt::Debug;
use thiserror::Error;

/// Longest body excerpt carried in a status mismatch
const BODY_EXCERPT_LEN: usize = 512;

/// A failed expectation about a response or a decoded record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssertionError {
    #[error("Expected status {expected}, got {actual} (body: {body})")]
    Status {
        expected: u16,
        actual: u16,
        body: String,
    },

    #[error("Expected `{path}` to be {expected:?}, got {actual:?}")]
    JsonValue {
        path: String,
        expected: String,
        actual: Option<String>,
    },

    #[error("Expected `{path}` to contain {fragment:?}, got {actual:?}")]
    JsonContains {
        path: String,
        fragment: String,
        actual: Option<String>,
    },

    #[error("Expected `{path}` to be null, got {actual:?}")]
    JsonNotNull { path: String, actual: String },

    #[error("Expected `{path}` to be present and not null")]
    JsonMissing { path: String },

    #[error("Failed to decode response body as {target}: {reason}")]
    Decode { target: String, reason: String },

    #[error("{what}: expected {expected}, got {actual}")]
    Mismatch {
        what: String,
        expected: String,
        actual: String,
    },

    #[error("{0}")]
    Failed(String),

    #[error("{} assertions failed: {}", .0.len(), join_failures(.0))]
    Multiple(Vec<AssertionError>),
}

fn join_failures(failures: &[AssertionError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl AssertionError {
    pub(crate) fn status(expected: u16, actual: u16, body: &str) -> Self {
        let body = if body.len() > BODY_EXCERPT_LEN {
            let mut end = BODY_EXCERPT_LEN;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &body[..end])
        } else {
            body.to_string()
        };

        AssertionError::Status {
            expected,
            actual,
            body,
        }
    }
}

/// Compare two values, reporting both sides on mismatch
pub fn expect_eq<T: PartialEq + Debug>(
    what: &str,
    actual: &T,
    expected: &T,
) -> Result<(), AssertionError> {
    if actual == expected {
        Ok(())
    } else {
        Err(AssertionError::Mismatch {
            what: what.to_string(),
            expected: format!("{expected:?}"),
            actual: format!("{actual:?}"),
        })
    }
}

/// Fail with `message` unless `condition` holds
pub fn expect_true(condition: bool, message: &str) -> Result<(), AssertionError> {
    if condition {
        Ok(())
    } else {
        Err(AssertionError::Failed(message.to_string()))
    }
}

/// Collects assertion failures instead of stopping at the first one
///
/// ```
/// use apiprobe::assert::SoftAssertions;
///
/// let mut softly = SoftAssertions::new();
/// softly.assert_eq("status", &200, &200);
/// softly.assert_true("1234".chars().all(|c| c.is_ascii_digit()), "message must be numeric");
/// assert!(softly.finish().is_ok());
/// ```
#[derive(Debug, Default)]
pub struct SoftAssertions {
    failures: Vec<AssertionError>,
}

impl SoftAssertions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the error of a failed check, passing through its value otherwise
    pub fn check<T>(&mut self, result: Result<T, AssertionError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.failures.push(e);
                None
            }
        }
    }

    pub fn assert_eq<T: PartialEq + Debug>(&mut self, what: &str, actual: &T, expected: &T) {
        self.check(expect_eq(what, actual, expected));
    }

    pub fn assert_true(&mut self, condition: bool, message: &str) {
        self.check(expect_true(condition, message));
    }

    pub fn failures(&self) -> &[AssertionError] {
        &self.failures
    }

    /// Report every collected failure
    ///
    /// A single failure is returned as is; several are wrapped in
    /// [`AssertionError::Multiple`].
    pub fn finish(mut self) -> Result<(), AssertionError> {
        match self.failures.len() {
            0 => Ok(()),
            1 => Err(self.failures.remove(0)),
            _ => Err(AssertionError::Multiple(self.failures)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expect_eq() {
        assert!(expect_eq("code", &200, &200).is_ok());

        let err = expect_eq("code", &404, &200).unwrap_err();
        assert_eq!(err.to_string(), "code: expected 200, got 404");
    }

    #[test]
    fn test_status_body_is_truncated() {
        let body = "x".repeat(2000);
        match AssertionError::status(200, 500, &body) {
            AssertionError::Status { body, .. } => assert_eq!(body.len(), BODY_EXCERPT_LEN + 3),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_soft_assertions_collect_all_failures() {
        let mut softly = SoftAssertions::new();
        softly.assert_eq("status", &500, &200);
        softly.assert_eq("type", &"unknown", &"unknown");
        softly.assert_true(false, "message must contain only digits");

        assert_eq!(softly.failures().len(), 2);
        let err = softly.finish().unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("2 assertions failed"), "{text}");
        assert!(text.contains("message must contain only digits"));
    }

    #[test]
    fn test_soft_assertions_single_failure_is_unwrapped() {
        let mut softly = SoftAssertions::new();
        softly.assert_true(false, "boom");
        assert_eq!(softly.finish(), Err(AssertionError::Failed("boom".into())));
    }

    #[test]
    fn test_soft_assertions_check_passes_value_through() {
        let mut softly = SoftAssertions::new();
        assert_eq!(softly.check(Ok::<_, AssertionError>(7)), Some(7));
        assert!(softly.finish().is_ok());
    }
}
