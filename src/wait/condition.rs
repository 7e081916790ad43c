//! Status-code conditions for the two common waits: a record appearing
//! after a create and disappearing after a delete.

use std::fmt;

/// Anything carrying an HTTP status code
pub trait HasStatus {
    fn status(&self) -> u16;
}

/// Reusable status predicate for responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// The read succeeded with the expected status
    Exists { status: u16 },
    /// The read reported the service's "not found" status
    Absent { status: u16 },
}

impl Condition {
    /// Wait for `200 OK`
    pub const fn exists() -> Self {
        Condition::Exists { status: 200 }
    }

    /// Wait for `404 Not Found`
    pub const fn absent() -> Self {
        Condition::Absent { status: 404 }
    }

    /// Wait for a service-specific "not found" status
    pub const fn absent_with(status: u16) -> Self {
        Condition::Absent { status }
    }

    pub const fn status(&self) -> u16 {
        match self {
            Condition::Exists { status } | Condition::Absent { status } => *status,
        }
    }

    pub fn matches<R: HasStatus>(&self, response: &R) -> bool {
        response.status() == self.status()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Exists { status } => write!(f, "present (HTTP {status})"),
            Condition::Absent { status } => write!(f, "absent (HTTP {status})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Status(u16);

    impl HasStatus for Status {
        fn status(&self) -> u16 {
            self.0
        }
    }

    #[test]
    fn test_exists_matches_ok_only() {
        let condition = Condition::exists();
        assert!(condition.matches(&Status(200)));
        assert!(!condition.matches(&Status(404)));
    }

    #[test]
    fn test_absent_with_custom_status() {
        let condition = Condition::absent_with(400);
        assert!(condition.matches(&Status(400)));
        assert!(!condition.matches(&Status(404)));
        assert_eq!(condition.to_string(), "absent (HTTP 400)");
    }
}
