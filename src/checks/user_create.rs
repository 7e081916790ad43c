//! Pet-store user create check
//!
//! `POST user` acknowledges every accepted user with
//! `{"code":200,"type":"unknown","message":"<id>"}`. All parts of the
//! acknowledgement are checked softly so one run reports every deviation.

use async_trait::async_trait;
use std::time::Instant;
use tracing::info;

use super::scenario::{ScenarioRunner, TestData};
use super::traits::{Check, CheckContext, CheckError, CheckOptions, CheckResult};
use crate::assert::SoftAssertions;
use crate::client::{ApiResponse, BasicResponse, User};
use crate::fixtures;

pub struct UserCreateCheck;

#[async_trait]
impl Check for UserCreateCheck {
    fn name(&self) -> &'static str {
        "user-create"
    }

    fn description(&self) -> &'static str {
        "Create pet-store users and verify the acknowledgement body"
    }

    async fn run(
        &self,
        ctx: &CheckContext,
        opts: &CheckOptions,
    ) -> Result<CheckResult, CheckError> {
        let start = Instant::now();
        let runner = ScenarioRunner::new(ctx, opts, fixture_users());

        info!("Starting user-create check");

        let results = vec![
            runner
                .run("create user", create_user(ctx, fixtures::default_user()))
                .await,
            runner
                .run(
                    "create user without any fields",
                    create_user(ctx, fixtures::invalid_user()),
                )
                .await,
        ];

        let result = CheckResult::new(self.name(), results, start.elapsed());
        info!(passed = result.passed, summary = %result.summary(), "User-create check complete");
        let message = result.summary();
        Ok(result.with_message(message))
    }
}

/// Users the user checks may leave behind
pub(crate) fn fixture_users() -> TestData {
    let usernames = [
        fixtures::default_user(),
        fixtures::invalid_user(),
        fixtures::steve_rogers(),
        fixtures::jonathan_crane(),
    ]
    .into_iter()
    .filter_map(|user| user.username)
    .collect();

    TestData::Users(usernames)
}

async fn create_user(ctx: &CheckContext, user: User) -> Result<(), CheckError> {
    let response = ctx.users.create_user(&user).await?;
    expect_acknowledged(&response)?;
    Ok(())
}

/// Check the acknowledgement of a created or updated user
pub(crate) fn expect_acknowledged(response: &ApiResponse) -> Result<BasicResponse, CheckError> {
    let body: BasicResponse = response.decode()?;
    let message = body.message.clone().unwrap_or_default();

    let mut softly = SoftAssertions::new();
    softly.assert_eq("HTTP status", &response.status(), &200);
    softly.assert_eq("response code", &body.code, &200);
    softly.assert_eq("response type", &body.kind.as_deref(), &Some("unknown"));
    softly.assert_true(
        !message.is_empty() && message.chars().all(|c| c.is_ascii_digit()),
        &format!("message must contain only digits, got {message:?}"),
    );
    softly.finish()?;

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_metadata() {
        let check = UserCreateCheck;
        assert_eq!(check.name(), "user-create");
        assert!(!check.description().is_empty());
    }

    #[test]
    fn test_fixture_users_skip_missing_usernames() {
        match fixture_users() {
            TestData::Users(names) => {
                assert_eq!(names.len(), 3);
                assert!(names.contains(&"uniqueUsername".to_string()));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_acknowledgement_accepted() {
        let response = ApiResponse::new(200, r#"{"code":200,"type":"unknown","message":"9223372036854"}"#);
        assert!(expect_acknowledged(&response).is_ok());
    }

    #[test]
    fn test_acknowledgement_reports_every_failure() {
        let response = ApiResponse::new(500, r#"{"code":500,"type":"error","message":"boom"}"#);
        let err = expect_acknowledged(&response).unwrap_err();
        match err {
            CheckError::Assertion(crate::assert::AssertionError::Multiple(failures)) => {
                assert_eq!(failures.len(), 4)
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
