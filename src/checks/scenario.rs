//! Scenario runner shared by all checks
//!
//! A scenario is one self-contained test case. The runner clears the
//! service's test data around it, times it, and turns its outcome into a
//! [`ScenarioResult`] so one failing scenario never aborts the check.

use std::future::Future;
use std::time::Instant;
use tracing::{debug, warn};

use crate::assert::AssertionError;
use crate::client::{ApiResponse, Superhero};

use super::traits::{
    CheckContext, CheckError, CheckOptions, OPT_CLEANUP, OPT_INCLUDE_KNOWN_ISSUES, ScenarioResult,
};

/// Test data a check owns on the remote service
#[derive(Debug, Clone)]
pub(crate) enum TestData {
    /// Every hero the superhero service lists
    Superheroes,
    /// The named pet-store users
    Users(Vec<String>),
}

pub(crate) struct ScenarioRunner<'a> {
    ctx: &'a CheckContext,
    data: TestData,
    cleanup: bool,
    include_known_issues: bool,
}

impl<'a> ScenarioRunner<'a> {
    pub(crate) fn new(ctx: &'a CheckContext, opts: &CheckOptions, data: TestData) -> Self {
        Self {
            ctx,
            data,
            cleanup: opts.flag(OPT_CLEANUP, true),
            include_known_issues: opts.flag(OPT_INCLUDE_KNOWN_ISSUES, false),
        }
    }

    /// Run one scenario between two cleanups
    pub(crate) async fn run<F>(&self, name: &str, scenario: F) -> ScenarioResult
    where
        F: Future<Output = Result<(), CheckError>>,
    {
        if let Err(e) = self.clear().await {
            warn!(scenario = name, error = %e, "Cleanup before scenario failed");
            return ScenarioResult::failed(name, format!("cleanup failed: {e}"));
        }

        let start = Instant::now();
        let outcome = scenario.await;
        let elapsed = start.elapsed();

        let result = match outcome {
            Ok(()) => {
                debug!(scenario = name, duration_ms = elapsed.as_millis(), "Scenario passed");
                ScenarioResult::passed(name)
            }
            Err(e) => {
                warn!(scenario = name, error = %e, "Scenario failed");
                ScenarioResult::failed(name, e.to_string())
            }
        };

        let result = match self.clear().await {
            Ok(()) => result,
            Err(e) if result.passed => {
                warn!(scenario = name, error = %e, "Cleanup after scenario failed");
                ScenarioResult::failed(name, format!("cleanup failed: {e}"))
            }
            Err(e) => {
                warn!(scenario = name, error = %e, "Cleanup after failed scenario failed");
                result.with_detail("cleanup_error", e.to_string())
            }
        };

        result.with_detail("duration_ms", elapsed.as_millis() as u64)
    }

    /// Run a scenario that exercises a known defect of the service
    ///
    /// Skipped unless known issues are included.
    pub(crate) async fn run_known_issue<F>(
        &self,
        name: &str,
        issue: &str,
        scenario: F,
    ) -> ScenarioResult
    where
        F: Future<Output = Result<(), CheckError>>,
    {
        if !self.include_known_issues {
            debug!(scenario = name, issue, "Skipping known issue");
            return ScenarioResult::skipped(name, format!("known issue: {issue}"));
        }

        self.run(name, scenario).await.with_detail("known_issue", issue)
    }

    async fn clear(&self) -> Result<(), CheckError> {
        if !self.cleanup {
            return Ok(());
        }

        match &self.data {
            TestData::Superheroes => {
                self.ctx.superhero.clear_all_heroes().await?;
            }
            TestData::Users(usernames) => {
                for username in usernames {
                    // A missing user answers 404 and reads as absent at once
                    let deleted = self.ctx.users.delete_user(username).await?;
                    if !matches!(deleted.status(), 200 | 404) {
                        return Err(CheckError::Failed(format!(
                            "deleting user '{username}' returned {}",
                            deleted.status()
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

/// Create a hero, expect 200 and return the stored record
pub(crate) async fn create_hero(ctx: &CheckContext, hero: &Superhero) -> Result<Superhero, CheckError> {
    let created: Superhero = ctx
        .superhero
        .create_hero(hero)
        .await?
        .expect_status(200)?
        .decode()?;
    Ok(created)
}

/// Create a hero and wait until reads see it
pub(crate) async fn create_visible_hero(
    ctx: &CheckContext,
    hero: &Superhero,
) -> Result<Superhero, CheckError> {
    let created = create_hero(ctx, hero).await?;
    ctx.superhero.wait_for_hero(created.id).await?;
    Ok(created)
}

/// Spring's body for a route the service does not serve
pub(crate) fn expect_no_route(response: ApiResponse) -> Result<ApiResponse, AssertionError> {
    response
        .expect_status(404)?
        .expect_json_eq("error", "Not Found")?
        .expect_json_eq("message", "No message available")
}

/// Spring's error body: status, reason phrase and a message fragment
pub(crate) fn expect_server_error(
    response: ApiResponse,
    status: u16,
    error: &str,
    message_part: &str,
) -> Result<ApiResponse, AssertionError> {
    response
        .expect_status(status)?
        .expect_json_eq("status", &status.to_string())?
        .expect_json_eq("error", error)?
        .expect_json_not_null("message")?
        .expect_json_contains("message", message_part)
}
