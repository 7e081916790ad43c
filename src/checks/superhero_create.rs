//! Superhero create check
//!
//! Creates heroes through `POST superheroes/` and inspects the response
//! body, including the service's validation errors.
//!
//! ## Scenarios
//!
//! 1. Create a hero
//! 2. Create a hero without a phone and compare the echoed body
//! 3. Invalid birth date is rejected with 400 `JSON parse error`
//! 4. Missing main skill is rejected with 500 `could not execute statement`
//! 5. *Known issue*: the echoed body of a hero with a phone drops the phone
//!
//! ## Options
//!
//! - `cleanup`: clear all heroes around each scenario (default: true)
//! - `include_known_issues`: run scenario 5 (default: false)

use async_trait::async_trait;
use std::time::Instant;
use tracing::info;

use super::scenario::{ScenarioRunner, TestData, create_hero, expect_server_error};
use super::traits::{Check, CheckContext, CheckError, CheckOptions, CheckResult};
use crate::fixtures;

pub struct SuperheroCreateCheck;

#[async_trait]
impl Check for SuperheroCreateCheck {
    fn name(&self) -> &'static str {
        "superhero-create"
    }

    fn description(&self) -> &'static str {
        "Create heroes and verify echoed bodies and validation errors"
    }

    async fn run(
        &self,
        ctx: &CheckContext,
        opts: &CheckOptions,
    ) -> Result<CheckResult, CheckError> {
        let start = Instant::now();
        let runner = ScenarioRunner::new(ctx, opts, TestData::Superheroes);

        info!("Starting superhero-create check");

        let results = vec![
            runner.run("create hero", create_basic_hero(ctx)).await,
            runner
                .run("create hero without phone", create_without_phone(ctx))
                .await,
            runner
                .run("reject invalid birth date", reject_invalid_date(ctx))
                .await,
            runner
                .run("reject missing main skill", reject_missing_skill(ctx))
                .await,
            runner
                .run_known_issue(
                    "create hero and compare body",
                    "phone becomes null after creation",
                    create_and_compare(ctx),
                )
                .await,
        ];

        let result = CheckResult::new(self.name(), results, start.elapsed());
        info!(passed = result.passed, summary = %result.summary(), "Superhero-create check complete");
        let message = result.summary();
        Ok(result.with_message(message))
    }
}

async fn create_basic_hero(ctx: &CheckContext) -> Result<(), CheckError> {
    create_hero(ctx, &fixtures::basic_hero()).await?;
    Ok(())
}

async fn create_without_phone(ctx: &CheckContext) -> Result<(), CheckError> {
    let hero = fixtures::hero_without_phone();
    ctx.superhero
        .create_hero(&hero)
        .await?
        .expect_status(200)?
        .compare_with_hero(&hero)?;
    Ok(())
}

async fn reject_invalid_date(ctx: &CheckContext) -> Result<(), CheckError> {
    let response = ctx
        .superhero
        .create_hero(&fixtures::hero_with_invalid_date())
        .await?;
    expect_server_error(response, 400, "Bad Request", "JSON parse error")?;
    Ok(())
}

async fn reject_missing_skill(ctx: &CheckContext) -> Result<(), CheckError> {
    let response = ctx
        .superhero
        .create_hero(&fixtures::hero_without_skill())
        .await?;
    expect_server_error(
        response,
        500,
        "Internal Server Error",
        "could not execute statement",
    )?;
    Ok(())
}

async fn create_and_compare(ctx: &CheckContext) -> Result<(), CheckError> {
    let hero = fixtures::basic_hero();
    ctx.superhero
        .create_hero(&hero)
        .await?
        .expect_status(200)?
        .compare_with_hero(&hero)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::OPT_INCLUDE_KNOWN_ISSUES;

    #[test]
    fn test_check_metadata() {
        let check = SuperheroCreateCheck;
        assert_eq!(check.name(), "superhero-create");
        assert!(!check.description().is_empty());
    }

    #[test]
    fn test_known_issues_off_by_default() {
        let opts = SuperheroCreateCheck.default_options();
        assert!(!opts.flag(OPT_INCLUDE_KNOWN_ISSUES, true));
    }
}
