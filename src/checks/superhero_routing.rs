//! Superhero routing check
//!
//! Requests against routes the service does not serve must answer 404 with
//! Spring's default error body.

use async_trait::async_trait;
use std::time::Instant;
use tracing::info;

use super::scenario::{ScenarioRunner, TestData, expect_no_route};
use super::traits::{Check, CheckContext, CheckError, CheckOptions, CheckResult};
use crate::fixtures;

pub struct SuperheroRoutingCheck;

#[async_trait]
impl Check for SuperheroRoutingCheck {
    fn name(&self) -> &'static str {
        "superhero-routing"
    }

    fn description(&self) -> &'static str {
        "Verify unknown routes answer 404 with the default error body"
    }

    async fn run(
        &self,
        ctx: &CheckContext,
        opts: &CheckOptions,
    ) -> Result<CheckResult, CheckError> {
        let start = Instant::now();
        let runner = ScenarioRunner::new(ctx, opts, TestData::Superheroes);

        info!("Starting superhero-routing check");

        let results = vec![
            runner
                .run("get all heroes on invalid path", list_on_invalid_path(ctx))
                .await,
            runner
                .run("create hero on invalid path", create_on_invalid_path(ctx))
                .await,
            runner
                .run(
                    "create hero on invalid path and check body",
                    create_on_invalid_path_and_compare(ctx),
                )
                .await,
        ];

        let result = CheckResult::new(self.name(), results, start.elapsed());
        info!(passed = result.passed, summary = %result.summary(), "Superhero-routing check complete");
        let message = result.summary();
        Ok(result.with_message(message))
    }
}

async fn list_on_invalid_path(ctx: &CheckContext) -> Result<(), CheckError> {
    let response = ctx.superhero.get_all_heroes_with_invalid_path().await?;
    expect_no_route(response)?;
    Ok(())
}

async fn create_on_invalid_path(ctx: &CheckContext) -> Result<(), CheckError> {
    ctx.superhero
        .create_hero_with_invalid_path(&fixtures::basic_hero())
        .await?
        .expect_status(404)?;
    Ok(())
}

async fn create_on_invalid_path_and_compare(ctx: &CheckContext) -> Result<(), CheckError> {
    ctx.superhero
        .create_hero_with_invalid_path(&fixtures::basic_hero())
        .await?
        .expect_status(404)?
        .compare_with_error(&fixtures::no_message_available())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_metadata() {
        let check = SuperheroRoutingCheck;
        assert_eq!(check.name(), "superhero-routing");
        assert!(!check.description().is_empty());
    }
}
