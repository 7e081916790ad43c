//! Superhero update check
//!
//! Updates heroes through `PUT superheroes/{id}`. Each scenario waits for the
//! created hero to become readable before touching it, and the change itself
//! is awaited rather than assumed.

use async_trait::async_trait;
use std::time::Instant;
use tracing::info;

use super::scenario::{
    ScenarioRunner, TestData, create_hero, create_visible_hero, expect_no_route,
    expect_server_error,
};
use super::traits::{Check, CheckContext, CheckError, CheckOptions, CheckResult};
use crate::client::{HERO_NOT_FOUND_STATUS, SuperheroError};
use crate::fixtures::{self, INVALID_ID, NON_USED_ID};

pub struct SuperheroUpdateCheck;

#[async_trait]
impl Check for SuperheroUpdateCheck {
    fn name(&self) -> &'static str {
        "superhero-update"
    }

    fn description(&self) -> &'static str {
        "Update heroes and wait for the changes to become visible"
    }

    async fn run(
        &self,
        ctx: &CheckContext,
        opts: &CheckOptions,
    ) -> Result<CheckResult, CheckError> {
        let start = Instant::now();
        let runner = ScenarioRunner::new(ctx, opts, TestData::Superheroes);

        info!("Starting superhero-update check");

        let results = vec![
            runner.run("update hero", update_hero(ctx)).await,
            runner
                .run("update hero and check changes", update_and_check(ctx))
                .await,
            runner
                .run("update hero with unused id", update_missing(ctx, NON_USED_ID))
                .await,
            runner
                .run("update hero with invalid id", update_missing(ctx, INVALID_ID))
                .await,
            runner
                .run("update hero with missing field", update_without_skill(ctx))
                .await,
            runner
                .run("update hero on invalid path", update_on_invalid_path(ctx))
                .await,
        ];

        let result = CheckResult::new(self.name(), results, start.elapsed());
        info!(passed = result.passed, summary = %result.summary(), "Superhero-update check complete");
        let message = result.summary();
        Ok(result.with_message(message))
    }
}

async fn update_hero(ctx: &CheckContext) -> Result<(), CheckError> {
    let created = create_visible_hero(ctx, &fixtures::hero_for_update()).await?;
    ctx.superhero
        .update_hero(&fixtures::wolverine(), created.id)
        .await?
        .expect_status(200)?;
    Ok(())
}

async fn update_and_check(ctx: &CheckContext) -> Result<(), CheckError> {
    let update = fixtures::iron_man();
    let created = create_visible_hero(ctx, &fixtures::hero_with_all_fields()).await?;

    ctx.superhero
        .update_hero(&update, created.id)
        .await?
        .expect_status(200)?;

    let response = ctx
        .superhero
        .wait_for_hero_matching(created.id, "updated name and skill", |hero| {
            hero.full_name == update.full_name && hero.main_skill == update.main_skill
        })
        .await?;

    response
        .expect_status(200)?
        .expect_json_eq("fullName", update.full_name.as_deref().unwrap_or_default())?
        .expect_json_eq("mainSkill", update.main_skill.as_deref().unwrap_or_default())?;
    Ok(())
}

async fn update_missing(ctx: &CheckContext, id: i64) -> Result<(), CheckError> {
    create_hero(ctx, &fixtures::hero_for_update()).await?;

    ctx.superhero
        .update_hero(&fixtures::wolverine(), id)
        .await?
        .expect_status(HERO_NOT_FOUND_STATUS)?
        .compare_with_error(&SuperheroError::not_found(id))?;
    Ok(())
}

async fn update_without_skill(ctx: &CheckContext) -> Result<(), CheckError> {
    let created = create_visible_hero(ctx, &fixtures::hero_for_update()).await?;
    let response = ctx
        .superhero
        .update_hero(&fixtures::hero_without_skill(), created.id)
        .await?;
    expect_server_error(
        response,
        500,
        "Internal Server Error",
        "could not execute statement",
    )?;
    Ok(())
}

async fn update_on_invalid_path(ctx: &CheckContext) -> Result<(), CheckError> {
    let created = create_visible_hero(ctx, &fixtures::hero_for_update()).await?;
    let response = ctx
        .superhero
        .update_hero_with_invalid_path(&fixtures::wolverine(), created.id)
        .await?;
    expect_no_route(response)?;
    Ok(())
}
