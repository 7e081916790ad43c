//! Superhero read check
//!
//! Reads single heroes and the hero list. Freshly created heroes are only
//! read once the service reports them, so every lookup goes through the
//! wait contract.
//!
//! ## Scenarios
//!
//! 1. List all heroes
//! 2. List two created heroes and compare them in order
//! 3. Unused id answers 400 with the NOT_FOUND body
//! 4. Invalid id answers 400 with the NOT_FOUND body
//! 5. Create a hero, wait until it is readable
//! 6. Create a hero without a phone and compare every read field
//! 7. Reading on an unknown route answers 404
//! 8. *Known issue*: a hero's phone does not survive creation

use async_trait::async_trait;
use std::time::Instant;
use tracing::info;

use super::scenario::{
    ScenarioRunner, TestData, create_hero, create_visible_hero, expect_no_route,
};
use super::traits::{Check, CheckContext, CheckError, CheckOptions, CheckResult};
use crate::client::{ClientError, HERO_NOT_FOUND_STATUS, Superhero, SuperheroError};
use crate::fixtures::{self, INVALID_ID, NON_USED_ID};

pub struct SuperheroReadCheck;

#[async_trait]
impl Check for SuperheroReadCheck {
    fn name(&self) -> &'static str {
        "superhero-read"
    }

    fn description(&self) -> &'static str {
        "Read heroes by id and as a list, including unknown ids and routes"
    }

    async fn run(
        &self,
        ctx: &CheckContext,
        opts: &CheckOptions,
    ) -> Result<CheckResult, CheckError> {
        let start = Instant::now();
        let runner = ScenarioRunner::new(ctx, opts, TestData::Superheroes);

        info!("Starting superhero-read check");

        let results = vec![
            runner.run("list all heroes", list_all(ctx)).await,
            runner
                .run("list and compare created heroes", list_and_compare(ctx))
                .await,
            runner
                .run("get hero with unused id", get_missing(ctx, NON_USED_ID))
                .await,
            runner
                .run("get hero with invalid id", get_missing(ctx, INVALID_ID))
                .await,
            runner
                .run("create and get hero", create_and_get(ctx))
                .await,
            runner
                .run(
                    "create and get hero without phone",
                    create_and_read_fields(ctx, fixtures::hero_without_phone()),
                )
                .await,
            runner
                .run("get hero on invalid path", get_on_invalid_path(ctx))
                .await,
            runner
                .run_known_issue(
                    "create and get hero with phone",
                    "phone becomes null after creation",
                    create_and_read_fields(ctx, fixtures::basic_hero()),
                )
                .await,
        ];

        let result = CheckResult::new(self.name(), results, start.elapsed());
        info!(passed = result.passed, summary = %result.summary(), "Superhero-read check complete");
        let message = result.summary();
        Ok(result.with_message(message))
    }
}

async fn list_all(ctx: &CheckContext) -> Result<(), CheckError> {
    ctx.superhero.get_all_heroes().await?.expect_status(200)?;
    Ok(())
}

async fn list_and_compare(ctx: &CheckContext) -> Result<(), CheckError> {
    let iron_man = create_visible_hero(ctx, &fixtures::hero_with_all_fields()).await?;
    let captain_america = create_visible_hero(ctx, &fixtures::basic_hero()).await?;

    // The list may trail the by-id reads
    let outcome = ctx
        .wait
        .wait_until(
            "hero list to show both created heroes",
            || ctx.superhero.get_all_heroes(),
            |response| {
                response.status() == 200
                    && response.json::<Vec<Superhero>>().is_ok_and(|heroes| {
                        [iron_man.id, captain_america.id]
                            .iter()
                            .all(|id| heroes.iter().any(|hero| hero.id == *id))
                    })
            },
        )
        .await
        .map_err(ClientError::from)?;

    let listed = outcome
        .value
        .expect_status(200)?
        .compare_heroes_in_order(&[iron_man, captain_america])?;

    info!(count = listed.len(), "Listed heroes match");
    Ok(())
}

async fn get_missing(ctx: &CheckContext, id: i64) -> Result<(), CheckError> {
    ctx.superhero
        .get_hero(id)
        .await?
        .expect_status(HERO_NOT_FOUND_STATUS)?
        .compare_with_error(&SuperheroError::not_found(id))?;
    Ok(())
}

async fn create_and_get(ctx: &CheckContext) -> Result<(), CheckError> {
    let created = create_hero(ctx, &fixtures::basic_hero()).await?;
    ctx.superhero
        .wait_for_hero(created.id)
        .await?
        .expect_status(200)?;
    Ok(())
}

async fn create_and_read_fields(ctx: &CheckContext, hero: Superhero) -> Result<(), CheckError> {
    let created = create_hero(ctx, &hero).await?;
    let response = ctx.superhero.wait_for_hero(created.id).await?;

    let response = response
        .expect_status(200)?
        .expect_json_eq("birthDate", hero.birth_date.as_deref().unwrap_or_default())?
        .expect_json_eq("city", hero.city.as_deref().unwrap_or_default())?
        .expect_json_eq("fullName", hero.full_name.as_deref().unwrap_or_default())?
        .expect_json_eq(
            "gender",
            &hero.gender.map(|g| g.to_string()).unwrap_or_default(),
        )?
        .expect_json_eq("id", &created.id.to_string())?
        .expect_json_eq("mainSkill", hero.main_skill.as_deref().unwrap_or_default())?;

    match hero.phone.as_deref() {
        Some(phone) => response.expect_json_eq("phone", phone)?,
        None => response.expect_json_null("phone")?,
    };

    Ok(())
}

async fn get_on_invalid_path(ctx: &CheckContext) -> Result<(), CheckError> {
    let created = create_hero(ctx, &fixtures::basic_hero()).await?;
    let response = ctx.superhero.get_hero_with_invalid_path(created.id).await?;
    expect_no_route(response)?;
    Ok(())
}
