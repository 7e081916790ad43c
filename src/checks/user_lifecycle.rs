//! Pet-store user lifecycle check
//!
//! Creates, reads back, updates and deletes users. Reads after a write wait
//! for the pet-store to reflect it.

use async_trait::async_trait;
use std::time::Instant;
use tracing::{debug, info};

use super::scenario::ScenarioRunner;
use super::traits::{Check, CheckContext, CheckError, CheckOptions, CheckResult};
use super::user_create::{expect_acknowledged, fixture_users};
use crate::assert::{SoftAssertions, expect_eq};
use crate::client::{BasicResponse, User, expect_same_user_ignoring_id};
use crate::fixtures;

pub struct UserLifecycleCheck;

#[async_trait]
impl Check for UserLifecycleCheck {
    fn name(&self) -> &'static str {
        "user-lifecycle"
    }

    fn description(&self) -> &'static str {
        "Create, read back, update and delete pet-store users"
    }

    async fn run(
        &self,
        ctx: &CheckContext,
        opts: &CheckOptions,
    ) -> Result<CheckResult, CheckError> {
        let start = Instant::now();
        let runner = ScenarioRunner::new(ctx, opts, fixture_users());

        info!("Starting user-lifecycle check");

        let results = vec![
            runner
                .run("create user and compare", create_and_compare(ctx))
                .await,
            runner
                .run("create and delete user", create_and_delete(ctx))
                .await,
            runner
                .run("create and update user", create_and_update(ctx))
                .await,
        ];

        let result = CheckResult::new(self.name(), results, start.elapsed());
        info!(passed = result.passed, summary = %result.summary(), "User-lifecycle check complete");
        let message = result.summary();
        Ok(result.with_message(message))
    }
}

fn username(user: &User) -> Result<&str, CheckError> {
    user.username
        .as_deref()
        .ok_or_else(|| CheckError::Config("fixture user has no username".to_string()))
}

/// Create `user` and wait until it reads back unchanged
async fn create_and_read_back(ctx: &CheckContext, user: &User) -> Result<User, CheckError> {
    let name = username(user)?;

    let created = ctx.users.create_user(user).await?;
    expect_acknowledged(&created)?;

    let stored: User = ctx
        .users
        .get_user_by_name(name)
        .await?
        .expect_status(200)?
        .decode()?;
    expect_same_user_ignoring_id(&stored, user)?;

    debug!(username = name, id = stored.id, "User stored");
    Ok(stored)
}

async fn create_and_compare(ctx: &CheckContext) -> Result<(), CheckError> {
    create_and_read_back(ctx, &fixtures::steve_rogers()).await?;
    Ok(())
}

async fn create_and_delete(ctx: &CheckContext) -> Result<(), CheckError> {
    let user = fixtures::default_user();
    let stored = create_and_read_back(ctx, &user).await?;
    let name = username(&stored)?;

    let deleted = ctx.users.delete_user(name).await?.expect_status(200)?;
    let ack: BasicResponse = deleted.decode()?;
    expect_eq("delete response code", &ack.code, &200)?;

    ctx.users
        .wait_until_user_is_deleted(name)
        .await?
        .expect_status(404)?;
    Ok(())
}

async fn create_and_update(ctx: &CheckContext) -> Result<(), CheckError> {
    let original = fixtures::jonathan_crane();
    let update = fixtures::scarecrow();
    let name = username(&original)?;

    create_and_read_back(ctx, &original).await?;

    // The pet-store treats an update of a missing user as a create
    ctx.users.delete_user(name).await?;
    ctx.users
        .update_user(&update, name)
        .await?
        .expect_status(200)?;

    let updated: User = ctx
        .users
        .wait_for_user_matching(name, "the updated names", |user| {
            user.first_name == update.first_name && user.last_name == update.last_name
        })
        .await?
        .expect_status(200)?
        .decode()?;

    let mut softly = SoftAssertions::new();
    softly.assert_eq("first name", &updated.first_name.as_deref(), &Some("Scarecrow"));
    softly.assert_eq("last name", &updated.last_name.as_deref(), &Some("None"));
    softly.finish()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_metadata() {
        let check = UserLifecycleCheck;
        assert_eq!(check.name(), "user-lifecycle");
        assert!(!check.description().is_empty());
    }

    #[test]
    fn test_username_required() {
        assert!(username(&fixtures::invalid_user()).is_err());
        assert_eq!(username(&fixtures::steve_rogers()).unwrap(), "Just created expected user");
    }
}
