//! Superhero service client
//!
//! Thin request builders over [`ApiClient`] plus waits for created and
//! deleted heroes to become visible.

use tracing::{debug, info};

use super::http::{ApiClient, ApiResponse, ClientError, ClientResult};
use super::types::Superhero;
use crate::wait::{Condition, WaitContract};

/// Endpoint for single-hero operations
pub const SUPERHERO_ENDPOINT: &str = "superheroes/";

/// Endpoint listing every hero
pub const ALL_HEROES_ENDPOINT: &str = "superheroes";

/// Route prefix the service does not serve
pub const INVALID_PATH: &str = "wrong/";

/// Status the service answers for an unknown hero id
pub const HERO_NOT_FOUND_STATUS: u16 = 400;

/// Client for the superhero CRUD service
#[derive(Debug, Clone)]
pub struct SuperheroClient {
    api: ApiClient,
    wait: WaitContract,
}

impl SuperheroClient {
    pub fn new(api: ApiClient, wait: WaitContract) -> Self {
        Self { api, wait }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub async fn create_hero(&self, hero: &Superhero) -> ClientResult<ApiResponse> {
        self.api.post(SUPERHERO_ENDPOINT, hero).await
    }

    pub async fn update_hero(&self, hero: &Superhero, id: i64) -> ClientResult<ApiResponse> {
        self.api.put(&format!("{SUPERHERO_ENDPOINT}{id}"), hero).await
    }

    pub async fn get_hero(&self, id: i64) -> ClientResult<ApiResponse> {
        self.api.get(&format!("{SUPERHERO_ENDPOINT}{id}")).await
    }

    pub async fn delete_hero(&self, id: i64) -> ClientResult<ApiResponse> {
        self.api.delete(&format!("{SUPERHERO_ENDPOINT}{id}")).await
    }

    pub async fn get_all_heroes(&self) -> ClientResult<ApiResponse> {
        self.api.get(ALL_HEROES_ENDPOINT).await
    }

    pub async fn create_hero_with_invalid_path(
        &self,
        hero: &Superhero,
    ) -> ClientResult<ApiResponse> {
        self.api.post(INVALID_PATH, hero).await
    }

    pub async fn update_hero_with_invalid_path(
        &self,
        hero: &Superhero,
        id: i64,
    ) -> ClientResult<ApiResponse> {
        self.api.put(&format!("{INVALID_PATH}{id}"), hero).await
    }

    pub async fn get_hero_with_invalid_path(&self, id: i64) -> ClientResult<ApiResponse> {
        self.api.get(&format!("{INVALID_PATH}{id}")).await
    }

    pub async fn get_all_heroes_with_invalid_path(&self) -> ClientResult<ApiResponse> {
        self.api.get(INVALID_PATH).await
    }

    pub async fn delete_hero_with_invalid_path(&self, id: i64) -> ClientResult<ApiResponse> {
        self.api.delete(&format!("{INVALID_PATH}{id}")).await
    }

    /// Wait until a created hero is readable
    pub async fn wait_for_hero(&self, id: i64) -> ClientResult<ApiResponse> {
        let outcome = self
            .wait
            .wait_for(&format!("superhero {id}"), Condition::exists(), || {
                self.get_hero(id)
            })
            .await?;

        debug!(id, attempts = outcome.attempts, "Superhero visible");
        Ok(outcome.value)
    }

    /// Wait until a deleted hero reads as not found, returning that response
    pub async fn wait_until_hero_is_deleted(&self, id: i64) -> ClientResult<ApiResponse> {
        let outcome = self
            .wait
            .wait_for(
                &format!("superhero {id}"),
                Condition::absent_with(HERO_NOT_FOUND_STATUS),
                || self.get_hero(id),
            )
            .await?;

        debug!(id, attempts = outcome.attempts, "Superhero gone");
        Ok(outcome.value)
    }

    /// Wait until the hero reads back and satisfies `predicate`
    pub async fn wait_for_hero_matching<P>(
        &self,
        id: i64,
        what: &str,
        predicate: P,
    ) -> ClientResult<ApiResponse>
    where
        P: Fn(&Superhero) -> bool,
    {
        let condition = format!("superhero {id} to show {what}");
        let outcome = self
            .wait
            .wait_until(
                &condition,
                || self.get_hero(id),
                |response| {
                    response.status() == 200
                        && response.json::<Superhero>().is_ok_and(|hero| predicate(&hero))
                },
            )
            .await?;

        Ok(outcome.value)
    }

    /// Delete every hero the service lists
    pub async fn clear_all_heroes(&self) -> ClientResult<usize> {
        let response = self.get_all_heroes().await?;
        if response.status() != 200 {
            return Err(ClientError::UnexpectedResponse(format!(
                "listing heroes returned {}",
                response.status()
            )));
        }

        let heroes: Vec<Superhero> = response
            .json()
            .map_err(|e| ClientError::UnexpectedResponse(format!("hero list: {e}")))?;

        for hero in &heroes {
            let deleted = self.delete_hero(hero.id).await?;
            if deleted.status() != 200 {
                return Err(ClientError::UnexpectedResponse(format!(
                    "deleting hero {} returned {}",
                    hero.id,
                    deleted.status()
                )));
            }
        }

        if !heroes.is_empty() {
            info!(count = heroes.len(), "Cleared superheroes");
        }

        Ok(heroes.len())
    }
}
