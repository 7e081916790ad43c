//! Pet-store user client

use tracing::debug;

use super::http::{ApiClient, ApiResponse, ClientError, ClientResult};
use super::types::User;
use crate::wait::{Condition, WaitContract};

/// User endpoint, relative to the service's `v2/` base path
pub const USER_ENDPOINT: &str = "user";

/// Client for the pet-store user API
#[derive(Debug, Clone)]
pub struct UserClient {
    api: ApiClient,
    wait: WaitContract,
}

impl UserClient {
    pub fn new(api: ApiClient, wait: WaitContract) -> Self {
        Self { api, wait }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    fn user_path(username: &str) -> String {
        format!("{USER_ENDPOINT}/{username}")
    }

    pub async fn create_user(&self, user: &User) -> ClientResult<ApiResponse> {
        self.api.post(USER_ENDPOINT, user).await
    }

    pub async fn update_user(&self, user: &User, username: &str) -> ClientResult<ApiResponse> {
        self.api.put(&Self::user_path(username), user).await
    }

    /// Single read, no waiting
    pub async fn get_user(&self, username: &str) -> ClientResult<ApiResponse> {
        self.api.get(&Self::user_path(username)).await
    }

    /// Wait until the user is readable and return that response
    pub async fn get_user_by_name(&self, username: &str) -> ClientResult<ApiResponse> {
        let outcome = self
            .wait
            .wait_for(&format!("user '{username}'"), Condition::exists(), || {
                self.get_user(username)
            })
            .await
            .map_err(|e| match ClientError::from(e) {
                ClientError::Wait { elapsed, .. } => ClientError::Unavailable(format!(
                    "User '{username}' did not become available within {elapsed:?}"
                )),
                other => other,
            })?;

        debug!(username, attempts = outcome.attempts, "User visible");
        Ok(outcome.value)
    }

    /// Wait until the user reads back and satisfies `predicate`
    pub async fn wait_for_user_matching<P>(
        &self,
        username: &str,
        what: &str,
        predicate: P,
    ) -> ClientResult<ApiResponse>
    where
        P: Fn(&User) -> bool,
    {
        let condition = format!("user '{username}' to show {what}");
        let outcome = self
            .wait
            .wait_until(
                &condition,
                || self.get_user(username),
                |response| {
                    response.status() == 200
                        && response.json::<User>().is_ok_and(|user| predicate(&user))
                },
            )
            .await?;

        Ok(outcome.value)
    }

    /// Delete without waiting for the deletion to become visible
    pub async fn clear_user(&self, username: &str) -> ClientResult<ApiResponse> {
        self.api.delete(&Self::user_path(username)).await
    }

    /// Delete, then wait until reads report the user missing
    ///
    /// Returns the response to the delete request.
    pub async fn delete_user(&self, username: &str) -> ClientResult<ApiResponse> {
        let deleted = self.clear_user(username).await?;
        self.await_absence(username).await?;
        Ok(deleted)
    }

    /// Wait until reads report the user missing, then read once more
    pub async fn wait_until_user_is_deleted(&self, username: &str) -> ClientResult<ApiResponse> {
        self.await_absence(username).await?;
        self.get_user(username).await
    }

    async fn await_absence(&self, username: &str) -> ClientResult<()> {
        let outcome = self
            .wait
            .wait_for(&format!("user '{username}'"), Condition::absent(), || {
                self.get_user(username)
            })
            .await?;

        debug!(username, attempts = outcome.attempts, "User gone");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_path() {
        assert_eq!(UserClient::user_path("steve"), "user/steve");
    }

    #[test]
    fn test_user_url_is_encoded() {
        let api = ApiClient::new("https://petstore.swagger.io/v2/").unwrap();
        let url = api
            .url(&UserClient::user_path("Just created expected user"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://petstore.swagger.io/v2/user/Just%20created%20expected%20user"
        );
    }
}
