//! Mock pet-store user API
//!
//! Serves `v2/user` the way the public pet-store does: writes are
//! acknowledged with `{"code":200,"type":"unknown","message":"<id>"}`,
//! updates of unknown users create them, and reads of a missing user
//! answer 404. Reads lag behind writes by the configured amount.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing::debug;

use crate::lagged::LaggedStore;
use crate::server::MockServer;

/// Ids handed out to users posted without one
const FIRST_GENERATED_ID: i64 = 9_223_372_036_854_700_000;

#[derive(Debug)]
struct PetstoreState {
    users: Mutex<LaggedStore<String, Value>>,
    next_id: AtomicI64,
}

/// In-process pet-store user API
///
/// Clones share the same users.
#[derive(Debug, Clone)]
pub struct MockPetstore {
    state: Arc<PetstoreState>,
}

impl Default for MockPetstore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPetstore {
    pub fn new() -> Self {
        Self::with_lag(Duration::ZERO)
    }

    /// Pet-store whose reads see writes `lag` late
    pub fn with_lag(lag: Duration) -> Self {
        Self {
            state: Arc::new(PetstoreState {
                users: Mutex::new(LaggedStore::new(lag)),
                next_id: AtomicI64::new(FIRST_GENERATED_ID),
            }),
        }
    }

    /// Build the router, mounted under `/v2`
    pub fn router(&self) -> Router {
        let api = Router::new()
            .route("/user", post(create_user))
            .route(
                "/user/{username}",
                get(get_user).put(update_user).delete(delete_user),
            )
            .with_state(self.state.clone());

        Router::new()
            .nest("/v2", api)
            .fallback(|| async { StatusCode::NOT_FOUND })
    }

    /// Serve the API on an ephemeral port
    pub async fn start(&self) -> std::io::Result<MockServer> {
        MockServer::start(self.router()).await
    }

    /// Number of stored users, ignoring read lag
    pub fn user_count(&self) -> usize {
        self.state.users.lock().len()
    }

    /// Whether `username` is stored, ignoring read lag
    pub fn has_user(&self, username: &str) -> bool {
        self.state.users.lock().contains(&username.to_string())
    }
}

fn acknowledge(message: impl ToString) -> Response {
    let body = json!({
        "code": 200,
        "type": "unknown",
        "message": message.to_string(),
    });
    (StatusCode::OK, Json(body)).into_response()
}

/// Store `user` under `username`, assigning an id if it has none
fn store(state: &PetstoreState, username: String, mut user: Value) -> i64 {
    let id = match user.get("id").and_then(Value::as_i64) {
        Some(id) if id != 0 => id,
        _ => state.next_id.fetch_add(1, Ordering::SeqCst),
    };
    user["id"] = json!(id);

    debug!(%username, id, "Stored user");
    state.users.lock().insert(username, user);
    id
}

async fn create_user(State(state): State<Arc<PetstoreState>>, Json(user): Json<Value>) -> Response {
    // A user without a username is acknowledged but cannot be read back
    let id = match user.get("username").and_then(Value::as_str) {
        Some(username) => store(&state, username.to_string(), user.clone()),
        None => state.next_id.fetch_add(1, Ordering::SeqCst),
    };
    acknowledge(id)
}

async fn get_user(State(state): State<Arc<PetstoreState>>, Path(username): Path<String>) -> Response {
    match state.users.lock().get_lagged(&username) {
        Some(user) => Json(user).into_response(),
        None => {
            let body = json!({"code": 1, "type": "error", "message": "User not found"});
            (StatusCode::NOT_FOUND, Json(body)).into_response()
        }
    }
}

async fn update_user(
    State(state): State<Arc<PetstoreState>>,
    Path(username): Path<String>,
    Json(user): Json<Value>,
) -> Response {
    let id = store(&state, username, user);
    acknowledge(id)
}

async fn delete_user(State(state): State<Arc<PetstoreState>>, Path(username): Path<String>) -> Response {
    match state.users.lock().remove(&username) {
        Some(_) => acknowledge(&username),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_keeps_given_id() {
        let petstore = MockPetstore::new();
        let id = store(&petstore.state, "steve".into(), json!({"id": 42, "username": "steve"}));
        assert_eq!(id, 42);
        assert!(petstore.has_user("steve"));
    }

    #[test]
    fn test_store_generates_missing_id() {
        let petstore = MockPetstore::new();
        let first = store(&petstore.state, "a".into(), json!({"id": 0}));
        let second = store(&petstore.state, "b".into(), json!({}));
        assert_eq!(first, FIRST_GENERATED_ID);
        assert_eq!(second, FIRST_GENERATED_ID + 1);
        assert_eq!(petstore.user_count(), 2);
    }
}
