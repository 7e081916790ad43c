//! Mock superhero service
//!
//! Mirrors the behaviour of the real service that the checks rely on:
//! - unknown ids answer 400 with a `NOT_FOUND` body
//! - unknown routes answer 404 with Spring's default error body
//! - an unparseable birth date answers 400 `JSON parse error`
//! - a missing main skill answers 500 `could not execute statement`
//! - deletes answer 200 whether or not the hero exists
//!
//! Reads by id lag behind writes by the configured amount.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::lagged::LaggedStore;
use crate::server::MockServer;

/// First id handed out; ids below stay unused
const FIRST_ID: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Hero {
    #[serde(default)]
    birth_date: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default)]
    id: i64,
    #[serde(default)]
    main_skill: Option<String>,
    #[serde(default)]
    phone: Option<String>,
}

#[derive(Debug)]
struct SuperheroState {
    heroes: Mutex<LaggedStore<i64, Hero>>,
    next_id: AtomicI64,
    drop_phone: bool,
}

impl SuperheroState {
    fn new(lag: Duration, drop_phone: bool) -> Self {
        Self {
            heroes: Mutex::new(LaggedStore::new(lag)),
            next_id: AtomicI64::new(FIRST_ID),
            drop_phone,
        }
    }
}

/// In-process superhero API
///
/// Clones share the same heroes.
#[derive(Debug, Clone)]
pub struct MockSuperheroApi {
    lag: Duration,
    drop_phone: bool,
    state: Arc<SuperheroState>,
}

impl Default for MockSuperheroApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSuperheroApi {
    pub fn new() -> Self {
        Self {
            lag: Duration::ZERO,
            drop_phone: false,
            state: Arc::new(SuperheroState::new(Duration::ZERO, false)),
        }
    }

    /// Delay before reads by id see a write
    pub fn with_lag(mut self, lag: Duration) -> Self {
        self.lag = lag;
        self.reset()
    }

    /// Answer creates with the phone set to null, like the real service
    pub fn with_phone_dropped(mut self) -> Self {
        self.drop_phone = true;
        self.reset()
    }

    fn reset(mut self) -> Self {
        self.state = Arc::new(SuperheroState::new(self.lag, self.drop_phone));
        self
    }

    /// Build the router
    pub fn router(&self) -> Router {
        Router::new()
            .route("/superheroes", get(list_heroes).post(create_hero))
            .route("/superheroes/", post(create_hero))
            .route(
                "/superheroes/{id}",
                get(get_hero).put(update_hero).delete(delete_hero),
            )
            .fallback(no_route)
            .with_state(self.state.clone())
    }

    /// Serve the API on an ephemeral port
    pub async fn start(&self) -> std::io::Result<MockServer> {
        MockServer::start(self.router()).await
    }

    /// Number of stored heroes, ignoring read lag
    pub fn hero_count(&self) -> usize {
        self.state.heroes.lock().len()
    }
}

fn timestamp() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Spring Boot's default error body
fn spring_error(status: StatusCode, message: &str, path: &str) -> Response {
    let body = json!({
        "timestamp": timestamp(),
        "status": status.as_u16(),
        "error": status.canonical_reason().unwrap_or_default(),
        "message": message,
        "path": path,
    });
    (status, Json(body)).into_response()
}

fn not_found(id: &str) -> Response {
    let body = json!({
        "message": format!("Superhero with id '{id}' was not found"),
        "code": "NOT_FOUND",
    });
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

fn is_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return false;
    }
    let number = |range: std::ops::Range<usize>| value.get(range).and_then(|s| s.parse::<u32>().ok());
    match (number(0..4), number(5..7), number(8..10)) {
        (Some(_), Some(month), Some(day)) => (1..=12).contains(&month) && (1..=31).contains(&day),
        _ => false,
    }
}

/// Parse and validate a hero body the way the service does
fn parse_hero(body: &[u8], path: &str) -> Result<Hero, Response> {
    let hero: Hero = serde_json::from_slice(body).map_err(|e| {
        spring_error(
            StatusCode::BAD_REQUEST,
            &format!("JSON parse error: {e}"),
            path,
        )
    })?;

    if let Some(date) = hero.birth_date.as_deref().filter(|d| !is_iso_date(d)) {
        return Err(spring_error(
            StatusCode::BAD_REQUEST,
            &format!(
                "JSON parse error: Cannot deserialize value of type `java.time.LocalDate` from String \"{date}\""
            ),
            path,
        ));
    }

    if hero.main_skill.is_none() {
        return Err(spring_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "could not execute statement; SQL [n/a]; constraint [main_skill]",
            path,
        ));
    }

    Ok(hero)
}

fn parse_id(id: &str) -> Option<i64> {
    id.parse().ok()
}

async fn list_heroes(State(state): State<Arc<SuperheroState>>) -> Json<Vec<Hero>> {
    Json(state.heroes.lock().values().cloned().collect())
}

async fn create_hero(
    State(state): State<Arc<SuperheroState>>,
    uri: Uri,
    body: Bytes,
) -> Response {
    let mut hero = match parse_hero(&body, uri.path()) {
        Ok(hero) => hero,
        Err(rejection) => return rejection,
    };

    hero.id = state.next_id.fetch_add(1, Ordering::SeqCst);
    if state.drop_phone {
        hero.phone = None;
    }

    debug!(id = hero.id, "Created hero");
    state.heroes.lock().insert(hero.id, hero.clone());
    Json(hero).into_response()
}

async fn get_hero(State(state): State<Arc<SuperheroState>>, Path(id): Path<String>) -> Response {
    let hero = parse_id(&id).and_then(|key| state.heroes.lock().get_lagged(&key));
    match hero {
        Some(hero) => Json(hero).into_response(),
        None => not_found(&id),
    }
}

async fn update_hero(
    State(state): State<Arc<SuperheroState>>,
    Path(id): Path<String>,
    uri: Uri,
    body: Bytes,
) -> Response {
    let Some(key) = parse_id(&id).filter(|key| state.heroes.lock().contains(key)) else {
        return not_found(&id);
    };

    let mut hero = match parse_hero(&body, uri.path()) {
        Ok(hero) => hero,
        Err(rejection) => return rejection,
    };

    hero.id = key;
    debug!(id = key, "Updated hero");
    state.heroes.lock().insert(key, hero.clone());
    Json(hero).into_response()
}

async fn delete_hero(State(state): State<Arc<SuperheroState>>, Path(id): Path<String>) -> StatusCode {
    if let Some(key) = parse_id(&id) {
        state.heroes.lock().remove(&key);
    }
    StatusCode::OK
}

async fn no_route(uri: Uri) -> Response {
    spring_error(StatusCode::NOT_FOUND, "No message available", uri.path())
}
