//! Service clients
//!
//! [`ApiClient`] is the generic JSON-over-HTTP layer; the superhero and
//! pet-store clients build their requests on top of it. Fluent assertions
//! over [`ApiResponse`] live in `response.rs`.

mod http;
mod petstore;
mod response;
mod superhero;
mod types;

pub use http::{ApiClient, ApiResponse, ClientError, ClientResult};
pub use petstore::{USER_ENDPOINT, UserClient};
pub use response::expect_same_user_ignoring_id;
pub use superhero::{
    ALL_HEROES_ENDPOINT, HERO_NOT_FOUND_STATUS, INVALID_PATH, SUPERHERO_ENDPOINT, SuperheroClient,
};
pub use types::*;
