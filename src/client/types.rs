//! Service record types
//!
//! Field names follow the services' camelCase JSON. Absent values are sent
//! as JSON null, the same way the services' own clients send them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Superhero gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    M,
    F,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::M => write!(f, "M"),
            Gender::F => write!(f, "F"),
        }
    }
}

/// Superhero record
/// Endpoints: POST/PUT/GET `superheroes/{id}`, GET `superheroes`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Superhero {
    /// ISO date, `YYYY-MM-DD`
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Assigned by the service; 0 on records not yet created
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub main_skill: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Superhero service error body for unknown ids and unknown routes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperheroError {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl SuperheroError {
    /// Body returned for an id with no hero behind it
    pub fn not_found(id: i64) -> Self {
        Self {
            message: Some(format!("Superhero with id '{id}' was not found")),
            code: Some("NOT_FOUND".to_string()),
        }
    }

    /// Body carrying only a message
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            code: None,
        }
    }
}

/// Pet-store user record
/// Endpoints: POST `user`, PUT/GET/DELETE `user/{username}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub user_status: i32,
}

/// Pet-store acknowledgement body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicResponse {
    #[serde(default)]
    pub code: i64,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
