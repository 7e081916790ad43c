//! Fluent response assertions
//!
//! Each check consumes the response and hands it back on success, so checks
//! chain with `?`:
//!
//! ```no_run
//! # use apiprobe::client::ApiResponse;
//! # fn example(response: ApiResponse) -> Result<(), apiprobe::assert::AssertionError> {
//! let message = response
//!     .expect_status(400)?
//!     .expect_json_eq("status", "400")?
//!     .expect_json_eq("error", "Bad Request")?
//!     .required_json("message")?;
//! # Ok(())
//! # }
//! ```

use serde::de::DeserializeOwned;

use super::http::ApiResponse;
use super::types::{Superhero, SuperheroError, User};
use crate::assert::{AssertionError, expect_eq};

impl ApiResponse {
    pub fn expect_status(self, expected: u16) -> Result<Self, AssertionError> {
        if self.status() == expected {
            Ok(self)
        } else {
            Err(AssertionError::status(expected, self.status(), &self.text()))
        }
    }

    /// The value at `path` must render as `expected`
    pub fn expect_json_eq(self, path: &str, expected: &str) -> Result<Self, AssertionError> {
        let actual = self.json_string(path);
        if actual.as_deref() == Some(expected) {
            Ok(self)
        } else {
            Err(AssertionError::JsonValue {
                path: path.to_string(),
                expected: expected.to_string(),
                actual,
            })
        }
    }

    pub fn expect_json_not_null(self, path: &str) -> Result<Self, AssertionError> {
        self.required_json(path)?;
        Ok(self)
    }

    pub fn expect_json_null(self, path: &str) -> Result<Self, AssertionError> {
        match self.json_string(path) {
            None => Ok(self),
            Some(actual) => Err(AssertionError::JsonNotNull {
                path: path.to_string(),
                actual,
            }),
        }
    }

    /// The value at `path` must contain `fragment`
    pub fn expect_json_contains(self, path: &str, fragment: &str) -> Result<Self, AssertionError> {
        let actual = self.json_string(path);
        if actual.as_deref().is_some_and(|v| v.contains(fragment)) {
            Ok(self)
        } else {
            Err(AssertionError::JsonContains {
                path: path.to_string(),
                fragment: fragment.to_string(),
                actual,
            })
        }
    }

    /// Extract the non-null value at `path`
    pub fn required_json(&self, path: &str) -> Result<String, AssertionError> {
        self.json_string(path)
            .ok_or_else(|| AssertionError::JsonMissing {
                path: path.to_string(),
            })
    }

    /// Deserialize the body, reporting failures as assertion errors
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, AssertionError> {
        self.json().map_err(|e| AssertionError::Decode {
            target: std::any::type_name::<T>()
                .rsplit("::")
                .next()
                .unwrap_or("value")
                .to_string(),
            reason: e.to_string(),
        })
    }

    /// Decode a hero and compare it with `expected`, ignoring the
    /// server-assigned id
    pub fn compare_with_hero(self, expected: &Superhero) -> Result<Self, AssertionError> {
        let actual: Superhero = self.decode()?;
        let expected = Superhero {
            id: actual.id,
            ..expected.clone()
        };
        expect_eq("superhero", &actual, &expected)?;
        Ok(self)
    }

    pub fn compare_with_error(self, expected: &SuperheroError) -> Result<Self, AssertionError> {
        let actual: SuperheroError = self.decode()?;
        expect_eq("error body", &actual, expected)?;
        Ok(self)
    }

    /// Decode a hero list and compare it element by element with `expected`
    pub fn compare_heroes_in_order(
        self,
        expected: &[Superhero],
    ) -> Result<Vec<Superhero>, AssertionError> {
        let actual: Vec<Superhero> = self.decode()?;

        for (i, hero) in actual.iter().enumerate() {
            let Some(want) = expected.get(i) else {
                return Err(AssertionError::Mismatch {
                    what: "hero list length".to_string(),
                    expected: expected.len().to_string(),
                    actual: actual.len().to_string(),
                });
            };
            expect_eq(&format!("hero #{i}"), hero, want)?;
        }

        Ok(actual)
    }
}

/// Compare two users, ignoring the server-assigned id
pub fn expect_same_user_ignoring_id(actual: &User, expected: &User) -> Result<(), AssertionError> {
    let actual = User {
        id: 0,
        ..actual.clone()
    };
    let expected = User {
        id: 0,
        ..expected.clone()
    };
    expect_eq("user", &actual, &expected)
}
