//! Apiprobe Test Kit
//!
//! Test infrastructure for running apiprobe checks without the real
//! services.
//!
//! This crate provides:
//! - In-process axum mocks of the superhero and pet-store APIs
//! - A store whose reads lag behind its writes, to exercise the
//!   eventual-consistency waits
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use apiprobe_testkit::MockSuperheroApi;
//!
//! # async fn example() -> std::io::Result<()> {
//! // Reads see writes 100ms late
//! let api = MockSuperheroApi::new().with_lag(Duration::from_millis(100));
//! let server = api.start().await?;
//!
//! // Point a client at the mock
//! println!("{}", server.base_url());
//! # Ok(())
//! # }
//! ```

pub mod lagged;
pub mod petstore;
pub mod server;
pub mod superhero;

// Re-exports for convenience
pub use lagged::LaggedStore;
pub use petstore::MockPetstore;
pub use server::MockServer;
pub use superhero::MockSuperheroApi;
