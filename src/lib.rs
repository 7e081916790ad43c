//! Apiprobe - API Test Suite for the Superhero and Pet-store Services
//!
//! A Rust-based end-to-end test tool exercising two REST services: a
//! superhero CRUD API and the pet-store user API.
//!
//! ## Architecture
//!
//! - Checks are registered by name and run scenario by scenario
//! - Services are eventually consistent, so reads after a write go through
//!   a [`wait::WaitContract`] that polls until the write is visible
//! - Responses are asserted fluently and fail with typed errors
//!
//! ## Modules
//!
//! - [`client`] - HTTP clients for both services plus response assertions
//! - [`wait`] - Eventual-consistency poller
//! - [`assert`] - Assertion errors and soft assertions
//! - `checks` - Check implementations and registry
//! - `config` - Configuration parsing (services, wait contract, checks)
//! - `fixtures` - Records used as request bodies
//! - `utils` - Bounded concurrent runner

pub mod assert;
pub mod checks;
pub mod client;
pub mod config;
pub mod fixtures;
pub mod utils;
pub mod wait;
