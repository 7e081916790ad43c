//! Checks against the superhero and pet-store services
//!
//! This module provides the `Check` trait and one check per area of the
//! services' APIs. Each check runs a list of scenarios and reports every
//! scenario's outcome.
//!
//! ## Check Categories
//!
//! - **Superhero**: superhero-create, superhero-read, superhero-update,
//!   superhero-delete, superhero-routing
//! - **Pet-store users**: user-create, user-lifecycle
//!
//! ## Adding New Checks
//!
//! 1. Create a new file in `src/checks/` (e.g., `mycheck.rs`)
//! 2. Implement the `Check` trait, running scenarios through `ScenarioRunner`
//! 3. Register in `registry.rs`
//! 4. Add to `mod.rs` exports

pub mod registry;
mod scenario;
mod superhero_create;
mod superhero_delete;
mod superhero_read;
mod superhero_routing;
mod superhero_update;
mod traits;
mod user_create;
mod user_lifecycle;

pub use registry::{CHECKS, get_check, list_checks};
pub use superhero_create::SuperheroCreateCheck;
pub use superhero_delete::SuperheroDeleteCheck;
pub use superhero_read::SuperheroReadCheck;
pub use superhero_routing::SuperheroRoutingCheck;
pub use superhero_update::SuperheroUpdateCheck;
pub use traits::*;
pub use user_create::UserCreateCheck;
pub use user_lifecycle::UserLifecycleCheck;
