//! Configuration parsing
//!
//! Handles parsing of the suite configuration file and check options.
//!
//! ## Configuration Format
//!
//! ```yaml
//! services:
//!   superhero:
//!     base_url: https://superhero.qa-test.csssr.com/
//!   petstore:
//!     base_url: https://petstore.swagger.io/
//!     base_path: v2/
//!     request_timeout: 30s
//!
//! wait:
//!   timeout: 15s
//!   interval: 500ms
//!   deadline: strict    # or final-attempt
//!
//! checks:
//!   superhero-create:
//!     enabled: true
//!     cleanup: true
//!
//!   user-lifecycle:
//!     include_known_issues: false
//! ```

mod suite;

pub use suite::{
    CheckConfig, Config, ConfigError, DEFAULT_PETSTORE_BASE_PATH, DEFAULT_PETSTORE_URL,
    DEFAULT_SUPERHERO_URL, ServiceConfig, ServicesConfig, WaitConfig,
};
