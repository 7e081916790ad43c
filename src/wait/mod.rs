//! Eventual-consistency waits
//!
//! Bridges the gap between a mutating request and the remote service
//! reflecting it on subsequent reads. A [`WaitContract`] fixes the timeout,
//! the poll interval and the [`DeadlinePolicy`]; the predicate is supplied
//! per call.
//!
//! ```no_run
//! use apiprobe::wait::{Condition, WaitContract};
//!
//! # async fn example(client: apiprobe::client::ApiClient) -> Result<(), Box<dyn std::error::Error>> {
//! let contract = WaitContract::default();
//! let outcome = contract
//!     .wait_for("user 'steve'", Condition::exists(), || client.get("user/steve"))
//!     .await?;
//! println!("visible after {} attempts", outcome.attempts);
//! # Ok(())
//! # }
//! ```

mod condition;
mod contract;
mod poller;

pub use condition::{Condition, HasStatus};
pub use contract::{ContractError, DeadlinePolicy, WaitContract};
pub use poller::{PollOutcome, WaitError};
