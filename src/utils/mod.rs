//! Utility modules for apiprobe
//!
//! Common utilities used by the check runner.

pub mod concurrent;

pub use concurrent::{HasId, TaskResult, WithId, run_bounded};
