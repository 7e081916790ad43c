//! Bounded concurrent task runner
//!
//! Runs async tasks with a concurrency limit, yielding results in input
//! order. Built on `futures::stream::buffered`.
//!
//! ## Example
//!
//! ```ignore
//! use apiprobe::utils::concurrent::run_bounded;
//!
//! let results = run_bounded(checks, 2, |check| async move { check.run(&ctx, &opts).await }).await;
//! ```

use futures::stream::{self, StreamExt};
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Result of a single task
#[derive(Debug, Clone)]
pub struct TaskResult<T> {
    /// Identifier for the task
    pub id: String,
    /// The result value
    pub value: T,
}

/// Trait for items that can identify themselves for logging
pub trait HasId {
    fn id(&self) -> String;
}

impl HasId for String {
    fn id(&self) -> String {
        self.clone()
    }
}

impl HasId for &str {
    fn id(&self) -> String {
        self.to_string()
    }
}

impl<T: HasId + ?Sized> HasId for Arc<T> {
    fn id(&self) -> String {
        (**self).id()
    }
}

/// Wrapper to give any item an ID
#[derive(Debug, Clone)]
pub struct WithId<T> {
    pub id: String,
    pub value: T,
}

impl<T> WithId<T> {
    pub fn new(id: impl Into<String>, value: T) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }
}

impl<T> HasId for WithId<T> {
    fn id(&self) -> String {
        self.id.clone()
    }
}

/// Run `task_fn` over `items` with at most `max_concurrency` in flight
///
/// Results come back in the order of `items`. A limit of 0 is treated as 1.
pub async fn run_bounded<I, T, F, Fut>(
    items: I,
    max_concurrency: usize,
    task_fn: F,
) -> Vec<TaskResult<T>>
where
    I: IntoIterator,
    I::Item: HasId,
    F: Fn(I::Item) -> Fut,
    Fut: Future<Output = T>,
{
    let limit = max_concurrency.max(1);

    stream::iter(items)
        .map(|item| {
            let id = item.id();
            let task = task_fn(item);
            async move {
                debug!(task_id = %id, "Starting task");
                let value = task.await;
                debug!(task_id = %id, "Task finished");
                TaskResult { id, value }
            }
        })
        .buffered(limit)
        .collect()
        .await
}
