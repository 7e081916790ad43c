//! Poll loop
//!
//! Attempts run one after another on the calling task. Between attempts the
//! task sleeps on the tokio timer for `min(interval, time left)`, so other
//! tasks keep running. A fault from the read aborts the wait immediately;
//! only non-matching results are retried.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, warn};

use super::condition::{Condition, HasStatus};
use super::contract::{DeadlinePolicy, WaitContract};

/// First passing result of a wait
#[derive(Debug, Clone)]
pub struct PollOutcome<R> {
    /// The result the predicate accepted
    pub value: R,
    /// Number of reads issued, including the passing one
    pub attempts: u32,
    /// Time from the first attempt until the passing result arrived
    pub elapsed: Duration,
}

/// Why a wait ended without a passing result
#[derive(Debug, Error)]
pub enum WaitError<R, E: std::fmt::Display> {
    /// The deadline passed without the predicate holding
    #[error("Timed out after {elapsed:?} waiting for {condition} ({attempts} attempts)")]
    Timeout {
        condition: String,
        elapsed: Duration,
        attempts: u32,
        /// Last non-matching result
        ///
        /// Always `Some` when returned by [`WaitContract::wait_until`], which
        /// completes at least one read before it can time out.
        last: Option<R>,
    },

    /// The read itself failed
    #[error("{0}")]
    Operation(E),
}

impl<R, E: std::fmt::Display> WaitError<R, E> {
    pub fn is_timeout(&self) -> bool {
        matches!(self, WaitError::Timeout { .. })
    }

    /// Last observed result of a timed-out wait
    pub fn into_last(self) -> Option<R> {
        match self {
            WaitError::Timeout { last, .. } => last,
            WaitError::Operation(_) => None,
        }
    }
}

impl WaitContract {
    /// Repeat `read` until `predicate` accepts its result or the contract's
    /// timeout elapses
    ///
    /// An attempt already in flight when the deadline passes is allowed to
    /// finish and its result is still evaluated. With
    /// [`DeadlinePolicy::Strict`] no attempt starts at or after the deadline;
    /// with [`DeadlinePolicy::FinalAttempt`] exactly one more attempt is made
    /// at the deadline.
    pub async fn wait_until<R, E, F, Fut, P>(
        &self,
        condition: &str,
        mut read: F,
        predicate: P,
    ) -> Result<PollOutcome<R>, WaitError<R, E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R, E>>,
        P: Fn(&R) -> bool,
        E: std::fmt::Display,
    {
        let start = Instant::now();
        let deadline = start + self.timeout();
        let mut attempts = 0u32;
        let mut last;

        loop {
            attempts += 1;
            let value = read().await.map_err(WaitError::Operation)?;

            if predicate(&value) {
                let elapsed = start.elapsed();
                debug!(condition, attempts, elapsed_ms = elapsed.as_millis(), "Condition met");
                return Ok(PollOutcome {
                    value,
                    attempts,
                    elapsed,
                });
            }
            last = Some(value);

            let now = Instant::now();
            debug!(
                condition,
                attempt = attempts,
                elapsed_ms = (now - start).as_millis(),
                "Condition not met yet"
            );
            if now >= deadline {
                break;
            }

            sleep_until((now + self.interval()).min(deadline)).await;
            if Instant::now() >= deadline {
                break;
            }
        }

        if self.policy() == DeadlinePolicy::FinalAttempt {
            attempts += 1;
            let value = read().await.map_err(WaitError::Operation)?;

            if predicate(&value) {
                let elapsed = start.elapsed();
                debug!(
                    condition,
                    attempts,
                    elapsed_ms = elapsed.as_millis(),
                    "Condition met on final attempt"
                );
                return Ok(PollOutcome {
                    value,
                    attempts,
                    elapsed,
                });
            }
            last = Some(value);
        }

        let elapsed = start.elapsed();
        warn!(
            condition,
            attempts,
            elapsed_ms = elapsed.as_millis(),
            policy = %self.policy(),
            "Timed out waiting for condition"
        );

        Err(WaitError::Timeout {
            condition: condition.to_string(),
            elapsed,
            attempts,
            last,
        })
    }

    /// Wait until a response's status satisfies `condition`
    pub async fn wait_for<R, E, F, Fut>(
        &self,
        subject: &str,
        condition: Condition,
        read: F,
    ) -> Result<PollOutcome<R>, WaitError<R, E>>
    where
        R: HasStatus,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: std::fmt::Display,
    {
        let description = format!("{subject} to be {condition}");
        self.wait_until(&description, read, |r| condition.matches(r)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn contract(timeout_ms: u64, interval_ms: u64) -> WaitContract {
        WaitContract::new(
            Duration::from_millis(timeout_ms),
            Duration::from_millis(interval_ms),
        )
        .unwrap()
    }

    #[derive(Debug)]
    struct Status(u16);

    impl HasStatus for Status {
        fn status(&self) -> u16 {
            self.0
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_early_when_predicate_holds() {
        // interval 500ms, timeout 15s, predicate true on attempt 3
        let calls = AtomicU32::new(0);
        let outcome = contract(15_000, 500)
            .wait_until(
                "third attempt",
                || {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    async move { Ok::<_, String>(n) }
                },
                |n| *n == 3,
            )
            .await
            .unwrap();

        assert_eq!(outcome.value, 3);
        assert_eq!(outcome.attempts, 3);
        assert!(outcome.elapsed >= Duration::from_millis(1000));
        assert!(outcome.elapsed < Duration::from_millis(1500));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_when_predicate_never_holds() {
        let calls = AtomicU32::new(0);
        let err = contract(15_000, 500)
            .wait_until(
                "never",
                || {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    async move { Ok::<_, String>(n) }
                },
                |_| false,
            )
            .await
            .unwrap_err();

        match err {
            WaitError::Timeout {
                elapsed,
                attempts,
                last,
                ..
            } => {
                assert!(elapsed >= Duration::from_secs(15));
                // attempts at 0s, 0.5s, ..., 14.5s; none at the deadline
                assert_eq!(attempts, 30);
                assert_eq!(last, Some(30));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 30);
    }

    #[tokio::test(start_paused = true)]
    async fn test_final_attempt_policy_reads_once_more() {
        let calls = AtomicU32::new(0);
        let err = contract(15_000, 500)
            .with_policy(DeadlinePolicy::FinalAttempt)
            .wait_until(
                "never",
                || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok::<_, String>(()) }
                },
                |_| false,
            )
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(calls.load(Ordering::SeqCst), 31);
    }

    #[tokio::test(start_paused = true)]
    async fn test_final_attempt_success_counts() {
        // timeout 1s, interval 500ms: strict reads at 0s and 0.5s only
        let calls = AtomicU32::new(0);
        let read = || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Ok::<_, String>(n) }
        };

        let outcome = contract(1_000, 500)
            .with_policy(DeadlinePolicy::FinalAttempt)
            .wait_until("third read", read, |n| *n == 3)
            .await
            .unwrap();
        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.elapsed, Duration::from_secs(1));

        calls.store(0, Ordering::SeqCst);
        let err = contract(1_000, 500)
            .wait_until("third read", read, |n| *n == 3)
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_success() {
        let outcome = contract(15_000, 500)
            .wait_until("ready", || async { Ok::<_, String>("ok") }, |_| true)
            .await
            .unwrap();

        assert_eq!(outcome.attempts, 1);
        assert_eq!(outcome.elapsed, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fault_aborts_without_retry() {
        let calls = AtomicU32::new(0);
        let err = contract(15_000, 500)
            .wait_until(
                "faulty",
                || {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    async move {
                        if n == 2 {
                            Err("connection reset".to_string())
                        } else {
                            Ok(n)
                        }
                    }
                },
                |_| false,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, WaitError::Operation(ref e) if e == "connection reset"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_attempt_crossing_deadline_is_evaluated() {
        // each read takes 400ms; the second read starts at 0.7s and ends at 1.1s
        let calls = AtomicU32::new(0);
        let outcome = contract(1_000, 300)
            .wait_until(
                "slow read",
                || {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    async move {
                        tokio::time::sleep(Duration::from_millis(400)).await;
                        Ok::<_, String>(n)
                    }
                },
                |n| *n == 2,
            )
            .await
            .unwrap();

        assert_eq!(outcome.attempts, 2);
        assert!(outcome.elapsed > Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_for_absence() {
        let calls = AtomicU32::new(0);
        let outcome = contract(5_000, 250)
            .wait_for("user 'steve'", Condition::absent(), || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { Ok::<_, String>(Status(if n < 4 { 200 } else { 404 })) }
            })
            .await
            .unwrap();

        assert_eq!(outcome.value.0, 404);
        assert_eq!(outcome.attempts, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_message_names_condition() {
        let err = contract(1_000, 250)
            .wait_for("hero 42", Condition::exists(), || async {
                Ok::<_, String>(Status(400))
            })
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("hero 42 to be present (HTTP 200)"), "{message}");
        assert!(message.contains("1s"), "{message}");
        assert_eq!(err.into_last().map(|s| s.0), Some(400));
    }
}
