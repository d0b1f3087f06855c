// src/core/poller.rs
//! Bounded sequential polling: check, wait, check again, up to a fixed count.

use std::future::Future;
use std::time::Duration;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollPolicy {
    /// `max_attempts` is clamped to at least one check.
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Longest time the loop can spend waiting between checks.
    pub fn max_wait(&self) -> Duration {
        self.interval * self.max_attempts.saturating_sub(1)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(2), 30)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStep<T> {
    Done(T),
    Fail(String),
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    Completed(T),
    Failed(String),
    TimedOut { attempts: u32 },
}

impl<T> PollOutcome<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, PollOutcome::Completed(_))
    }
}

/// Runs `check(attempt)` with attempt numbers starting at 1. The first check
/// is immediate and there is no wait after the last one.
pub async fn poll_until<T, F, Fut>(policy: &PollPolicy, mut check: F) -> PollOutcome<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = PollStep<T>>,
{
    for attempt in 1..=policy.max_attempts {
        match check(attempt).await {
            PollStep::Done(value) => return PollOutcome::Completed(value),
            PollStep::Fail(reason) => return PollOutcome::Failed(reason),
            PollStep::Pending => {
                trace!("Poll attempt {}/{} pending", attempt, policy.max_attempts);
                if attempt < policy.max_attempts {
                    tokio::time::sleep(policy.interval).await;
                }
            }
        }
    }

    PollOutcome::TimedOut {
        attempts: policy.max_attempts,
    }
}
