use std::{
    fmt::Display,
    future::Future,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use log::{debug, warn};
use tokio_retry::RetryIf;

use crate::constants::trade::{DEFAULT_RETRY_STEP, DEFAULT_RPC_ATTEMPTS};

/// Bounded retry with linear backoff: the wait after attempt `n` is `n * backoff_step`.
///
/// The policy knows nothing about networks; callers pass the operation and a predicate that
/// decides which errors are worth another attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RPC_ATTEMPTS,
            backoff_step: DEFAULT_RETRY_STEP,
        }
    }
}

/// The error that ended a retried operation and how many attempts were made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryFailure<E> {
    pub attempts: usize,
    pub error: E,
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, backoff_step: Duration) -> Self {
        Self {
            max_attempts,
            backoff_step,
        }
    }

    /// Wait before the attempt following attempt `attempt` (1-based).
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        self.backoff_step * attempt as u32
    }

    /// Delays between attempts; one fewer than `max_attempts`.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let policy = *self;
        (1..policy.max_attempts.max(1)).map(move |attempt| policy.delay_for_attempt(attempt))
    }

    /// Runs `action` until it succeeds, fails with an error `is_retryable` rejects, or the
    /// attempt budget is spent.
    pub async fn run<T, E, A, Fut, C>(
        &self,
        label: &str,
        mut action: A,
        mut is_retryable: C,
    ) -> Result<T, RetryFailure<E>>
    where
        E: Display,
        A: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        C: FnMut(&E) -> bool,
    {
        let attempts = AtomicUsize::new(0);
        let max_attempts = self.max_attempts.max(1);

        let result = RetryIf::spawn(
            self.delays(),
            || {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                debug!("{} attempt {}/{}", label, attempt, max_attempts);
                action()
            },
            |err: &E| {
                if !is_retryable(err) {
                    return false;
                }
                let attempt = attempts.load(Ordering::SeqCst);
                if attempt < max_attempts {
                    warn!(
                        "{} attempt {}/{} failed: {}. Retrying in {:?}",
                        label,
                        attempt,
                        max_attempts,
                        err,
                        self.delay_for_attempt(attempt)
                    );
                }
                true
            },
        )
        .await;

        result.map_err(|error| RetryFailure {
            attempts: attempts.load(Ordering::SeqCst),
            error,
        })
    }
}
