use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Message fragments that mark a failure as rate limiting or overload.
const TRANSIENT_MARKERS: &[&str] = &["429", "Too Many Requests", "503", "Overloaded"];

pub const DEFAULT_RETRIES: u32 = 3;
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(retries: u32, base_delay: Duration) -> Self {
        Self {
            retries,
            base_delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETRIES, DEFAULT_BASE_DELAY)
    }
}

/// Retry budget of a single invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    attempts_remaining: u32,
    next_delay: Duration,
}

impl RetryState {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            attempts_remaining: policy.retries,
            next_delay: policy.base_delay,
        }
    }

    pub fn attempts_remaining(&self) -> u32 {
        self.attempts_remaining
    }

    pub fn next_delay(&self) -> Duration {
        self.next_delay
    }

    /// Spend one retry: returns the delay to wait, then doubles it for next time.
    pub fn consume(&mut self) -> Option<Duration> {
        if self.attempts_remaining == 0 {
            return None;
        }
        self.attempts_remaining -= 1;
        let delay = self.next_delay;
        self.next_delay = self.next_delay.saturating_mul(2);
        Some(delay)
    }
}

/// Whether an error message describes rate limiting or overload.
pub fn is_transient_message(message: &str) -> bool {
    TRANSIENT_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

/// Run `operation`, retrying rate-limit and overload failures with exponential
/// backoff (`base_delay`, `2 * base_delay`, ...; no jitter, no cap).
///
/// Any other failure, or a transient one once retries run out, is returned
/// exactly as the operation produced it.
pub async fn invoke_with_retry<T, E, F, Fut>(operation: F, policy: RetryPolicy) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    invoke_with_retry_using(operation, policy, tokio::time::sleep).await
}

/// [`invoke_with_retry`] with the wait supplied by the caller.
pub async fn invoke_with_retry_using<T, E, F, Fut, S, SFut>(
    mut operation: F,
    policy: RetryPolicy,
    mut sleep: S,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    S: FnMut(Duration) -> SFut,
    SFut: Future<Output = ()>,
{
    let mut state = RetryState::new(policy);
    let mut attempt = 1u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        let message = err.to_string();
        if !is_transient_message(&message) {
            return Err(err);
        }
        let Some(delay) = state.consume() else {
            warn!(attempt, error = %message, "transient failure, retries exhausted");
            return Err(err);
        };

        warn!(
            attempt,
            remaining = state.attempts_remaining(),
            delay_ms = delay.as_millis() as u64,
            error = %message,
            "transient failure, backing off"
        );
        sleep(delay).await;
        attempt += 1;
    }
}
