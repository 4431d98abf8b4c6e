//! One logical PhoneID call per phone number, with retry and backoff.
//!
//! Each call runs a small bounded state machine:
//!
//! ```text
//! Attempt(0) -> Backoff(0) -> Attempt(1) -> ... -> Done | Exhausted
//! ```
//!
//! Every attempt, retries included, first passes through the shared
//! [`RateLimiter`]. 429, 5xx and transport errors are retryable; anything
//! else is terminal immediately. Before retry `i` (0-based) the executor
//! sleeps `backoff_base * 2^i`, without jitter.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::rate_limiter::RateLimiter;
use crate::request::build_request;
use crate::transport::Transport;
use crate::types::{Outcome, RequestConfig};

/// Whether an HTTP status should be retried.
pub fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..=599).contains(&status)
}

/// Delay before retry `retry_index` (0 for the first retry).
///
/// Saturates at `Duration::MAX` instead of overflowing.
pub fn backoff_delay(base: Duration, retry_index: u32) -> Duration {
    if base.is_zero() {
        return Duration::ZERO;
    }
    2u32.checked_pow(retry_index)
        .and_then(|factor| base.checked_mul(factor))
        .unwrap_or(Duration::MAX)
}

/// What happens after an attempt has produced its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextStep {
    /// Sleep `delay`, then run attempt `retry_index + 1`
    Backoff { retry_index: u32, delay: Duration },

    /// The attempt's result is final (success or non-retryable status)
    Done,

    /// The attempt was retryable but no retries remain
    Exhausted,
}

/// Retry budget and backoff schedule for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_base: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_base: Duration) -> Self {
        Self {
            max_retries,
            backoff_base,
        }
    }

    pub fn from_config(config: &RequestConfig) -> Self {
        Self::new(config.max_retries, config.backoff_base)
    }

    /// Transition out of attempt `attempt` (0-based).
    pub fn next_step(&self, attempt: u32, retryable: bool) -> NextStep {
        if !retryable {
            NextStep::Done
        } else if attempt < self.max_retries {
            NextStep::Backoff {
                retry_index: attempt,
                delay: backoff_delay(self.backoff_base, attempt),
            }
        } else {
            NextStep::Exhausted
        }
    }

    /// Upper bound on attempts per phone number.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

/// Performs the verification call for a single phone number.
///
/// Cheap to clone; all workers of a batch share the transport, the rate
/// limiter and the configuration.
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    limiter: Arc<RateLimiter>,
    config: Arc<RequestConfig>,
    policy: RetryPolicy,
}

impl RequestExecutor {
    pub fn new(
        transport: Arc<dyn Transport>,
        limiter: Arc<RateLimiter>,
        config: Arc<RequestConfig>,
    ) -> Self {
        let policy = RetryPolicy::from_config(&config);
        Self {
            transport,
            limiter,
            config,
            policy,
        }
    }

    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Run the call for `phone` to completion.
    ///
    /// Never fails: transport errors that outlive the retry budget become an
    /// outcome with status -1, HTTP errors keep their status code.
    pub async fn execute(&self, phone: &str) -> Outcome {
        let request = build_request(&self.config, phone);
        let mut attempt: u32 = 0;

        loop {
            self.limiter.acquire().await;
            tracing::debug!(phone, attempt, url = %request.url, "sending PhoneID request");

            let (outcome, retryable) = match self.transport.send(&request).await {
                Ok(response) => {
                    let retryable = is_retryable_status(response.status);
                    (
                        Outcome::from_response(phone, response.status, &response.body),
                        retryable,
                    )
                }
                Err(err) => {
                    tracing::debug!(phone, attempt, error = %err, "transport error");
                    (Outcome::failure(phone, &err), true)
                }
            };

            match self.policy.next_step(attempt, retryable) {
                NextStep::Done => return outcome,
                NextStep::Exhausted => {
                    tracing::warn!(
                        phone,
                        attempts = attempt + 1,
                        status = outcome.status_code(),
                        "retries exhausted"
                    );
                    return outcome;
                }
                NextStep::Backoff { retry_index, delay } => {
                    tracing::warn!(
                        phone,
                        attempt,
                        status = outcome.status_code(),
                        backoff_ms = delay.as_millis() as u64,
                        "retryable failure; backing off"
                    );
                    sleep(delay).await;
                    attempt = retry_index + 1;
                }
            }
        }
    }
}
