//! Exponential backoff for rate-limited LLM calls.
//!
//! [`RetryPolicy`] is independent of any call site: it takes an operation
//! closure, retries it only while the error is
//! [`LlmError::RateLimited`](crate::llm::LlmError::RateLimited), and sleeps
//! on the tokio clock between attempts (so tests can drive it with a paused
//! clock).

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::config::RetryConfig;
use crate::llm::client::LlmError;

/// Why a retried operation finally gave up.
#[derive(Debug, Clone, Error)]
pub enum RetryError {
    /// Every attempt was rate-limited.
    #[error("gave up after {attempts} rate-limited attempts: {last}")]
    Exhausted { attempts: u32, last: LlmError },

    /// A non-retryable error ended the loop.
    #[error("{error}")]
    Fatal { attempts: u32, error: LlmError },
}

/// Attempt cap and backoff schedule.
///
/// The delay before attempt `n + 1` is `initial_delay * multiplier^(n - 1)`,
/// i.e. 5 s, 10 s, 20 s ... with the defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    multiplier: u32,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration, multiplier: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
            multiplier: multiplier.max(1),
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            config.initial_delay(),
            config.multiplier,
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait after the failed attempt number `attempt` (1-based).
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let factor = self.multiplier.saturating_pow(exponent);
        self.initial_delay.saturating_mul(factor)
    }

    /// Run `op` until it succeeds, fails with a non-rate-limit error, or the
    /// attempt cap is reached.  `op` receives the 1-based attempt number.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, RetryError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_rate_limited() => {
                    if attempt >= self.max_attempts {
                        log::error!("retry: max attempts ({}) exceeded", self.max_attempts);
                        return Err(RetryError::Exhausted {
                            attempts: attempt,
                            last: err,
                        });
                    }
                    let wait = self.delay_after(attempt);
                    log::warn!(
                        "retry: rate limited, retrying in {}s (attempt {}/{})",
                        wait.as_secs(),
                        attempt,
                        self.max_attempts
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(err) => {
                    return Err(RetryError::Fatal {
                        attempts: attempt,
                        error: err,
                    })
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
