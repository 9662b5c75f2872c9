//! @ai:module:intent Bounded retry with exponential backoff around provider calls
//! @ai:module:layer infrastructure
//! @ai:module:public_api RetryPolicy
//! @ai:module:stateless true

use crate::error::ProviderError;
use std::future::Future;
use std::time::Duration;

/// @ai:intent How many attempts to make and how long to wait between them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// @ai:intent Default backoff: 2s, 4s, 8s, 8s, ...
    /// @ai:effects pure
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(8),
        }
    }

    /// @ai:intent Policy that never sleeps (tests)
    /// @ai:effects pure
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// @ai:intent Delay after the given 1-based failed attempt: min(base * 2^attempt, max)
    /// @ai:effects pure
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.min(16));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// @ai:intent Run `call` until it succeeds, fails permanently or attempts run out
    /// @ai:post returns the last error when every attempt failed
    /// @ai:effects time
    pub async fn run<T, F, Fut>(&self, label: &str, mut call: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let attempts = self.max_retries.max(1);
        let mut attempt = 1;

        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= attempts || !is_transient(&e) => return Err(e),
                Err(e) => {
                    let delay = self.delay_for(attempt);
                    tracing::warn!(
                        "{} failed (attempt {}/{}): {}; retrying in {:?}",
                        label,
                        attempt,
                        attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Configuration problems will not fix themselves between attempts.
fn is_transient(error: &ProviderError) -> bool {
    !matches!(
        error,
        ProviderError::UnknownProvider { .. }
            | ProviderError::MissingApiKey { .. }
            | ProviderError::WrongProvider { .. }
            | ProviderError::Auth { .. }
    )
}
