//! @ai:module:intent Per-client request budget with an acquire-before-call contract
//! @ai:module:layer infrastructure
//! @ai:module:public_api RateLimiter, RateLimiterTrait
//! @ai:module:stateless false

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// @ai:intent Trait for rate limiting functionality
pub trait RateLimiterTrait: Send + Sync {
    /// @ai:intent Wait until one request may be sent, then consume it
    fn acquire(&self) -> impl std::future::Future<Output = ()> + Send;
}

/// @ai:intent Token bucket refilled continuously at requests_per_minute
///
/// Each provider client owns its own instance; nothing is shared process-wide.
pub struct RateLimiter {
    state: Mutex<Bucket>,
    requests_per_minute: u32,
}

struct Bucket {
    tokens: f64,
    last_update: Instant,
}

impl RateLimiter {
    /// @ai:intent Create a limiter starting with a full bucket
    /// @ai:pre requests_per_minute > 0, otherwise the limiter never throttles
    /// @ai:effects pure
    pub fn new(requests_per_minute: u32) -> Self {
        Self {
            state: Mutex::new(Bucket {
                tokens: requests_per_minute as f64,
                last_update: Instant::now(),
            }),
            requests_per_minute,
        }
    }

    fn per_second(&self) -> f64 {
        self.requests_per_minute as f64 / 60.0
    }

    /// @ai:intent Refill tokens based on elapsed time
    /// @ai:effects state:write
    fn refill(&self, bucket: &mut Bucket) {
        let now = Instant::now();
        let elapsed = now.duration_since(bucket.last_update);
        bucket.tokens =
            (bucket.tokens + elapsed.as_secs_f64() * self.per_second()).min(self.requests_per_minute as f64);
        bucket.last_update = now;
    }

    /// @ai:intent Take a token if one is available without waiting
    /// @ai:effects state:write
    pub async fn try_acquire(&self) -> bool {
        if self.requests_per_minute == 0 {
            return true;
        }

        let mut bucket = self.state.lock().await;
        self.refill(&mut bucket);

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

impl RateLimiterTrait for RateLimiter {
    /// @ai:intent Wait until a request is allowed
    /// @ai:effects state:write, time
    async fn acquire(&self) {
        if self.requests_per_minute == 0 {
            return;
        }

        loop {
            let sleep_duration = {
                let mut bucket = self.state.lock().await;
                self.refill(&mut bucket);

                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    return;
                }

                Duration::from_secs_f64((1.0 - bucket.tokens) / self.per_second())
            };

            tracing::debug!("Rate limit reached, sleeping {:?}", sleep_duration);
            tokio::time::sleep(sleep_duration).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_allows_initial_burst() {
        let limiter = RateLimiter::new(60);

        let start = Instant::now();
        for _ in 0..5 {
            limiter.acquire().await;
        }

        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_bucket_empties() {
        let limiter = RateLimiter::new(3);

        assert!(limiter.try_acquire().await);
        assert!(limiter.try_acquire().await);
        assert!(limiter.try_acquire().await);
        assert!(!limiter.try_acquire().await);
    }

    #[tokio::test]
    async fn test_throttles_excess_requests() {
        let limiter = RateLimiter::new(60);

        for _ in 0..60 {
            limiter.acquire().await;
        }

        let start = Instant::now();
        limiter.acquire().await;

        assert!(start.elapsed() >= Duration::from_millis(900));
    }

    #[tokio::test]
    async fn test_separate_limiters_do_not_share_budget() {
        let first = RateLimiter::new(1);
        let second = RateLimiter::new(1);

        assert!(first.try_acquire().await);
        assert!(!first.try_acquire().await);
        assert!(second.try_acquire().await);
    }

    #[tokio::test]
    async fn test_zero_rate_is_unlimited() {
        let limiter = RateLimiter::new(0);
        for _ in 0..100 {
            assert!(limiter.try_acquire().await);
        }
    }
}
