//! Simple token-bucket rate limiter for the embedding and decay topics
//! (spec §4.12: `embeddingRatePerSec`, `decayRatePerMin`).

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

pub struct RateLimiter {
    capacity: f64,
    refill_per_sec: f64,
    state: Mutex<(f64, Instant)>,
}

impl RateLimiter {
    pub fn per_second(rate: u32) -> Self {
        Self::new(rate.max(1) as f64, rate.max(1) as f64)
    }

    pub fn per_minute(rate: u32) -> Self {
        let per_sec = (rate.max(1) as f64) / 60.0;
        Self::new(rate.max(1) as f64, per_sec)
    }

    fn new(capacity: f64, refill_per_sec: f64) -> Self {
        Self { capacity, refill_per_sec, state: Mutex::new((capacity, Instant::now())) }
    }

    /// Blocks until a token is available, then consumes it.
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut guard = self.state.lock().await;
                let (tokens, last) = *guard;
                let elapsed = last.elapsed().as_secs_f64();
                let refreshed = (tokens + elapsed * self.refill_per_sec).min(self.capacity);
                if refreshed >= 1.0 {
                    *guard = (refreshed - 1.0, Instant::now());
                    return;
                }
                *guard = (refreshed, Instant::now());
                Duration::from_secs_f64((1.0 - refreshed) / self.refill_per_sec)
            };
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn allows_burst_up_to_capacity() {
        let limiter = RateLimiter::per_second(3);
        for _ in 0..3 {
            tokio::time::timeout(Duration::from_millis(50), limiter.acquire()).await.unwrap();
        }
    }
}
