//! Sliding-window limiter for the login endpoint, keyed by client IP.
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct RateLimiter {
    attempts: Arc<RwLock<HashMap<String, Vec<Instant>>>>,
    max_attempts: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_attempts: usize, window_secs: u64) -> Self {
        Self {
            attempts: Arc::new(RwLock::new(HashMap::new())),
            max_attempts,
            window: Duration::from_secs(window_secs),
        }
    }

    /// Records an attempt. When the window is full, returns how long until
    /// the oldest attempt falls out of it.
    pub async fn check(&self, identifier: &str) -> Result<(), Duration> {
        let now = Instant::now();
        let mut attempts = self.attempts.write().await;
        let history = attempts.entry(identifier.to_string()).or_default();

        history.retain(|&at| now.duration_since(at) < self.window);

        if history.len() < self.max_attempts {
            history.push(now);
            return Ok(());
        }
        let oldest = history.first().copied().unwrap_or(now);
        Err(self.window.saturating_sub(now.duration_since(oldest)))
    }

    pub async fn cleanup(&self) {
        let now = Instant::now();
        let mut attempts = self.attempts.write().await;
        attempts.retain(|_, history| {
            history.retain(|&at| now.duration_since(at) < self.window);
            !history.is_empty()
        });
        tracing::debug!("Login limiter cleanup: {} active clients", attempts.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blocks_after_limit() {
        let limiter = RateLimiter::new(3, 60);

        assert!(limiter.check("10.0.0.1").await.is_ok());
        assert!(limiter.check("10.0.0.1").await.is_ok());
        assert!(limiter.check("10.0.0.1").await.is_ok());

        let wait = limiter.check("10.0.0.1").await.unwrap_err();
        assert!(wait <= Duration::from_secs(60));

        assert!(limiter.check("10.0.0.2").await.is_ok());
    }

    #[tokio::test]
    async fn test_cleanup_drops_idle_clients() {
        let limiter = RateLimiter::new(5, 1);

        limiter.check("a").await.unwrap();
        limiter.check("b").await.unwrap();

        tokio::time::sleep(Duration::from_millis(1100)).await;
        limiter.cleanup().await;

        assert!(limiter.attempts.read().await.is_empty());
    }
}
