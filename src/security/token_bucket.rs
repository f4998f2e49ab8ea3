//! Continuous-refill token bucket.

use tokio::time::Instant;

/// Admission state for one client.
///
/// Tokens refill continuously at `refill_rate` per second up to `capacity`.
/// The token count never leaves `[0, capacity]`.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    capacity: f64,
    refill_rate: f64,
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    /// A full bucket.
    pub fn new(capacity: f64, refill_rate: f64) -> Self {
        Self::new_at(capacity, refill_rate, Instant::now())
    }

    pub fn new_at(capacity: f64, refill_rate: f64, now: Instant) -> Self {
        let capacity = capacity.max(0.0);
        Self {
            capacity,
            refill_rate: refill_rate.max(0.0),
            tokens: capacity,
            last_update: now,
        }
    }

    /// Take one token if available.
    pub fn allow(&mut self) -> bool {
        self.allow_at(Instant::now())
    }

    pub fn allow_at(&mut self, now: Instant) -> bool {
        self.refill(now);

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Current token count, without refilling.
    pub fn tokens(&self) -> f64 {
        self.tokens
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    fn refill(&mut self, now: Instant) {
        // Instant is monotonic but a caller may hand us a stale `now`.
        let elapsed = now.saturating_duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.capacity);
        if now > self.last_update {
            self.last_update = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_burst_admitted() {
        let t0 = Instant::now();
        let mut bucket = TokenBucket::new_at(4.0, 2.0, t0);

        for i in 0..4 {
            assert!(bucket.allow_at(t0), "request {} within burst should pass", i);
        }
        assert!(!bucket.allow_at(t0));
    }

    #[test]
    fn test_refill_is_continuous() {
        let t0 = Instant::now();
        let mut bucket = TokenBucket::new_at(1.0, 2.0, t0);
        assert!(bucket.allow_at(t0));
        assert!(!bucket.allow_at(t0 + Duration::from_millis(400)));
        // 0.8 tokens banked at 400ms, a full token again by 600ms
        assert!(bucket.allow_at(t0 + Duration::from_millis(600)));
    }

    #[test]
    fn test_tokens_capped_at_capacity() {
        let t0 = Instant::now();
        let mut bucket = TokenBucket::new_at(3.0, 100.0, t0);
        assert!(bucket.allow_at(t0 + Duration::from_secs(3600)));
        assert!(bucket.tokens() <= bucket.capacity());
        assert!((bucket.tokens() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejection_does_not_go_negative() {
        let t0 = Instant::now();
        let mut bucket = TokenBucket::new_at(1.0, 0.0, t0);
        assert!(bucket.allow_at(t0));
        for _ in 0..10 {
            assert!(!bucket.allow_at(t0));
        }
        assert!(bucket.tokens() >= 0.0);
    }

    #[test]
    fn test_steady_state_converges_to_rate() {
        // 50 req/s against 10 req/s sustained for 20s.
        let t0 = Instant::now();
        let mut bucket = TokenBucket::new_at(5.0, 10.0, t0);
        let step = Duration::from_millis(20);
        let total = 1000;

        let admitted = (0..total)
            .filter(|i| bucket.allow_at(t0 + step * *i as u32))
            .count();

        let fraction = admitted as f64 / total as f64;
        assert!(
            (fraction - 0.2).abs() < 0.01,
            "admitted fraction {} should converge to 0.2",
            fraction
        );
    }

    #[test]
    fn test_stale_now_does_not_rewind() {
        let t0 = Instant::now();
        let mut bucket = TokenBucket::new_at(1.0, 1.0, t0 + Duration::from_secs(1));
        assert!(bucket.allow_at(t0));
        assert!(!bucket.allow_at(t0 + Duration::from_millis(500)));
    }
}
