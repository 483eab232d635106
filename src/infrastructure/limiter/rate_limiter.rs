use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::time::sleep;

const EVICTION_INTERVAL: Duration = Duration::from_secs(60);

/// A token bucket which allows fractional tokens for precise refill
#[derive(Debug)]
struct TokenBucket {
    capacity: f64,
    tokens: f64,
    refill_per_sec: f64,
    last_refill: Instant,
    last_seen: Instant,
}

impl TokenBucket {
    fn new(capacity: f64, refill_per_sec: f64) -> Self {
        let now = Instant::now();
        Self {
            capacity,
            tokens: capacity,
            refill_per_sec,
            last_refill: now,
            last_seen: now,
        }
    }

    fn refill(&mut self, now: Instant) {
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        if elapsed > 0.0 {
            self.tokens = (self.tokens + elapsed * self.refill_per_sec).min(self.capacity);
            self.last_refill = now;
        }
    }

    /// Takes one token. On rejection returns the seconds until the next one.
    fn try_acquire(&mut self) -> Result<(), u64> {
        let now = Instant::now();
        self.last_seen = now;
        self.refill(now);

        // epsilon avoids fp surprises right at the boundary
        if self.tokens + 1e-12 >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            let missing = 1.0 - self.tokens;
            Err(((missing / self.refill_per_sec).ceil() as u64).max(1))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Limited { retry_after_secs: u64 },
}

/// Per-key limiter: `limit` requests per `window`, refilled continuously.
#[derive(Clone)]
pub struct RateLimiterStore {
    map: Arc<DashMap<String, Arc<Mutex<TokenBucket>>>>,
    capacity: f64,
    refill_per_sec: f64,
    idle_ttl: Duration,
}

impl RateLimiterStore {
    pub fn new(limit: u32, window: Duration) -> Self {
        let capacity = f64::from(limit.max(1));
        Self {
            map: Arc::new(DashMap::new()),
            capacity,
            refill_per_sec: capacity / window.as_secs_f64().max(1.0),
            idle_ttl: window,
        }
    }

    pub fn per_hour(limit: u32) -> Self {
        Self::new(limit, Duration::from_secs(3600))
    }

    pub fn check(&self, key: &str) -> RateDecision {
        let bucket = self
            .map
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(TokenBucket::new(self.capacity, self.refill_per_sec))))
            .clone();

        let mut bucket = bucket.lock();
        match bucket.try_acquire() {
            Ok(()) => RateDecision::Allowed,
            Err(retry_after_secs) => RateDecision::Limited { retry_after_secs },
        }
    }

    /// Drops keys that have been idle for longer than the window. A full
    /// bucket is indistinguishable from a fresh one at that point.
    pub fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let mut evicted = 0;
        // Runs under the shard lock, so a bucket is only ever try-locked here.
        // A busy bucket is in use and therefore not idle.
        self.map.retain(|_, bucket| {
            let keep = bucket
                .try_lock()
                .is_none_or(|b| now.duration_since(b.last_seen) <= self.idle_ttl);
            if !keep {
                evicted += 1;
            }
            keep
        });
        evicted
    }

    pub fn tracked_keys(&self) -> usize {
        self.map.len()
    }

    /// Must be called from inside a tokio runtime.
    pub fn spawn_eviction(&self) {
        let store = self.clone();
        tokio::spawn(async move {
            loop {
                sleep(EVICTION_INTERVAL).await;
                let evicted = store.evict_idle();
                if evicted > 0 {
                    tracing::debug!(evicted, "Evicted idle rate limiter keys");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_limit_then_rejects() {
        let store = RateLimiterStore::per_hour(3);
        for _ in 0..3 {
            assert_eq!(store.check("1.2.3.4"), RateDecision::Allowed);
        }
        match store.check("1.2.3.4") {
            RateDecision::Limited { retry_after_secs } => assert!(retry_after_secs >= 1),
            RateDecision::Allowed => panic!("fourth request should be limited"),
        }
    }

    #[test]
    fn keys_are_independent() {
        let store = RateLimiterStore::per_hour(1);
        assert_eq!(store.check("a"), RateDecision::Allowed);
        assert_eq!(store.check("b"), RateDecision::Allowed);
        assert_ne!(store.check("a"), RateDecision::Allowed);
        assert_eq!(store.tracked_keys(), 2);
    }

    #[test]
    fn idle_keys_are_evicted() {
        let store = RateLimiterStore::new(1, Duration::from_millis(1));
        store.check("a");
        std::thread::sleep(Duration::from_millis(1100));
        assert_eq!(store.evict_idle(), 1);
        assert_eq!(store.tracked_keys(), 0);
    }

    #[test]
    fn locked_buckets_survive_eviction() {
        let store = RateLimiterStore::new(1, Duration::from_millis(1));
        store.check("busy");
        store.check("idle");
        std::thread::sleep(Duration::from_millis(20));

        let busy = store.map.get("busy").map(|entry| Arc::clone(entry.value())).unwrap();
        let guard = busy.lock();
        assert_eq!(store.evict_idle(), 1);
        drop(guard);

        assert_eq!(store.tracked_keys(), 1);
        assert!(store.map.contains_key("busy"));
    }
}
