use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

// Clients with no extractable identifier all share this bucket
const UNKNOWN_CLIENT: &str = "unknown";

// Outcome of a single check - what the handler needs to build headers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at: DateTime<Utc>,
}

// Per-client window record. window_end drives expiry (monotonic),
// reset_at is the same deadline on the wall clock for reporting back.
struct ClientRecord {
    count: u32,
    window_end: Instant,
    reset_at: DateTime<Utc>,
}

// Sliding-window limiter (fixed-reset variant): each key's window starts on
// first access and resets wholesale once expired.
pub struct RateLimiter {
    records: Mutex<HashMap<String, ClientRecord>>,
    max_requests: u32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        if window.is_zero() {
            panic!("Rate limit window must be positive");
        }
        if max_requests == 0 {
            panic!("Rate limit max must be positive");
        }

        Self {
            records: Mutex::new(HashMap::new()),
            max_requests,
            window,
        }
    }

    // Decide whether this key gets another request in its current window.
    // The sweep and the per-key update happen under one lock, so two calls
    // for the same key can never both take the last slot.
    pub fn check(&self, key: &str) -> RateLimitDecision {
        let key = if key.is_empty() { UNKNOWN_CLIENT } else { key };
        let now = Instant::now();
        let mut records = self.records.lock().unwrap();

        // sweep the whole map, not just this key
        records.retain(|_, record| record.window_end > now);

        if let Some(record) = records.get_mut(key) {
            if record.window_end <= now {
                // window expired between sweeps - start fresh
                record.count = 1;
                record.window_end = now + self.window;
                record.reset_at = Utc::now() + self.window;
                return RateLimitDecision {
                    allowed: true,
                    remaining: self.max_requests - 1,
                    reset_at: record.reset_at,
                };
            }

            if record.count < self.max_requests {
                record.count += 1;
                return RateLimitDecision {
                    allowed: true,
                    remaining: self.max_requests - record.count,
                    reset_at: record.reset_at,
                };
            }

            // over limit - no increment, caller waits for reset_at
            return RateLimitDecision {
                allowed: false,
                remaining: 0,
                reset_at: record.reset_at,
            };
        }

        // first request for this key
        let reset_at = Utc::now() + self.window;
        records.insert(
            key.to_string(),
            ClientRecord {
                count: 1,
                window_end: now + self.window,
                reset_at,
            },
        );

        RateLimitDecision {
            allowed: true,
            remaining: self.max_requests - 1,
            reset_at,
        }
    }

    // Number of live client records (feeds the gauge on /metrics)
    pub fn tracked_clients(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn counts_down_remaining_then_denies() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 10);

        let first = limiter.check("1.2.3.4");
        assert!(first.allowed);
        assert_eq!(first.remaining, 9);

        for expected in (0..=8).rev() {
            let decision = limiter.check("1.2.3.4");
            assert!(decision.allowed);
            assert_eq!(decision.remaining, expected);
            assert_eq!(decision.reset_at, first.reset_at);
        }

        let denied = limiter.check("1.2.3.4");
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
        assert_eq!(denied.reset_at, first.reset_at);
    }

    #[test]
    fn fresh_window_after_expiry() {
        let limiter = RateLimiter::new(Duration::from_millis(40), 2);

        assert!(limiter.check("a").allowed);
        assert!(limiter.check("a").allowed);
        assert!(!limiter.check("a").allowed);

        thread::sleep(Duration::from_millis(60));

        let decision = limiter.check("a");
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 1);
    }

    #[test]
    fn keys_do_not_interfere() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 3);

        for _ in 0..3 {
            assert!(limiter.check("1.2.3.4").allowed);
        }
        assert!(!limiter.check("1.2.3.4").allowed);

        let other = limiter.check("5.6.7.8");
        assert!(other.allowed);
        assert_eq!(other.remaining, 2);
    }

    #[test]
    fn unidentified_clients_share_one_bucket() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 2);

        assert_eq!(limiter.check("").remaining, 1);
        assert_eq!(limiter.check("unknown").remaining, 0);
        assert!(!limiter.check("").allowed);
    }

    #[test]
    fn concurrent_checks_admit_exactly_the_limit() {
        let limiter = Arc::new(RateLimiter::new(Duration::from_secs(60), 5));
        let barrier = Arc::new(Barrier::new(20));

        let handles: Vec<_> = (0..20)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    limiter.check("9.9.9.9").allowed
                })
            })
            .collect();

        let allowed = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|allowed| *allowed)
            .count();

        assert_eq!(allowed, 5);
    }

    #[test]
    fn cleanup_drops_expired_records() {
        let limiter = RateLimiter::new(Duration::from_millis(40), 3);

        limiter.check("a");
        assert_eq!(limiter.tracked_clients(), 1);

        thread::sleep(Duration::from_millis(60));

        // any call sweeps the whole map
        limiter.check("b");
        assert_eq!(limiter.tracked_clients(), 1);

        // and "a" starts over as if never seen
        let decision = limiter.check("a");
        assert!(decision.allowed);
        assert_eq!(decision.remaining, 2);
    }

    #[test]
    #[should_panic]
    fn zero_window_is_a_config_error() {
        RateLimiter::new(Duration::ZERO, 5);
    }

    #[test]
    #[should_panic]
    fn zero_max_is_a_config_error() {
        RateLimiter::new(Duration::from_secs(60), 0);
    }
}
