//! Per-backend record sampling
//!
//! Caps how many records with the same level and message a backend writes
//! per tick: the first `initial` pass, then every `thereafter`-th one.
//! Counting is lock-free: each `(level, message hash)` bucket holds an
//! atomic counter and the instant its window resets.

use super::log_level::LogLevel;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::time::{Duration, Instant};

const BUCKETS_PER_LEVEL: usize = 256;

/// Sampling parameters forwarded to every backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingConfig {
    /// Records per tick always written for one level/message pair
    pub initial: u64,
    /// After `initial`, write one record out of every `thereafter`
    ///
    /// Zero drops everything past `initial`.
    pub thereafter: u64,
    /// Length of the counting window
    pub tick: Duration,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            initial: 100,
            thereafter: 100,
            tick: Duration::from_secs(1),
        }
    }
}

#[derive(Debug, Default)]
struct Counter {
    resets_at: AtomicI64,
    count: AtomicU64,
}

impl Counter {
    fn inc_check_reset(&self, now: i64, tick: i64) -> u64 {
        let resets_at = self.resets_at.load(Ordering::Acquire);
        if now > resets_at {
            if self
                .resets_at
                .compare_exchange(resets_at, now + tick, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                self.count.store(1, Ordering::Release);
                return 1;
            }
        }
        self.count.fetch_add(1, Ordering::AcqRel) + 1
    }
}

/// Lock-free sampler owned by one backend
#[derive(Debug)]
pub struct Sampler {
    config: SamplingConfig,
    epoch: Instant,
    counters: Vec<Counter>,
    dropped: AtomicU64,
}

impl Sampler {
    pub fn new(config: SamplingConfig) -> Self {
        let counters = (0..LogLevel::EMITTING.len() * BUCKETS_PER_LEVEL)
            .map(|_| Counter::default())
            .collect();
        Self {
            config,
            epoch: Instant::now(),
            counters,
            dropped: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &SamplingConfig {
        &self.config
    }

    /// Decide whether a record should be written
    pub fn check(&self, level: LogLevel, message: &str) -> bool {
        let level_idx = match level {
            LogLevel::Debug => 0,
            LogLevel::Info => 1,
            LogLevel::Warn => 2,
            LogLevel::Error => 3,
            LogLevel::Off => return false,
        };
        let bucket = (fnv1a(message) as usize) % BUCKETS_PER_LEVEL;
        let counter = &self.counters[level_idx * BUCKETS_PER_LEVEL + bucket];

        let now = self.epoch.elapsed().as_nanos() as i64;
        let n = counter.inc_check_reset(now, self.config.tick.as_nanos() as i64);

        let keep = n <= self.config.initial
            || (self.config.thereafter > 0 && (n - self.config.initial) % self.config.thereafter == 0);
        if !keep {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        keep
    }

    /// Records rejected so far
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

fn fnv1a(s: &str) -> u32 {
    const OFFSET: u32 = 2166136261;
    const PRIME: u32 = 16777619;
    s.bytes()
        .fold(OFFSET, |hash, b| (hash ^ b as u32).wrapping_mul(PRIME))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sampler(initial: u64, thereafter: u64) -> Sampler {
        Sampler::new(SamplingConfig {
            initial,
            thereafter,
            tick: Duration::from_secs(3600),
        })
    }

    #[test]
    fn test_initial_then_every_nth() {
        let s = sampler(3, 2);
        let kept: Vec<bool> = (0..8).map(|_| s.check(LogLevel::Info, "same")).collect();
        assert_eq!(kept, vec![true, true, true, false, true, false, true, false]);
        assert_eq!(s.dropped_count(), 3);
    }

    #[test]
    fn test_zero_thereafter_drops_rest() {
        let s = sampler(2, 0);
        assert!(s.check(LogLevel::Warn, "m"));
        assert!(s.check(LogLevel::Warn, "m"));
        assert!(!s.check(LogLevel::Warn, "m"));
    }

    #[test]
    fn test_levels_count_separately() {
        let s = sampler(1, 0);
        assert!(s.check(LogLevel::Info, "m"));
        assert!(s.check(LogLevel::Error, "m"));
        assert!(!s.check(LogLevel::Info, "m"));
    }

    #[test]
    fn test_window_resets() {
        let s = Sampler::new(SamplingConfig {
            initial: 1,
            thereafter: 0,
            tick: Duration::from_millis(1),
        });
        assert!(s.check(LogLevel::Info, "m"));
        std::thread::sleep(Duration::from_millis(5));
        assert!(s.check(LogLevel::Info, "m"));
    }

    #[test]
    fn test_default_config() {
        let config = SamplingConfig::default();
        assert_eq!(config.initial, 100);
        assert_eq!(config.thereafter, 100);
        assert_eq!(config.tick, Duration::from_secs(1));
    }

    #[test]
    fn test_off_is_never_written() {
        assert!(!sampler(10, 1).check(LogLevel::Off, "m"));
    }
}
