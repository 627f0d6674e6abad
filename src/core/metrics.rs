//! Factory metrics for observability
//!
//! Counters for cache behaviour, backend construction, configuration
//! switches and record writes.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics shared by a factory and every handle it creates
///
/// # Example
///
/// ```
/// use rust_logger_factory::FactoryMetrics;
///
/// let metrics = FactoryMetrics::new();
///
/// metrics.record_cache_miss();
/// metrics.record_cache_hit();
/// metrics.record_cache_hit();
///
/// assert_eq!(metrics.cache_hits(), 2);
/// assert!((metrics.cache_hit_rate() - 66.6).abs() < 1.0);
/// ```
#[derive(Debug)]
pub struct FactoryMetrics {
    /// Backend lookups served from the cache
    cache_hits: AtomicU64,

    /// Backend lookups that had to build
    cache_misses: AtomicU64,

    /// Backends constructed, lazily or during a switch
    backends_built: AtomicU64,

    /// Backend constructions that failed
    build_failures: AtomicU64,

    /// Published configuration switches
    switches: AtomicU64,

    records_written: AtomicU64,

    /// Records that failed on at least one output
    write_failures: AtomicU64,
}

impl FactoryMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            cache_hits: AtomicU64::new(0),
            cache_misses: AtomicU64::new(0),
            backends_built: AtomicU64::new(0),
            build_failures: AtomicU64::new(0),
            switches: AtomicU64::new(0),
            records_written: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn cache_misses(&self) -> u64 {
        self.cache_misses.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn backends_built(&self) -> u64 {
        self.backends_built.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn build_failures(&self) -> u64 {
        self.build_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn switches(&self) -> u64 {
        self.switches.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn records_written(&self) -> u64 {
        self.records_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    /// Record a cache hit, returning the previous count
    #[inline]
    pub fn record_cache_hit(&self) -> u64 {
        self.cache_hits.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_cache_miss(&self) -> u64 {
        self.cache_misses.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_backend_built(&self) -> u64 {
        self.backends_built.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_build_failure(&self) -> u64 {
        self.build_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_switch(&self) -> u64 {
        self.switches.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.records_written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Cache hit rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if no lookups have happened.
    pub fn cache_hit_rate(&self) -> f64 {
        let hits = self.cache_hits() as f64;
        let total = hits + self.cache_misses() as f64;
        if total == 0.0 {
            0.0
        } else {
            (hits / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.cache_hits.store(0, Ordering::Relaxed);
        self.cache_misses.store(0, Ordering::Relaxed);
        self.backends_built.store(0, Ordering::Relaxed);
        self.build_failures.store(0, Ordering::Relaxed);
        self.switches.store(0, Ordering::Relaxed);
        self.records_written.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for FactoryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for FactoryMetrics {
    /// Snapshot of the current counter values
    fn clone(&self) -> Self {
        Self {
            cache_hits: AtomicU64::new(self.cache_hits()),
            cache_misses: AtomicU64::new(self.cache_misses()),
            backends_built: AtomicU64::new(self.backends_built()),
            build_failures: AtomicU64::new(self.build_failures()),
            switches: AtomicU64::new(self.switches()),
            records_written: AtomicU64::new(self.records_written()),
            write_failures: AtomicU64::new(self.write_failures()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = FactoryMetrics::new();
        assert_eq!(metrics.cache_hits(), 0);
        assert_eq!(metrics.cache_misses(), 0);
        assert_eq!(metrics.backends_built(), 0);
        assert_eq!(metrics.build_failures(), 0);
        assert_eq!(metrics.switches(), 0);
        assert_eq!(metrics.records_written(), 0);
        assert_eq!(metrics.write_failures(), 0);
    }

    #[test]
    fn test_record_returns_previous() {
        let metrics = FactoryMetrics::new();
        assert_eq!(metrics.record_backend_built(), 0);
        assert_eq!(metrics.record_backend_built(), 1);
        assert_eq!(metrics.backends_built(), 2);
    }

    #[test]
    fn test_cache_hit_rate() {
        let metrics = FactoryMetrics::new();
        assert_eq!(metrics.cache_hit_rate(), 0.0);

        metrics.record_cache_miss();
        for _ in 0..3 {
            metrics.record_cache_hit();
        }
        assert_eq!(metrics.cache_hit_rate(), 75.0);
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = FactoryMetrics::new();
        metrics.record_switch();
        metrics.record_written();
        metrics.record_write_failure();

        metrics.reset();

        assert_eq!(metrics.switches(), 0);
        assert_eq!(metrics.records_written(), 0);
        assert_eq!(metrics.write_failures(), 0);
    }

    #[test]
    fn test_metrics_clone_is_snapshot() {
        let metrics = FactoryMetrics::new();
        metrics.record_build_failure();

        let snapshot = metrics.clone();
        metrics.record_build_failure();

        assert_eq!(metrics.build_failures(), 2);
        assert_eq!(snapshot.build_failures(), 1);
    }
}
