//! Copy-on-write map from logger name to constructed backend

use super::backend::{Backend, BackendConfig};
use super::error::Result;
use super::metrics::FactoryMetrics;
use super::options::Options;
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::Arc;

type Entries = HashMap<String, Arc<Backend>>;

/// Backends built for one options generation
///
/// Reads load an immutable map without locking. Inserts build outside any
/// lock and publish a new map with [`ArcSwap::rcu`]; when two threads race
/// on the same name the first published entry wins and both return it.
#[derive(Debug)]
pub struct BackendCache {
    entries: ArcSwap<Entries>,
}

impl BackendCache {
    pub fn new() -> Self {
        Self::from_entries(HashMap::new())
    }

    /// Cache prepopulated with already built backends
    pub fn from_entries(entries: Entries) -> Self {
        Self {
            entries: ArcSwap::from_pointee(entries),
        }
    }

    /// Cached backend for `name`, if any
    pub fn get(&self, name: &str) -> Option<Arc<Backend>> {
        self.entries.load().get(name).cloned()
    }

    /// Cached backend for `name`, building it from `options` on a miss
    pub fn get_or_build(
        &self,
        name: &str,
        options: &Options,
        metrics: &FactoryMetrics,
    ) -> Result<Arc<Backend>> {
        if let Some(backend) = self.get(name) {
            metrics.record_cache_hit();
            return Ok(backend);
        }
        metrics.record_cache_miss();

        let built = Arc::new(build_backend(name, options, metrics)?);
        self.entries.rcu(|current| {
            if current.contains_key(name) {
                Arc::clone(current)
            } else {
                let mut next = Entries::clone(current);
                next.insert(name.to_string(), Arc::clone(&built));
                Arc::new(next)
            }
        });

        // Entries are never removed, so the published one is there now
        Ok(self.get(name).unwrap_or(built))
    }

    /// Names with a cached backend
    pub fn names(&self) -> Vec<String> {
        self.entries.load().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }

    /// Snapshot of every cached backend
    pub fn backends(&self) -> Vec<Arc<Backend>> {
        self.entries.load().values().cloned().collect()
    }
}

impl Default for BackendCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Build one backend and count the outcome
pub(crate) fn build_backend(
    name: &str,
    options: &Options,
    metrics: &FactoryMetrics,
) -> Result<Backend> {
    match Backend::build(BackendConfig::from_options(options, name)) {
        Ok(backend) => {
            metrics.record_backend_built();
            Ok(backend)
        }
        Err(e) => {
            metrics.record_build_failure();
            Err(e)
        }
    }
}
