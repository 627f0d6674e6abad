//! Logger factory with hot-swappable configuration
//!
//! The factory publishes its options together with the backend cache built
//! from them as one [`Generation`]. Readers load the current generation
//! without locking; [`LoggerFactory::switch_options`] replaces it with a
//! single atomic store, so a log call sees either the old options and
//! backends or the new ones, never a mix.

use super::backend::Backend;
use super::backend_cache::{build_backend, BackendCache};
use super::error::Result;
use super::log_level::LogLevel;
use super::logger::Logger;
use super::metrics::FactoryMetrics;
use super::options::Options;
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Options snapshot paired with the backends built from it
#[derive(Debug)]
pub struct Generation {
    pub options: Arc<Options>,
    pub cache: BackendCache,
}

impl Generation {
    fn new(options: Options) -> Self {
        Self {
            options: Arc::new(options),
            cache: BackendCache::new(),
        }
    }

    /// Effective minimum level for `name` under this generation
    pub fn level(&self, name: &str) -> LogLevel {
        self.options.resolve_level(name)
    }

    pub(crate) fn backend(&self, name: &str, metrics: &FactoryMetrics) -> Result<Arc<Backend>> {
        self.cache.get_or_build(name, &self.options, metrics)
    }
}

#[derive(Debug)]
struct FactoryInner {
    generation: ArcSwap<Generation>,
    /// Serializes switches; never taken on the logging path
    switch_lock: Mutex<()>,
    metrics: FactoryMetrics,
}

/// Creates named loggers and owns their configuration
///
/// Clones share the same state. Independent factories do not.
///
/// # Example
///
/// ```no_run
/// use rust_logger_factory::prelude::*;
///
/// let factory = LoggerFactory::new(Some(
///     Options::default().level("db", LogLevel::Debug),
/// ));
///
/// let db = factory.logger("db.pool");
/// db.debugf(format_args!("opened {} connections", 4));
///
/// factory
///     .switch_options(Some(Options::default().level("db", LogLevel::Warn)))
///     .expect("outputs should open");
/// assert!(!db.enabled(LogLevel::Debug));
/// ```
#[derive(Debug, Clone)]
pub struct LoggerFactory {
    inner: Arc<FactoryInner>,
}

impl LoggerFactory {
    /// Create a factory from optional options; `None` means all defaults
    #[must_use]
    pub fn new(options: Option<Options>) -> Self {
        let options = options.unwrap_or_default().defaulted();
        Self {
            inner: Arc::new(FactoryInner {
                generation: ArcSwap::from_pointee(Generation::new(options)),
                switch_lock: Mutex::new(()),
                metrics: FactoryMetrics::new(),
            }),
        }
    }

    /// A handle for `name`, seeded with the current global fields
    pub fn logger(&self, name: impl Into<String>) -> Logger {
        let fields = self.inner.generation.load().options.global_fields.clone();
        Logger::new(self.clone(), name.into(), fields)
    }

    /// Effective minimum level for `name` under the current options
    pub fn level(&self, name: &str) -> LogLevel {
        self.inner.generation.load().level(name)
    }

    /// Backend for `name` in the current generation, built on first use
    pub fn backend(&self, name: &str) -> Result<Arc<Backend>> {
        self.inner
            .generation
            .load()
            .backend(name, &self.inner.metrics)
    }

    /// Current fully defaulted options
    pub fn options(&self) -> Arc<Options> {
        Arc::clone(&self.inner.generation.load().options)
    }

    /// Replace the options and every cached backend.
    ///
    /// `None` leaves the factory untouched. Otherwise the options are
    /// defaulted and a backend is rebuilt for every name cached so far; if
    /// any of them fails to build, the error is returned and the current
    /// generation stays in effect.
    pub fn switch_options(&self, options: Option<Options>) -> Result<()> {
        let Some(options) = options else {
            return Ok(());
        };
        let options = options.defaulted();

        let _guard = self.inner.switch_lock.lock();
        let current = self.inner.generation.load_full();

        let mut entries = HashMap::with_capacity(current.cache.len());
        for name in current.cache.names() {
            let backend = build_backend(&name, &options, &self.inner.metrics)?;
            entries.insert(name, Arc::new(backend));
        }

        self.inner.generation.store(Arc::new(Generation {
            options: Arc::new(options),
            cache: BackendCache::from_entries(entries),
        }));
        self.inner.metrics.record_switch();
        Ok(())
    }

    /// Flush every backend of the current generation
    pub fn sync(&self) -> Result<()> {
        let generation = self.inner.generation.load();
        let mut result = Ok(());
        for backend in generation.cache.backends() {
            if let Err(e) = backend.sync() {
                eprintln!("[LOGGER ERROR] Backend flush failed: {}", e);
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }

    pub fn metrics(&self) -> &FactoryMetrics {
        &self.inner.metrics
    }

    pub(crate) fn generation(&self) -> Arc<Generation> {
        self.inner.generation.load_full()
    }
}

impl Default for LoggerFactory {
    fn default() -> Self {
        Self::new(None)
    }
}
