//! Core logger types and traits

pub mod appender;
pub mod backend;
pub mod backend_cache;
pub mod encoder;
pub mod error;
pub mod factory;
pub mod field;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod options;
pub mod resolver;
pub mod sampling;
pub mod stack;
pub mod timestamp;

pub use appender::Appender;
pub use backend::{Backend, BackendConfig, BASE_CALLER_SKIP};
pub use backend_cache::BackendCache;
pub use encoder::{Encoding, Record, RecordEncoder};
pub use error::{LoggerError, Result};
pub use factory::{Generation, LoggerFactory};
pub use field::{Field, FieldValue};
pub use log_level::LogLevel;
pub use logger::Logger;
pub use metrics::FactoryMetrics;
pub use options::{FieldKeys, Options};
pub use resolver::{resolve_level, NAME_DELIMITERS};
pub use sampling::{Sampler, SamplingConfig};
pub use stack::{capture_stack, caller_at};
pub use timestamp::{TimestampFormat, DEFAULT_TIME_LAYOUT};
