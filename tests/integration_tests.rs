//! Integration tests for the logger factory
//!
//! These tests verify:
//! - End-to-end JSON records through a file output
//! - Hierarchical level gating
//! - Backend reuse and configuration switches
//! - Console output in development mode
//! - Logger name handling

use rust_logger_factory::prelude::*;
use rust_logger_factory::{info, warn};
use serde_json::Value;
use std::cell::Cell;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn log_path(temp_dir: &TempDir, file: &str) -> PathBuf {
    temp_dir.path().join(file)
}

fn with_output(options: Options, path: &Path) -> Options {
    options.output_paths([path.to_str().unwrap()])
}

fn read_records(path: &Path) -> Vec<Value> {
    let content = fs::read_to_string(path).expect("Failed to read log file");
    content
        .lines()
        .map(|line| serde_json::from_str(line).expect("Record should be JSON"))
        .collect()
}

struct CountingDisplay<'a>(&'a Cell<usize>);

impl fmt::Display for CountingDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.set(self.0.get() + 1);
        write!(f, "formatted")
    }
}

#[test]
fn test_end_to_end_json_record() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = log_path(&temp_dir, "e2e.log");

    let options = Options::default()
        .level("", LogLevel::Warn)
        .level("foo", LogLevel::Debug);
    let factory = LoggerFactory::new(Some(with_output(options, &log_file)));

    let foo = factory.logger("foo.bar");
    let other = factory.logger("other");

    foo.debugw("hello", &[Field::string("k", "v")]);
    other.info(&[&"dropped"]);
    factory.sync().expect("Failed to sync");

    let records = read_records(&log_file);
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record["msg"], "hello");
    assert_eq!(record["level"], "DEBUG");
    assert_eq!(record["logger"], "foo.bar");
    assert_eq!(record["k"], "v");
    assert!(record["ts"].is_string());
    assert!(record["caller"]
        .as_str()
        .unwrap()
        .starts_with("tests/integration_tests.rs:"));
}

#[test]
fn test_info_scenario_with_derived_handle() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = log_path(&temp_dir, "scenario.log");
    let factory = LoggerFactory::new(Some(with_output(
        Options::default().level("", LogLevel::Info),
        &log_file,
    )));
    let svc = factory.logger("svc");

    svc.debug(&[&"x"]);
    svc.info(&[&"a", &"b"]);
    svc.with_field([Field::string("req", "1")]).info(&[&"hit"]);
    svc.info(&[&"plain"]);
    factory.sync().expect("Failed to sync");

    let records = read_records(&log_file);
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["msg"], "ab");
    assert_eq!(records[0]["level"], "INFO");
    assert_eq!(records[1]["msg"], "hit");
    assert_eq!(records[1]["req"], "1");
    assert!(records[2].get("req").is_none());
}

#[test]
fn test_root_alias_and_default_fallback() {
    let factory = LoggerFactory::new(Some(
        Options::default().levels([("root".to_string(), LogLevel::Error)].into()),
    ));
    // The seeded "" entry is Info and takes precedence over the alias
    assert_eq!(factory.level("x.y"), LogLevel::Info);

    let factory = LoggerFactory::new(None);
    assert_eq!(factory.level("a.b.c"), LogLevel::Info);
    assert_eq!(factory.level(""), LogLevel::Info);
}

#[test]
fn test_disabled_call_does_not_format() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = log_path(&temp_dir, "gating.log");
    let factory = LoggerFactory::new(Some(with_output(
        Options::default().level("", LogLevel::Warn),
        &log_file,
    )));
    let logger = factory.logger("svc");
    let count = Cell::new(0);

    logger.infof(format_args!("{}", CountingDisplay(&count)));
    info!(logger, "{}", CountingDisplay(&count));
    assert_eq!(count.get(), 0);

    warn!(logger, "{}", CountingDisplay(&count));
    assert_eq!(count.get(), 1);
}

#[test]
fn test_handle_immutability() {
    let factory = LoggerFactory::new(None);
    let base = factory.logger("svc");
    let derived = base.with_field([Field::string("a", "1")]);
    let again = derived.with_field([Field::string("b", "2")]);

    assert!(base.fields().is_empty());
    assert_eq!(derived.fields(), &[Field::string("a", "1")]);
    assert_eq!(
        again.fields(),
        &[Field::string("a", "1"), Field::string("b", "2")]
    );
}

#[test]
fn test_cache_identity_and_switch() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let first_file = log_path(&temp_dir, "first.log");
    let second_file = log_path(&temp_dir, "second.log");

    let factory = LoggerFactory::new(Some(with_output(Options::default(), &first_file)));
    let logger = factory.logger("svc");

    let before = factory.backend("svc").expect("Backend should build");
    assert!(Arc::ptr_eq(&before, &factory.backend("svc").unwrap()));

    logger.info(&[&"before switch"]);
    factory
        .switch_options(Some(with_output(Options::default(), &second_file)))
        .expect("Switch should succeed");
    let after = factory.backend("svc").unwrap();
    assert!(!Arc::ptr_eq(&before, &after));

    logger.info(&[&"after switch"]);
    factory.sync().expect("Failed to sync");
    before.sync().expect("Failed to sync old backend");

    assert_eq!(read_records(&first_file)[0]["msg"], "before switch");
    assert_eq!(read_records(&second_file)[0]["msg"], "after switch");
}

#[test]
fn test_switch_none_keeps_identity() {
    let factory = LoggerFactory::new(Some(Options::default().level("a", LogLevel::Debug)));
    let options = factory.options();
    let backend = factory.backend("a").unwrap();

    factory.switch_options(None).unwrap();

    assert!(Arc::ptr_eq(&options, &factory.options()));
    assert!(Arc::ptr_eq(&backend, &factory.backend("a").unwrap()));
}

#[test]
fn test_switch_changes_existing_handles() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = log_path(&temp_dir, "switch.log");
    let factory = LoggerFactory::new(Some(with_output(Options::default(), &log_file)));
    let logger = factory.logger("db.pool");

    logger.debug(&[&"hidden"]);
    factory
        .switch_options(Some(with_output(
            Options::default().level("db", LogLevel::Debug),
            &log_file,
        )))
        .unwrap();
    logger.debug(&[&"shown"]);
    factory.sync().unwrap();

    let records = read_records(&log_file);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["msg"], "shown");
}

#[test]
fn test_failing_switch_keeps_old_configuration() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = log_path(&temp_dir, "kept.log");
    let factory = LoggerFactory::new(Some(with_output(Options::default(), &log_file)));
    let logger = factory.logger("svc");
    logger.info(&[&"first"]);

    let unreachable = temp_dir.path().join("missing").join("out.log");
    let result = factory.switch_options(Some(with_output(
        Options::default().level("", LogLevel::Error),
        &unreachable,
    )));
    assert!(matches!(result, Err(LoggerError::OutputOpen { .. })));

    logger.info(&[&"second"]);
    factory.sync().unwrap();

    let messages: Vec<Value> = read_records(&log_file)
        .into_iter()
        .map(|r| r["msg"].clone())
        .collect();
    assert_eq!(messages, vec!["first", "second"]);
}

#[test]
fn test_logger_name_key() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = log_path(&temp_dir, "names.log");
    let factory = LoggerFactory::new(Some(with_output(Options::default(), &log_file)));

    factory.logger("  padded  ").info(&[&"padded"]);
    factory.logger("").info(&[&"unnamed"]);
    factory.sync().unwrap();

    let records = read_records(&log_file);
    assert_eq!(records[0]["logger"], "padded");
    assert!(records[1].get("logger").is_none());

    let hidden_file = log_path(&temp_dir, "hidden.log");
    let factory = LoggerFactory::new(Some(with_output(
        Options::default().disable_logger(true),
        &hidden_file,
    )));
    factory.logger("svc").info(&[&"no name"]);
    factory.sync().unwrap();
    assert!(read_records(&hidden_file)[0].get("logger").is_none());
}

#[test]
fn test_custom_field_keys_and_global_fields() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = log_path(&temp_dir, "keys.log");
    let options = Options::default()
        .message_field_key("message")
        .level_field_key("severity")
        .time_layout("unix_millis")
        .global_fields(vec![Field::string("service", "api")]);
    let factory = LoggerFactory::new(Some(with_output(options, &log_file)));

    factory.logger("svc").warnw("custom", &[Field::uint32("n", 7)]);
    factory.sync().unwrap();

    let record = &read_records(&log_file)[0];
    assert_eq!(record["message"], "custom");
    assert_eq!(record["severity"], "WARN");
    assert_eq!(record["service"], "api");
    assert_eq!(record["n"], 7);
    assert!(record["ts"].is_u64());
}

#[test]
fn test_error_records_carry_stacktrace() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = log_path(&temp_dir, "stack.log");
    let factory = LoggerFactory::new(Some(with_output(Options::default(), &log_file)));
    let logger = factory.logger("svc");

    logger.warn(&[&"no stack"]);
    logger.error(&[&"with stack"]);
    factory.sync().unwrap();

    let records = read_records(&log_file);
    assert!(records[0].get("stacktrace").is_none());
    assert!(records[1]["stacktrace"].is_string());
}

#[test]
fn test_stacktrace_starts_in_calling_test() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = log_path(&temp_dir, "stack_start.log");
    let factory = LoggerFactory::new(Some(with_output(Options::default(), &log_file)));

    factory.logger("svc").errorw("bad", &[Field::stack("where", 0)]);
    factory.sync().unwrap();

    let record = &read_records(&log_file)[0];
    for key in ["stacktrace", "where"] {
        let stack = record[key].as_str().unwrap();
        let first = stack.lines().next().unwrap();
        assert!(
            first.contains("test_stacktrace_starts_in_calling_test"),
            "{}: {}",
            key,
            stack
        );
    }
}

#[inline(never)]
fn audit(logger: &Logger, action: &str) {
    logger.infow("audit", &[Field::string("action", action)]);
}

#[test]
fn test_wrapper_reports_its_caller() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = log_path(&temp_dir, "wrapper.log");
    let options = Options::default().global_add_caller_skip_adjust(1);
    let factory = LoggerFactory::new(Some(with_output(options, &log_file)));
    let logger = factory.logger("svc");

    let line = line!() + 1;
    audit(&logger, "login");
    factory.sync().unwrap();

    let record = &read_records(&log_file)[0];
    assert_eq!(record["action"], "login");
    assert_eq!(
        record["caller"],
        format!("tests/integration_tests.rs:{}", line).as_str()
    );
}

#[test]
fn test_development_console_output() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = log_path(&temp_dir, "console.log");
    let factory = LoggerFactory::new(Some(with_output(
        Options::default().development(true).disable_caller(true),
        &log_file,
    )));

    factory
        .logger("svc")
        .infow("ready", &[Field::bool("ok", true)]);
    factory.sync().unwrap();

    let content = fs::read_to_string(&log_file).unwrap();
    let line = content.lines().next().expect("One record expected");
    assert!(serde_json::from_str::<Value>(line).is_err());
    let parts: Vec<&str> = line.split('\t').collect();
    assert_eq!(parts.len(), 5);
    assert!(parts[1].contains("INFO"));
    assert_eq!(parts[2], "svc");
    assert_eq!(parts[3], "ready");
    assert_eq!(parts[4], "{\"ok\":true}");
}

#[test]
fn test_log_injection_prevention() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = log_path(&temp_dir, "injection.log");
    let factory = LoggerFactory::new(Some(with_output(Options::default(), &log_file)));

    factory
        .logger("svc")
        .info(&[&"User login\nERROR fake entry"]);
    factory.sync().unwrap();

    let content = fs::read_to_string(&log_file).unwrap();
    assert_eq!(content.lines().count(), 1, "Record should stay on one line");
    assert_eq!(read_records(&log_file)[0]["msg"], "User login\nERROR fake entry");
}

#[test]
fn test_metrics_track_activity() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = log_path(&temp_dir, "metrics.log");
    let factory = LoggerFactory::new(Some(with_output(Options::default(), &log_file)));
    let logger = factory.logger("svc");

    logger.info(&[&"one"]);
    logger.info(&[&"two"]);
    logger.debug(&[&"filtered"]);

    let metrics = factory.metrics();
    assert_eq!(metrics.records_written(), 2);
    assert_eq!(metrics.cache_misses(), 1);
    assert_eq!(metrics.cache_hits(), 1);
    assert_eq!(metrics.backends_built(), 1);
}
