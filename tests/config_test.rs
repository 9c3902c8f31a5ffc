use mecury_agent::app::{App, Config, ConfigError, LogLevel};
use serial_test::serial;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

const FULL: &str = r#"
[common]
hostname = "collector-7"
log_level = "warn"
is_debug = false

[tags]
dc = "eu-west"

[agent]
interval_ms = 5000
flush_interval_ms = 2000
metric_batch_size = 50
metric_buffer_limit = 500

[[inputs]]
name = "internal"
name_prefix = "self_"
namepass = ["internal_*"]
namedrop = ["internal_debug"]

[[outputs]]
name = "stdout"

[[outputs]]
name = "discard"
metric_buffer_limit = 100
"#;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn test_load_full_config_from_file() {
    let file = write_config(FULL);
    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.common.log_level, LogLevel::Warn);
    assert_eq!(config.agent.interval, Duration::from_secs(5));
    assert_eq!(config.agent.flush_interval, Duration::from_secs(2));
    assert_eq!(config.agent.precision, Duration::from_secs(1));
    assert_eq!(config.tags["dc"], "eu-west");
    assert_eq!(config.tags["host"], "collector-7");
    assert_eq!(config.inputs[0].name_prefix, "self_");
    assert_eq!(config.outputs.len(), 2);
    assert_eq!(config.outputs[1].buffer_limit(&config.agent), 100);
    assert_eq!(config.outputs[1].batch_size(&config.agent), 50);
}

#[test]
#[serial]
fn test_missing_file() {
    let result = Config::from_file("/nonexistent/mecury.toml");
    assert!(matches!(result, Err(ConfigError::FileError(_))));
}

#[test]
#[serial]
fn test_malformed_toml() {
    let result = Config::from_toml_str("[agent\ninterval_ms = 1");
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
#[serial]
fn test_env_overrides_file() {
    unsafe {
        std::env::set_var("MECURY_METRIC_BATCH_SIZE", "25");
        std::env::set_var("MECURY_FLUSH_INTERVAL_MS", "750");
    }
    let result = Config::from_toml_str(FULL);
    unsafe {
        std::env::remove_var("MECURY_METRIC_BATCH_SIZE");
        std::env::remove_var("MECURY_FLUSH_INTERVAL_MS");
    }

    let config = result.unwrap();
    assert_eq!(config.agent.metric_batch_size, 25);
    assert_eq!(config.agent.flush_interval, Duration::from_millis(750));
}

#[test]
#[serial]
fn test_invalid_env_value() {
    unsafe {
        std::env::set_var("MECURY_METRIC_BUFFER_LIMIT", "lots");
    }
    let result = Config::from_toml_str(FULL);
    unsafe {
        std::env::remove_var("MECURY_METRIC_BUFFER_LIMIT");
    }

    assert!(matches!(result, Err(ConfigError::EnvError(_))));
}

#[test]
#[serial]
fn test_cli_log_level_overrides_file() {
    let file = write_config(FULL);
    let path = file.path().to_string_lossy().to_string();

    let app = App::from_args(["mecury-agent", "--config", &path, "--log-level", "trace"]).unwrap();

    assert_eq!(app.config().common.log_level, LogLevel::Trace);
    assert_eq!(app.config().common.effective_log_level(), LogLevel::Trace);
}

#[test]
#[serial]
fn test_is_debug_forces_debug_level() {
    let config = Config::from_toml_str(&FULL.replace("is_debug = false", "is_debug = true")).unwrap();
    assert_eq!(config.common.effective_log_level(), LogLevel::Debug);
}
