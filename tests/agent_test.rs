use mecury_agent::agent::{Accumulator, Agent};
use mecury_agent::app::Config;
use mecury_agent::domain::{AgentError, Metric};
use mecury_agent::plugins::{Input, Output, PluginError, PluginRegistry};
use parking_lot::Mutex;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

// Factories are plain fn pointers, so captured output goes through a static.
fn sink() -> &'static Mutex<Vec<Metric>> {
    static SINK: OnceLock<Mutex<Vec<Metric>>> = OnceLock::new();
    SINK.get_or_init(|| Mutex::new(Vec::new()))
}

struct Burst;

impl Input for Burst {
    fn gather(&mut self, acc: &mut Accumulator<'_>) -> Result<(), PluginError> {
        for name in ["cpu", "mem", "net_eth0", "swap"] {
            acc.add_metric(Metric::new(name).with_field("value", 1_i64));
        }
        Ok(())
    }
}

struct Capture;

impl Output for Capture {
    fn write(&mut self, metrics: &[Metric]) -> Result<(), PluginError> {
        sink().lock().extend_from_slice(metrics);
        Ok(())
    }
}

fn side_sink() -> &'static Mutex<Vec<Metric>> {
    static SINK: OnceLock<Mutex<Vec<Metric>>> = OnceLock::new();
    SINK.get_or_init(|| Mutex::new(Vec::new()))
}

struct SideCapture;

impl Output for SideCapture {
    fn write(&mut self, metrics: &[Metric]) -> Result<(), PluginError> {
        side_sink().lock().extend_from_slice(metrics);
        Ok(())
    }
}

struct Stall;

impl Output for Stall {
    fn write(&mut self, _metrics: &[Metric]) -> Result<(), PluginError> {
        std::thread::sleep(Duration::from_millis(300));
        Ok(())
    }
}

fn registry() -> PluginRegistry {
    let mut registry = PluginRegistry::builtin();
    registry.register_input("burst", |_| Ok(Box::new(Burst)));
    registry.register_output("capture", |_| Ok(Box::new(Capture)));
    registry.register_output("side_capture", |_| Ok(Box::new(SideCapture)));
    registry.register_output("stall", |_| Ok(Box::new(Stall)));
    registry
}

fn config(extra_input: &str) -> Config {
    Config::from_toml_str(&format!(
        r#"
[common]
hostname = "test-host"

[tags]
env = "test"

[agent]
interval_ms = 50
flush_interval_ms = 50

[[inputs]]
name = "burst"
name_prefix = "sys_"
{extra_input}

[[outputs]]
name = "capture"
"#
    ))
    .unwrap()
}

#[test]
fn test_build_fails_on_bad_filter() {
    let config = config(r#"namepass = ["net["]"#);
    match Agent::new(&config, &registry()) {
        Err(AgentError::Filter { input, .. }) => assert_eq!(input, "burst"),
        Err(e) => panic!("unexpected error: {e}"),
        Ok(_) => panic!("agent built with a malformed filter"),
    }
}

#[test]
fn test_build_fails_on_unknown_plugin() {
    let mut config = config("");
    config.outputs[0].name = "kafka".to_string();
    assert!(matches!(
        Agent::new(&config, &registry()),
        Err(AgentError::Plugin(PluginError::UnknownOutput(_)))
    ));
}

#[test]
fn test_internal_input_reports_buffers() {
    let config = Config::from_toml_str(
        r#"
[common]
hostname = "h"

[agent]
metric_buffer_limit = 20
metric_batch_size = 5

[[inputs]]
name = "internal"

[[outputs]]
name = "discard"
"#,
    )
    .unwrap();

    let agent = Agent::new(&config, &PluginRegistry::builtin()).unwrap();
    let handles = agent.output_handles();
    assert_eq!(handles.len(), 1);
    assert_eq!(handles[0].buffer.capacity(), 20);
    agent.run_once().unwrap();
    assert!(handles[0].buffer.is_empty());
    assert_eq!(handles[0].buffer.total(), 1);
}

#[tokio::test]
async fn test_run_filters_renames_and_flushes() {
    sink().lock().clear();
    let config = config(r#"namedrop = ["swap", "net*"]"#);
    let agent = Agent::new(&config, &registry()).unwrap();
    let cancel = CancellationToken::new();

    let run = tokio::spawn(agent.run(cancel.clone()));
    tokio::time::sleep(Duration::from_millis(200)).await;
    cancel.cancel();
    timeout(Duration::from_secs(5), run)
        .await
        .expect("agent did not stop")
        .unwrap()
        .unwrap();

    let written = sink().lock().clone();
    assert!(!written.is_empty());
    assert_eq!(written.len() % 2, 0);
    for metric in &written {
        assert!(metric.name == "sys_cpu" || metric.name == "sys_mem", "{}", metric.name);
        assert_eq!(metric.tags["host"], "test-host");
        assert_eq!(metric.tags["env"], "test");
    }
}

#[test]
fn test_build_rejects_zero_flush_interval() {
    let mut config = config("");
    config.agent.flush_interval = Duration::ZERO;
    assert!(matches!(
        Agent::new(&config, &registry()),
        Err(AgentError::Config(_))
    ));
}

#[test]
fn test_build_rejects_config_without_outputs() {
    let mut config = config("");
    config.outputs.clear();
    assert!(matches!(
        Agent::new(&config, &registry()),
        Err(AgentError::Config(_))
    ));
}

#[tokio::test]
async fn test_slow_output_does_not_hold_back_others() {
    side_sink().lock().clear();
    let mut config = config("");
    let mut stall = config.outputs[0].clone();
    stall.name = "stall".to_string();
    config.outputs[0].name = "side_capture".to_string();
    config.outputs.insert(0, stall);

    let agent = Agent::new(&config, &registry()).unwrap();
    let cancel = CancellationToken::new();
    let run = tokio::spawn(agent.run(cancel.clone()));

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(!side_sink().lock().is_empty());

    cancel.cancel();
    timeout(Duration::from_secs(5), run)
        .await
        .expect("agent did not stop")
        .unwrap()
        .unwrap();
}
