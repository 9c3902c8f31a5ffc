use super::LogLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonConfig {
    /// Value of the `host` tag; detected from the system when unset.
    pub hostname: Option<String>,
    pub log_level: LogLevel,
    /// Forces debug logging regardless of `log_level`.
    pub is_debug: bool,
    /// Log to this file instead of stderr.
    pub log_path: Option<PathBuf>,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            hostname: None,
            log_level: LogLevel::Info,
            is_debug: false,
            log_path: None,
        }
    }
}

impl CommonConfig {
    pub fn effective_log_level(&self) -> LogLevel {
        if self.is_debug {
            LogLevel::Debug
        } else {
            self.log_level
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Default collection interval for inputs.
    #[serde(rename = "interval_ms", with = "super::serde_helpers")]
    pub interval: Duration,
    /// Timestamp truncation; zero derives it from `interval`.
    #[serde(rename = "precision_ms", with = "super::serde_helpers")]
    pub precision: Duration,
    #[serde(rename = "flush_interval_ms", with = "super::serde_helpers")]
    pub flush_interval: Duration,
    /// Maximum number of metrics handed to an output in one write.
    pub metric_batch_size: usize,
    /// Capacity of each output buffer.
    pub metric_buffer_limit: usize,
    pub omit_hostname: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            precision: Duration::ZERO,
            flush_interval: Duration::from_secs(10),
            metric_batch_size: 1000,
            metric_buffer_limit: 10_000,
            omit_hostname: false,
        }
    }
}

impl AgentConfig {
    /// Precision derived from the interval: 1s at most, 1ms below a second.
    pub fn derived_precision(&self) -> Duration {
        if self.interval >= Duration::from_secs(1) {
            Duration::from_secs(1)
        } else {
            Duration::from_millis(1)
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    /// Plugin name in the registry.
    pub name: String,
    #[serde(default)]
    pub name_prefix: String,
    #[serde(default)]
    pub name_suffix: String,
    #[serde(default)]
    pub name_override: Option<String>,
    #[serde(
        default,
        rename = "interval_ms",
        with = "super::serde_helpers::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub interval: Option<Duration>,
    #[serde(default)]
    pub namepass: Vec<String>,
    #[serde(default)]
    pub namedrop: Vec<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    /// Plugin-specific keys.
    #[serde(flatten)]
    pub options: toml::Table,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub name: String,
    #[serde(default)]
    pub metric_batch_size: Option<usize>,
    #[serde(default)]
    pub metric_buffer_limit: Option<usize>,
    #[serde(flatten)]
    pub options: toml::Table,
}

impl OutputConfig {
    pub fn batch_size(&self, agent: &AgentConfig) -> usize {
        self.metric_batch_size.unwrap_or(agent.metric_batch_size)
    }

    pub fn buffer_limit(&self, agent: &AgentConfig) -> usize {
        self.metric_buffer_limit.unwrap_or(agent.metric_buffer_limit)
    }
}
