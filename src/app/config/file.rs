use super::groups::{AgentConfig, CommonConfig, InputConfig, OutputConfig};
use super::serde_helpers::{load_env_millis, load_env_string_opt, load_env_var};
use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Complete agent configuration as read from the TOML file.
///
/// ```toml
/// [common]
/// log_level = "info"
///
/// [tags]
/// dc = "eu-west"
///
/// [agent]
/// interval_ms = 10000
/// flush_interval_ms = 10000
/// metric_batch_size = 1000
/// metric_buffer_limit = 10000
///
/// [[inputs]]
/// name = "internal"
/// namepass = ["internal_*"]
///
/// [[outputs]]
/// name = "stdout"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub common: CommonConfig,
    /// Tags added to every metric.
    pub tags: BTreeMap<String, String>,
    pub agent: AgentConfig,
    pub inputs: Vec<InputConfig>,
    pub outputs: Vec<OutputConfig>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(content)?;
        config.apply_env_overrides()?;
        config.post_process()?;
        config.validate()?;
        Ok(config)
    }

    /// Environment variables take precedence over the file.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        load_env_string_opt("MECURY_HOSTNAME", &mut self.common.hostname);
        load_env_millis("MECURY_INTERVAL_MS", &mut self.agent.interval)?;
        load_env_millis("MECURY_FLUSH_INTERVAL_MS", &mut self.agent.flush_interval)?;
        load_env_var("MECURY_METRIC_BATCH_SIZE", &mut self.agent.metric_batch_size)?;
        load_env_var("MECURY_METRIC_BUFFER_LIMIT", &mut self.agent.metric_buffer_limit)?;
        Ok(())
    }

    pub fn post_process(&mut self) -> Result<(), ConfigError> {
        if self.agent.precision.is_zero() {
            self.agent.precision = self.agent.derived_precision();
        }

        if self.common.hostname.is_none() {
            self.common.hostname = detect_hostname();
        }

        if !self.agent.omit_hostname
            && let Some(hostname) = &self.common.hostname
            && !self.tags.contains_key("host")
        {
            self.tags.insert("host".to_string(), hostname.clone());
        }

        Ok(())
    }
}

fn detect_hostname() -> Option<String> {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .filter(|name| !name.is_empty())
}
