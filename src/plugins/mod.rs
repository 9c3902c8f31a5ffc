//! Plugin capabilities and the built-in plugin set.

pub mod inputs;
pub mod outputs;
pub mod registry;

use crate::agent::{Accumulator, OutputHandle};
use crate::domain::Metric;
use thiserror::Error;

pub use registry::{InputFactory, OutputFactory, PluginRegistry};

#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Unknown input plugin: {0}")]
    UnknownInput(String),

    #[error("Unknown output plugin: {0}")]
    UnknownOutput(String),

    #[error("Invalid option '{key}' for plugin '{plugin}': {reason}")]
    InvalidOption {
        plugin: String,
        key: String,
        reason: String,
    },

    #[error("Gather failed: {0}")]
    Gather(String),

    #[error("Write failed: {0}")]
    Write(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A source of metrics, polled on its collection interval.
///
/// `gather` runs on the blocking thread pool and may do blocking I/O.
pub trait Input: Send {
    fn gather(&mut self, acc: &mut Accumulator<'_>) -> Result<(), PluginError>;

    /// Called once after outputs are wired, for inputs that report on them.
    fn observe_outputs(&mut self, _outputs: &[OutputHandle]) {}
}

/// A sink receiving drained batches of metrics.
///
/// `write` and `close` run on the blocking thread pool and may do blocking
/// I/O. A write that never returns stalls shutdown of its output.
pub trait Output: Send {
    fn connect(&mut self) -> Result<(), PluginError> {
        Ok(())
    }

    fn write(&mut self, metrics: &[Metric]) -> Result<(), PluginError>;

    fn close(&mut self) -> Result<(), PluginError> {
        Ok(())
    }
}

/// Fails on any option key not in `allowed`.
pub fn reject_unknown_options(
    plugin: &str,
    options: &toml::Table,
    allowed: &[&str],
) -> Result<(), PluginError> {
    match options.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(PluginError::InvalidOption {
            plugin: plugin.to_string(),
            key: key.clone(),
            reason: "unknown option".to_string(),
        }),
        None => Ok(()),
    }
}
