use crate::app::config::ConfigError;
use crate::buffer::BufferError;
use crate::filter::FilterError;
use crate::plugins::PluginError;
use thiserror::Error;

/// Top-level error type for building and running the agent.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Filter error in input '{input}': {source}")]
    Filter {
        input: String,
        #[source]
        source: FilterError,
    },

    #[error("Buffer error in output '{output}': {source}")]
    Buffer {
        output: String,
        #[source]
        source: BufferError,
    },

    #[error("Plugin error: {0}")]
    Plugin(#[from] PluginError),
}
