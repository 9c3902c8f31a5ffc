use super::{Config, ConfigError};
use crate::buffer::MAX_CAPACITY;

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let agent = &self.agent;

        // Validate intervals
        if agent.interval.is_zero() {
            return Err(ConfigError::InvalidConfig(
                "Agent interval must be greater than 0".to_string(),
            ));
        }
        if agent.flush_interval.is_zero() {
            return Err(ConfigError::InvalidConfig(
                "Flush interval must be greater than 0".to_string(),
            ));
        }
        if agent.precision > agent.interval {
            return Err(ConfigError::InvalidConfig(format!(
                "Precision ({:?}) must not exceed the interval ({:?})",
                agent.precision, agent.interval
            )));
        }

        if self.inputs.is_empty() {
            return Err(ConfigError::InvalidConfig("No inputs configured".to_string()));
        }
        if self.outputs.is_empty() {
            return Err(ConfigError::InvalidConfig("No outputs configured".to_string()));
        }

        for input in &self.inputs {
            if input.name.trim().is_empty() {
                return Err(ConfigError::InvalidConfig(
                    "Input plugin name must not be empty".to_string(),
                ));
            }
            if input.interval.is_some_and(|interval| interval.is_zero()) {
                return Err(ConfigError::InvalidConfig(format!(
                    "Interval of input '{}' must be greater than 0",
                    input.name
                )));
            }
        }

        for output in &self.outputs {
            if output.name.trim().is_empty() {
                return Err(ConfigError::InvalidConfig(
                    "Output plugin name must not be empty".to_string(),
                ));
            }

            // Validate batch size
            let batch_size = output.batch_size(agent);
            if batch_size == 0 {
                return Err(ConfigError::InvalidConfig(format!(
                    "Batch size of output '{}' must be greater than 0",
                    output.name
                )));
            }

            // Validate buffer capacity
            let buffer_limit = output.buffer_limit(agent);
            if buffer_limit < batch_size {
                return Err(ConfigError::InvalidConfig(format!(
                    "Buffer limit ({}) of output '{}' must be at least as large as batch size ({})",
                    buffer_limit, output.name, batch_size
                )));
            }
            if buffer_limit > MAX_CAPACITY {
                return Err(ConfigError::InvalidConfig(format!(
                    "Buffer limit ({}) of output '{}' exceeds {}",
                    buffer_limit, output.name, MAX_CAPACITY
                )));
            }
        }

        Ok(())
    }
}
