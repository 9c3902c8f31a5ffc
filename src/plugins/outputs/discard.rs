use crate::domain::Metric;
use crate::plugins::{Output, PluginError, reject_unknown_options};

pub const NAME: &str = "discard";

/// Accepts every batch and throws it away.
#[derive(Debug, Default)]
pub struct DiscardOutput;

impl DiscardOutput {
    pub fn from_options(options: &toml::Table) -> Result<Box<dyn Output>, PluginError> {
        reject_unknown_options(NAME, options, &[])?;
        Ok(Box::new(Self))
    }
}

impl Output for DiscardOutput {
    fn write(&mut self, _metrics: &[Metric]) -> Result<(), PluginError> {
        Ok(())
    }
}
