use super::inputs::{InternalInput, internal};
use super::outputs::{DiscardOutput, StdoutOutput, discard, stdout};
use super::{Input, Output, PluginError};
use std::collections::HashMap;

pub type InputFactory = fn(&toml::Table) -> Result<Box<dyn Input>, PluginError>;
pub type OutputFactory = fn(&toml::Table) -> Result<Box<dyn Output>, PluginError>;

/// Name-to-constructor tables for input and output plugins.
#[derive(Default)]
pub struct PluginRegistry {
    inputs: HashMap<String, InputFactory>,
    outputs: HashMap<String, OutputFactory>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every plugin shipped with the agent.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register_input(internal::NAME, InternalInput::from_options);
        registry.register_output(stdout::NAME, StdoutOutput::from_options);
        registry.register_output(discard::NAME, DiscardOutput::from_options);
        registry
    }

    pub fn register_input(&mut self, name: &str, factory: InputFactory) {
        self.inputs.insert(name.to_string(), factory);
    }

    pub fn register_output(&mut self, name: &str, factory: OutputFactory) {
        self.outputs.insert(name.to_string(), factory);
    }

    pub fn create_input(
        &self,
        name: &str,
        options: &toml::Table,
    ) -> Result<Box<dyn Input>, PluginError> {
        let factory = self
            .inputs
            .get(name)
            .ok_or_else(|| PluginError::UnknownInput(name.to_string()))?;
        factory(options)
    }

    pub fn create_output(
        &self,
        name: &str,
        options: &toml::Table,
    ) -> Result<Box<dyn Output>, PluginError> {
        let factory = self
            .outputs
            .get(name)
            .ok_or_else(|| PluginError::UnknownOutput(name.to_string()))?;
        factory(options)
    }

    pub fn input_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.inputs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn output_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.outputs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
