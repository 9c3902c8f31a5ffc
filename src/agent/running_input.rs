use super::accumulator::{Accumulator, GatherContext, InputSettings};
use super::running_output::OutputHandle;
use crate::filter::NameFilter;
use crate::plugins::Input;
use std::time::Duration;
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GatherReport {
    pub produced: usize,
    pub filtered: usize,
    pub failed: bool,
}

/// An input plugin with its naming rules, name filter and interval.
pub struct RunningInput {
    name: String,
    plugin: Box<dyn Input>,
    settings: InputSettings,
    filter: NameFilter,
    interval: Duration,
}

impl RunningInput {
    pub fn new(
        name: impl Into<String>,
        plugin: Box<dyn Input>,
        settings: InputSettings,
        filter: NameFilter,
        interval: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            plugin,
            settings,
            filter,
            interval,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn observe_outputs(&mut self, outputs: &[OutputHandle]) {
        self.plugin.observe_outputs(outputs);
    }

    /// Runs one gather and copies the result into every output buffer.
    pub fn gather(&mut self, context: &GatherContext, outputs: &[OutputHandle]) -> GatherReport {
        let mut acc = Accumulator::new(&self.name, &self.settings, &self.filter, context);
        let failed = match self.plugin.gather(&mut acc) {
            Ok(()) => false,
            Err(e) => {
                error!(input = %self.name, error = %e, "Gather failed");
                true
            }
        };

        let report = GatherReport {
            produced: acc.len(),
            filtered: acc.filtered(),
            failed,
        };
        let metrics = acc.into_metrics();

        if let Some((last, rest)) = outputs.split_last() {
            for output in rest {
                output.add_metrics(metrics.clone());
            }
            last.add_metrics(metrics);
        }

        debug!(
            input = %self.name,
            produced = report.produced,
            filtered = report.filtered,
            "Gathered metrics"
        );
        report
    }
}
