use crate::agent::{Accumulator, OutputHandle};
use crate::domain::Metric;
use crate::plugins::{Input, PluginError, reject_unknown_options};

pub const NAME: &str = "internal";

/// Reports saturation and loss of every output buffer as metrics.
#[derive(Debug, Default)]
pub struct InternalInput {
    outputs: Vec<OutputHandle>,
}

impl InternalInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_options(options: &toml::Table) -> Result<Box<dyn Input>, PluginError> {
        reject_unknown_options(NAME, options, &[])?;
        Ok(Box::new(Self::new()))
    }
}

impl Input for InternalInput {
    fn gather(&mut self, acc: &mut Accumulator<'_>) -> Result<(), PluginError> {
        for output in &self.outputs {
            let stats = output.buffer.stats();
            acc.add_metric(
                Metric::new("internal_buffer")
                    .with_tag("output", output.name.as_str())
                    .with_field("len", stats.len)
                    .with_field("capacity", stats.capacity)
                    .with_field("total", stats.total)
                    .with_field("dropped", stats.dropped)
                    .with_field("fill_ratio", stats.fill_ratio()),
            );
        }
        Ok(())
    }

    fn observe_outputs(&mut self, outputs: &[OutputHandle]) {
        self.outputs = outputs.to_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{GatherContext, InputSettings};
    use crate::buffer::MetricBuffer;
    use crate::domain::FieldValue;
    use crate::filter::NameFilter;
    use std::sync::Arc;

    #[test]
    fn test_reports_each_observed_buffer() {
        let buffer = Arc::new(MetricBuffer::new(2).unwrap());
        buffer.insert_all((0..3).map(|i| Metric::new(format!("m{i}"))));
        let handle = OutputHandle {
            name: "stdout".to_string(),
            buffer,
        };

        let mut input = InternalInput::new();
        input.observe_outputs(&[handle]);

        let settings = InputSettings::default();
        let filter = NameFilter::default();
        let context = GatherContext::default();
        let mut acc = Accumulator::new(NAME, &settings, &filter, &context);
        input.gather(&mut acc).unwrap();

        let metrics = acc.into_metrics();
        assert_eq!(metrics.len(), 1);
        let metric = &metrics[0];
        assert_eq!(metric.name, "internal_buffer");
        assert_eq!(metric.tags["output"], "stdout");
        assert_eq!(metric.fields["capacity"], FieldValue::from(2usize));
        assert_eq!(metric.fields["total"], FieldValue::from(3u64));
        assert_eq!(metric.fields["dropped"], FieldValue::from(1u64));
    }

    #[test]
    fn test_rejects_unknown_option() {
        let mut options = toml::Table::new();
        options.insert("verbose".to_string(), toml::Value::Boolean(true));
        assert!(matches!(
            InternalInput::from_options(&options),
            Err(PluginError::InvalidOption { .. })
        ));
    }
}
