use crate::domain::{FieldValue, Metric};
use crate::filter::NameFilter;
use crate::plugins::PluginError;
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::warn;

/// Naming and tagging rules applied to everything an input produces.
#[derive(Debug, Clone, Default)]
pub struct InputSettings {
    pub name_prefix: String,
    pub name_suffix: String,
    pub name_override: Option<String>,
    pub tags: BTreeMap<String, String>,
}

impl InputSettings {
    fn rename(&self, name: &str) -> String {
        match &self.name_override {
            Some(name_override) => name_override.clone(),
            None => format!("{}{}{}", self.name_prefix, name, self.name_suffix),
        }
    }
}

/// Agent-wide values every gather needs.
#[derive(Debug, Clone, Default)]
pub struct GatherContext {
    pub global_tags: BTreeMap<String, String>,
    pub precision: Duration,
}

/// Collects the metrics of one gather call.
///
/// Names are checked against the input's filter before any renaming, so
/// `namepass` / `namedrop` patterns are written against the names the plugin
/// emits.
pub struct Accumulator<'a> {
    input: &'a str,
    settings: &'a InputSettings,
    filter: &'a NameFilter,
    context: &'a GatherContext,
    metrics: Vec<Metric>,
    filtered: usize,
    errors: usize,
}

impl<'a> Accumulator<'a> {
    pub fn new(
        input: &'a str,
        settings: &'a InputSettings,
        filter: &'a NameFilter,
        context: &'a GatherContext,
    ) -> Self {
        Self {
            input,
            settings,
            filter,
            context,
            metrics: Vec::new(),
            filtered: 0,
            errors: 0,
        }
    }

    pub fn add_metric(&mut self, mut metric: Metric) {
        if !self.filter.should_pass(&metric.name) {
            self.filtered += 1;
            return;
        }

        metric.name = self.settings.rename(&metric.name);
        for (key, value) in &self.settings.tags {
            metric.tag_if_absent(key, value);
        }
        for (key, value) in &self.context.global_tags {
            metric.tag_if_absent(key, value);
        }
        metric.timestamp = truncate(metric.timestamp, self.context.precision);

        self.metrics.push(metric);
    }

    pub fn add_fields<F>(
        &mut self,
        name: &str,
        fields: F,
        tags: BTreeMap<String, String>,
        timestamp: Option<DateTime<Utc>>,
    ) where
        F: IntoIterator<Item = (String, FieldValue)>,
    {
        let metric = Metric {
            name: name.to_string(),
            tags,
            fields: fields.into_iter().collect(),
            timestamp: timestamp.unwrap_or_else(Utc::now),
        };
        self.add_metric(metric);
    }

    pub fn add_error(&mut self, error: &PluginError) {
        self.errors += 1;
        warn!(input = %self.input, error = %error, "Error in input plugin");
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn filtered(&self) -> usize {
        self.filtered
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn into_metrics(self) -> Vec<Metric> {
        self.metrics
    }
}

fn truncate(timestamp: DateTime<Utc>, precision: Duration) -> DateTime<Utc> {
    if precision.is_zero() {
        return timestamp;
    }
    TimeDelta::from_std(precision)
        .ok()
        .and_then(|step| timestamp.duration_trunc(step).ok())
        .unwrap_or(timestamp)
}
