use crate::buffer::{BufferError, BufferStats, MetricBuffer};
use crate::domain::Metric;
use crate::plugins::{Output, PluginError};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Producer-side view of an output: its name and its buffer.
#[derive(Debug, Clone)]
pub struct OutputHandle {
    pub name: String,
    pub buffer: Arc<MetricBuffer<Metric>>,
}

impl OutputHandle {
    pub fn add_metrics(&self, metrics: Vec<Metric>) {
        self.buffer.insert_all(metrics);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub batches: usize,
    pub written: usize,
    pub lost: usize,
    pub new_drops: u64,
}

/// An output plugin together with the buffer feeding it.
pub struct RunningOutput {
    name: String,
    plugin: Box<dyn Output>,
    buffer: Arc<MetricBuffer<Metric>>,
    batch_size: usize,
    last_stats: BufferStats,
    metrics_written: u64,
    write_failures: u64,
}

impl RunningOutput {
    pub fn new(
        name: impl Into<String>,
        plugin: Box<dyn Output>,
        buffer_limit: usize,
        batch_size: usize,
    ) -> Result<Self, BufferError> {
        let buffer = Arc::new(MetricBuffer::new(buffer_limit)?);
        let last_stats = buffer.stats();
        Ok(Self {
            name: name.into(),
            plugin,
            buffer,
            batch_size: batch_size.max(1),
            last_stats,
            metrics_written: 0,
            write_failures: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handle(&self) -> OutputHandle {
        OutputHandle {
            name: self.name.clone(),
            buffer: Arc::clone(&self.buffer),
        }
    }

    pub fn buffer(&self) -> &MetricBuffer<Metric> {
        &self.buffer
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn metrics_written(&self) -> u64 {
        self.metrics_written
    }

    pub fn write_failures(&self) -> u64 {
        self.write_failures
    }

    pub fn connect(&mut self) -> Result<(), PluginError> {
        self.plugin.connect()
    }

    pub fn close(&mut self) -> Result<(), PluginError> {
        self.plugin.close()
    }

    /// Writes what is buffered right now in batches of `batch_size`.
    ///
    /// Only the backlog present at the start is considered, so concurrent
    /// producers cannot keep a flush running. A failed batch is lost and
    /// ends the flush.
    pub fn flush(&mut self) -> FlushReport {
        let stats = self.buffer.stats();
        let mut report = FlushReport {
            new_drops: stats.dropped_since(&self.last_stats),
            ..FlushReport::default()
        };
        self.last_stats = stats;

        if report.new_drops > 0 {
            warn!(
                output = %self.name,
                dropped = report.new_drops,
                capacity = stats.capacity,
                "Metric buffer overflow; oldest metrics were dropped"
            );
        }

        let max_batches = stats.len.div_ceil(self.batch_size);
        for _ in 0..max_batches {
            let batch = self.buffer.drain(self.batch_size);
            if batch.is_empty() {
                break;
            }

            report.batches += 1;
            match self.plugin.write(&batch) {
                Ok(()) => {
                    report.written += batch.len();
                    self.metrics_written += batch.len() as u64;
                }
                Err(e) => {
                    report.lost += batch.len();
                    self.write_failures += 1;
                    error!(
                        output = %self.name,
                        lost = batch.len(),
                        error = %e,
                        "Failed to write batch"
                    );
                    break;
                }
            }
        }

        debug!(
            output = %self.name,
            batches = report.batches,
            written = report.written,
            remaining = self.buffer.len(),
            "Flushed output"
        );
        report
    }
}
