//! Agent runtime: wires inputs to output buffers and drives gather and
//! flush schedules.

pub mod accumulator;
pub mod running_input;
pub mod running_output;

pub use accumulator::{Accumulator, GatherContext, InputSettings};
pub use running_input::{GatherReport, RunningInput};
pub use running_output::{FlushReport, OutputHandle, RunningOutput};

use crate::app::config::Config;
use crate::domain::AgentError;
use crate::filter::NameFilter;
use crate::plugins::PluginRegistry;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{self, JoinError, JoinSet};
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

pub struct Agent {
    inputs: Vec<RunningInput>,
    outputs: Vec<RunningOutput>,
    context: Arc<GatherContext>,
    flush_interval: Duration,
}

impl Agent {
    /// Builds every configured plugin.
    ///
    /// The config is validated first, so configs assembled in code get the
    /// same checks as files. Outputs are created before inputs so inputs can
    /// observe their buffers. Any unknown plugin, bad option or uncompilable
    /// filter aborts the build.
    pub fn new(config: &Config, registry: &PluginRegistry) -> Result<Self, AgentError> {
        config.validate()?;

        let mut outputs = Vec::with_capacity(config.outputs.len());
        for output_config in &config.outputs {
            let plugin = registry.create_output(&output_config.name, &output_config.options)?;
            let output = RunningOutput::new(
                output_config.name.clone(),
                plugin,
                output_config.buffer_limit(&config.agent),
                output_config.batch_size(&config.agent),
            )
            .map_err(|source| AgentError::Buffer {
                output: output_config.name.clone(),
                source,
            })?;
            outputs.push(output);
        }
        let handles: Vec<OutputHandle> = outputs.iter().map(RunningOutput::handle).collect();

        let mut inputs = Vec::with_capacity(config.inputs.len());
        for input_config in &config.inputs {
            let plugin = registry.create_input(&input_config.name, &input_config.options)?;
            let filter = NameFilter::compile(&input_config.namepass, &input_config.namedrop)
                .map_err(|source| AgentError::Filter {
                    input: input_config.name.clone(),
                    source,
                })?;
            let settings = InputSettings {
                name_prefix: input_config.name_prefix.clone(),
                name_suffix: input_config.name_suffix.clone(),
                name_override: input_config.name_override.clone(),
                tags: input_config.tags.clone(),
            };
            let mut input = RunningInput::new(
                input_config.name.clone(),
                plugin,
                settings,
                filter,
                input_config.interval.unwrap_or(config.agent.interval),
            );
            input.observe_outputs(&handles);
            inputs.push(input);
        }

        Ok(Self {
            inputs,
            outputs,
            context: Arc::new(GatherContext {
                global_tags: config.tags.clone(),
                precision: config.agent.precision,
            }),
            flush_interval: config.agent.flush_interval,
        })
    }

    pub fn output_handles(&self) -> Vec<OutputHandle> {
        self.outputs.iter().map(RunningOutput::handle).collect()
    }

    /// Gathers every input once, then flushes and closes every output.
    pub fn run_once(mut self) -> Result<(), AgentError> {
        self.connect_outputs()?;
        let handles = self.output_handles();
        for input in &mut self.inputs {
            input.gather(&self.context, &handles);
        }
        self.flush_all();
        self.close_outputs();
        Ok(())
    }

    /// Runs until `cancel` fires, then flushes what is left and closes the
    /// outputs.
    ///
    /// Each input and each output gets its own task. Plugin calls run on the
    /// blocking pool, so a slow write only delays its own output.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<(), AgentError> {
        self.connect_outputs()?;
        let handles: Arc<[OutputHandle]> = self.output_handles().into();

        info!(
            inputs = self.inputs.len(),
            outputs = self.outputs.len(),
            flush_interval = ?self.flush_interval,
            "Agent started"
        );

        let mut gatherers = JoinSet::new();
        for input in self.inputs.drain(..) {
            gatherers.spawn(gather_loop(
                input,
                Arc::clone(&self.context),
                Arc::clone(&handles),
                cancel.clone(),
            ));
        }

        // Outputs keep flushing until every input has stopped, so the final
        // flush sees the last gathered metrics.
        let inputs_stopped = CancellationToken::new();
        let mut flushers = JoinSet::new();
        for output in self.outputs.drain(..) {
            flushers.spawn(flush_loop(
                output,
                self.flush_interval,
                inputs_stopped.clone(),
            ));
        }

        while let Some(result) = gatherers.join_next().await {
            if let Err(e) = result {
                error!(error = %e, "Input task failed");
            }
        }

        info!("Flushing outputs before shutdown");
        inputs_stopped.cancel();
        while let Some(result) = flushers.join_next().await {
            if let Err(e) = result {
                error!(error = %e, "Output task failed");
            }
        }

        info!("Agent stopped");
        Ok(())
    }

    fn connect_outputs(&mut self) -> Result<(), AgentError> {
        for output in &mut self.outputs {
            output.connect()?;
        }
        Ok(())
    }

    fn flush_all(&mut self) {
        for output in &mut self.outputs {
            output.flush();
        }
    }

    fn close_outputs(&mut self) {
        for output in &mut self.outputs {
            if let Err(e) = output.close() {
                warn!(output = %output.name(), error = %e, "Failed to close output");
            }
        }
    }
}

/// Runs `work` on the blocking pool and hands `value` back.
async fn offload<T, F>(mut value: T, work: F) -> Result<T, JoinError>
where
    T: Send + 'static,
    F: FnOnce(&mut T) + Send + 'static,
{
    task::spawn_blocking(move || {
        work(&mut value);
        value
    })
    .await
}

async fn gather_loop(
    mut input: RunningInput,
    context: Arc<GatherContext>,
    outputs: Arc<[OutputHandle]>,
    cancel: CancellationToken,
) {
    let name = input.name().to_string();
    let mut ticker = interval(input.interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let context = Arc::clone(&context);
                let outputs = Arc::clone(&outputs);
                input = match offload(input, move |input| {
                    input.gather(&context, &outputs);
                })
                .await
                {
                    Ok(input) => input,
                    Err(e) => {
                        error!(input = %name, error = %e, "Gather task failed; input stopped");
                        return;
                    }
                };
            }
        }
    }
}

async fn flush_loop(mut output: RunningOutput, period: Duration, stop: CancellationToken) {
    let name = output.name().to_string();
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately; nothing is buffered yet.
    ticker.tick().await;

    loop {
        tokio::select! {
            () = stop.cancelled() => break,
            _ = ticker.tick() => {
                output = match offload(output, |output| {
                    output.flush();
                })
                .await
                {
                    Ok(output) => output,
                    Err(e) => {
                        error!(output = %name, error = %e, "Flush task failed; output stopped");
                        return;
                    }
                };
            }
        }
    }

    let result = offload(output, |output| {
        output.flush();
        if let Err(e) = output.close() {
            warn!(output = %output.name(), error = %e, "Failed to close output");
        }
    })
    .await;
    if let Err(e) = result {
        error!(output = %name, error = %e, "Final flush failed");
    }
}
