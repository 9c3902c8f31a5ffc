pub mod config;
pub mod logging;
pub mod shutdown;

pub use config::{Cli, Config, ConfigError, LogLevel};
pub use logging::{InitializationError, setup_logging};
pub use shutdown::spawn_signal_handler;

use crate::agent::Agent;
use crate::plugins::PluginRegistry;
use clap::Parser;
use std::process;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub struct App {
    config: Config,
    once: bool,
}

impl App {
    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::parse_from(args);
        let mut config = Config::from_file(&cli.config)?;

        // The command line wins over both log settings in the file.
        if let Some(level) = cli.log_level {
            config.common.log_level = level;
            config.common.is_debug = false;
        }

        Ok(Self::from_config(config, cli.once))
    }

    pub fn from_config(config: Config, once: bool) -> Self {
        Self { config, once }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        setup_logging(
            self.config.common.effective_log_level(),
            self.config.common.log_path.as_deref(),
        )?;

        info!("Starting mecury-agent v{}", get_version());
        info!(
            hostname = ?self.config.common.hostname,
            inputs = self.config.inputs.len(),
            outputs = self.config.outputs.len(),
            "Configuration loaded"
        );

        let registry = PluginRegistry::builtin();
        let agent = Agent::new(&self.config, &registry)?;

        if self.once {
            agent.run_once()?;
            return Ok(());
        }

        let cancel = CancellationToken::new();
        spawn_signal_handler(cancel.clone());
        agent.run(cancel).await?;
        Ok(())
    }
}

pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Main entry point for the application
pub async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = match App::from_args(std::env::args()) {
        Ok(app) => app,
        Err(e) => {
            // Logging is configured by the file that failed to load.
            eprintln!("Configuration error: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = app.run().await {
        error!("Agent error: {}", e);
        eprintln!("Agent error: {e}");
        process::exit(1);
    }

    Ok(())
}
