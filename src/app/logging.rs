use super::config::LogLevel;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Mutex, OnceLock};
use thiserror::Error;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Error, Debug)]
pub enum InitializationError {
    #[error("Logging initialization failed: {details}")]
    LoggingInitFailed {
        details: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

// Dependency targets held at `warn` when the agent logs more verbosely.
const NOISY_TARGETS: &[&str] = &["tokio", "runtime"];

/// Builds the `EnvFilter` directive string for `level`.
///
/// `RUST_LOG`, when set, replaces it entirely.
pub fn build_filter_string(level: LogLevel) -> String {
    let name = level.as_str();
    let mut filter = format!("{name},mecury_agent={name}");
    if matches!(level, LogLevel::Info | LogLevel::Debug | LogLevel::Trace) {
        for target in NOISY_TARGETS {
            filter.push_str(&format!(",{target}=warn"));
        }
    }
    filter
}

fn build_env_filter(level: LogLevel) -> Result<EnvFilter, InitializationError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let filter_string = build_filter_string(level);
    EnvFilter::try_new(&filter_string).map_err(|e| InitializationError::LoggingInitFailed {
        details: format!("Failed to create EnvFilter with '{filter_string}'"),
        source: Box::new(e),
    })
}

fn initialize_tracing(level: LogLevel, log_path: Option<&Path>) -> Result<(), InitializationError> {
    let env_filter = build_env_filter(level)?;

    let (writer, ansi) = match log_path {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| InitializationError::LoggingInitFailed {
                    details: format!("Failed to open log file {}", path.display()),
                    source: Box::new(e),
                })?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_thread_ids(true)
            .with_level(true)
            .with_ansi(ansi)
            .compact(),
    );

    tracing::subscriber::set_global_default(subscriber).map_err(|e| {
        InitializationError::LoggingInitFailed {
            details: "Failed to set global tracing subscriber".to_string(),
            source: Box::new(e),
        }
    })
}

/// Installs the global subscriber once; later calls return the first outcome.
pub fn setup_logging(level: LogLevel, log_path: Option<&Path>) -> Result<(), InitializationError> {
    static INIT: OnceLock<Result<(), String>> = OnceLock::new();

    let outcome = INIT.get_or_init(|| initialize_tracing(level, log_path).map_err(|e| e.to_string()));

    outcome
        .clone()
        .map_err(|details| InitializationError::LoggingInitFailed {
            details,
            source: Box::new(std::io::Error::other("Logging initialization error")),
        })
}
