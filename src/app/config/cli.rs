use super::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Agent configuration file
    #[arg(short, long, env = "MECURY_CONFIG", default_value = "mecury.toml")]
    pub config: PathBuf,

    /// Log level (overrides the configuration file)
    #[arg(long, env = "LOG_LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Gather every input once, flush all outputs and exit
    #[arg(long)]
    pub once: bool,
}
