// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::config::DEFAULT_CONFIG_FILE;
use crate::facade::AutomateyOptions;

/// Command-line arguments for `automatey`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "automatey",
    version,
    about = "Load automatey.toml, configure logging and list the declared DAG.",
    long_about = None
)]
pub struct CliArgs {
    /// Config file name searched for from the current directory upward, or
    /// an absolute path.
    #[arg(long, value_name = "NAME|PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Do not install console/file logging.
    #[arg(long)]
    pub disable_logging: bool,

    /// Do not log the total run time on exit.
    #[arg(long)]
    pub disable_exit_timer: bool,

    /// Logging level, overriding `automatey.logging.level`.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARNING",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }
}

impl CliArgs {
    pub fn to_options(&self) -> AutomateyOptions {
        AutomateyOptions {
            config_file: self.config.clone(),
            start_dir: None,
            configure_logging: !self.disable_logging,
            register_exit_timer: !self.disable_exit_timer,
            level_override: self.log_level.map(|lvl| lvl.as_str().to_string()),
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
