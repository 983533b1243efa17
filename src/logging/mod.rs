// src/logging/mod.rs

//! Logging setup for automatey using `tracing` + `tracing-subscriber`.
//!
//! Settings come from `[automatey.logging]`. A console sink writing to
//! stdout is always installed; a file sink is added when
//! `enable_file_handler = true`. Both sinks share the configured line
//! template and level.

pub mod format;
mod logger;

use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

use chrono::NaiveDateTime;
use tracing::{Dispatch, Level, debug};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry, fmt};

use crate::config::model::LoggingSettings;
use crate::config::{ConfigPath, ConfigTree};
use crate::errors::{AutomateyError, Result};

pub use format::{LineTemplate, level_name};
pub use logger::Logger;

/// Target used by the facade logger.
pub const LOGGER_TARGET: &str = "automatey";

/// How the log file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    Append,
    Truncate,
}

impl FromStr for FileMode {
    type Err = AutomateyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "a" | "a+" => Ok(FileMode::Append),
            "w" | "w+" => Ok(FileMode::Truncate),
            other => Err(AutomateyError::InvalidFileMode(other.to_string())),
        }
    }
}

/// Concrete file sink target, after placeholder substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileTarget {
    pub path: PathBuf,
    pub mode: FileMode,
}

/// `LoggingSettings` after validation and placeholder substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLogging {
    pub level: Level,
    pub template: LineTemplate,
    pub file: Option<LogFileTarget>,
}

impl LoggingSettings {
    /// Read `[automatey.logging]`; an absent section gives the defaults.
    pub fn from_tree(tree: &ConfigTree) -> Result<Self> {
        let path = ConfigPath::new(["automatey", "logging"])?;
        Ok(tree.get_as_opt::<LoggingSettings>(&path)?.unwrap_or_default())
    }

    /// Validate every setting and fix the log file name against `now`.
    ///
    /// Validation runs even when the file sink is disabled.
    pub fn resolve(&self, now: &NaiveDateTime) -> Result<ResolvedLogging> {
        let level = parse_level(&self.level)?;
        let template = LineTemplate::parse(&self.format, &self.datefmt)?;
        check_encoding(&self.encoding)?;
        let mode: FileMode = self.filemode.parse()?;

        let file = self.enable_file_handler.then(|| LogFileTarget {
            path: PathBuf::from(resolve_filename(&self.filename, now)),
            mode,
        });

        Ok(ResolvedLogging {
            level,
            template,
            file,
        })
    }
}

impl ResolvedLogging {
    /// Build the subscriber for these settings without installing it.
    ///
    /// Opens (and if needed creates the directory for) the log file.
    pub fn build_dispatch(&self) -> Result<Dispatch> {
        let filter = LevelFilter::from_level(self.level);

        let console = fmt::layer()
            .with_ansi(false)
            .with_writer(std::io::stdout)
            .event_format(self.template.clone())
            .with_filter(filter);

        let file = match &self.file {
            Some(target) => {
                let handle = open_log_file(target)?;
                Some(
                    fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(handle))
                        .event_format(self.template.clone())
                        .with_filter(filter),
                )
            }
            None => None,
        };

        let subscriber = Registry::default().with(console).with(file);
        Ok(Dispatch::new(subscriber))
    }
}

/// Resolve settings from `tree`, build the sinks and install them as the
/// process-wide subscriber.
pub fn configure(
    tree: &ConfigTree,
    level_override: Option<&str>,
    now: &NaiveDateTime,
) -> Result<(ResolvedLogging, Dispatch)> {
    let mut settings = LoggingSettings::from_tree(tree)?;
    if let Some(level) = level_override {
        settings.level = level.to_string();
    }

    let resolved = settings.resolve(now)?;
    let dispatch = resolved.build_dispatch()?;
    install(&dispatch);

    Ok((resolved, dispatch))
}

/// Make `dispatch` the global default. Returns `false` if another
/// subscriber was installed first; that one is left in place.
pub fn install(dispatch: &Dispatch) -> bool {
    match tracing::dispatcher::set_global_default(dispatch.clone()) {
        Ok(()) => true,
        Err(_) => {
            tracing::dispatcher::with_default(dispatch, || {
                debug!("a global subscriber is already installed; automatey logs through its own handle only");
            });
            false
        }
    }
}

/// Replace date/time tokens in a log file name template.
///
/// `<YYYY>`, `<MM>`, `<DD>`, `<hh>`, `<mm>`, `<ss>`, `<DATE>` (YYYYMMDD) and
/// `<TIME>` (hhmmss) are supported.
pub fn resolve_filename(template: &str, now: &NaiveDateTime) -> String {
    let tokens = [
        ("<YYYY>", "%Y"),
        ("<MM>", "%m"),
        ("<DD>", "%d"),
        ("<hh>", "%H"),
        ("<mm>", "%M"),
        ("<ss>", "%S"),
        ("<DATE>", "%Y%m%d"),
        ("<TIME>", "%H%M%S"),
    ];

    tokens.iter().fold(template.to_string(), |name, (token, pattern)| {
        if name.contains(token) {
            name.replace(token, &now.format(pattern).to_string())
        } else {
            name
        }
    })
}

/// Map a level name to a tracing level.
///
/// Case-insensitive; accepts both tracing names and the `WARNING`,
/// `CRITICAL`, `FATAL`, `NOTSET` spellings.
pub fn parse_level(s: &str) -> Result<Level> {
    match s.trim().to_lowercase().as_str() {
        "critical" | "fatal" | "error" => Ok(Level::ERROR),
        "warn" | "warning" => Ok(Level::WARN),
        "info" => Ok(Level::INFO),
        "debug" => Ok(Level::DEBUG),
        "trace" | "notset" => Ok(Level::TRACE),
        _ => Err(AutomateyError::InvalidLevel(s.to_string())),
    }
}

fn check_encoding(encoding: &str) -> Result<()> {
    match encoding.trim().to_lowercase().replace('_', "-").as_str() {
        "utf-8" | "utf8" => Ok(()),
        _ => Err(AutomateyError::UnsupportedEncoding(encoding.to_string())),
    }
}

fn open_log_file(target: &LogFileTarget) -> Result<File> {
    let log_error = |source| AutomateyError::LogFile {
        path: target.path.clone(),
        source,
    };

    if let Some(parent) = target.path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(log_error)?;
        }
    }

    let mut options = OpenOptions::new();
    options.create(true);
    match target.mode {
        FileMode::Append => options.append(true),
        FileMode::Truncate => options.write(true).truncate(true),
    };

    options.open(&target.path).map_err(log_error)
}
