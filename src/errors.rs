// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AutomateyError {
    #[error("config file '{filename}' not found in {start:?} or any parent directory")]
    NotFound { filename: String, start: PathBuf },

    #[error("malformed TOML in config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config key '{segment}' not found (looking up '{path}')")]
    KeyNotFound { segment: String, path: String },

    #[error("invalid config path: {0}")]
    InvalidPath(String),

    #[error("invalid value at '{path}': {message}")]
    InvalidValue { path: String, message: String },

    #[error("unknown logging level '{0}'")]
    InvalidLevel(String),

    #[error("invalid logging datefmt '{0}'")]
    InvalidDateFormat(String),

    #[error("invalid logging format: {0}")]
    InvalidFormat(String),

    #[error("unsupported log file encoding '{0}' (only utf-8 is supported)")]
    UnsupportedEncoding(String),

    #[error("unsupported log filemode '{0}' (expected a, a+, w or w+)")]
    InvalidFileMode(String),

    #[error("cannot open log file {path:?}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Configuration(Box<AutomateyError>),
}

impl AutomateyError {
    /// Wrap an error raised while building the facade.
    pub fn configuration(inner: AutomateyError) -> Self {
        match inner {
            already @ AutomateyError::Configuration(_) => already,
            other => AutomateyError::Configuration(Box::new(other)),
        }
    }

    /// The underlying error when this is a `Configuration` wrapper.
    pub fn inner(&self) -> &AutomateyError {
        match self {
            AutomateyError::Configuration(inner) => inner,
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, AutomateyError>;
