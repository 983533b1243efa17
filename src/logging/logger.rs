// src/logging/logger.rs

use std::fmt::Display;

use tracing::{Dispatch, debug, error, info, trace, warn};

use super::LOGGER_TARGET;

/// Handle for emitting records to the sinks automatey configured.
///
/// Records go through the handle's own dispatcher, so they reach the
/// configured sinks even when some other subscriber owns the global default.
/// A handle without a dispatcher logs to whatever is globally installed.
#[derive(Debug, Clone, Default)]
pub struct Logger {
    dispatch: Option<Dispatch>,
}

impl Logger {
    pub fn new(dispatch: Dispatch) -> Self {
        Self {
            dispatch: Some(dispatch),
        }
    }

    /// Logger that uses the global subscriber.
    pub fn global() -> Self {
        Self { dispatch: None }
    }

    /// Run `f` with this logger's dispatcher as the thread default, so plain
    /// `tracing` macros inside it reach the configured sinks.
    pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, f),
            None => f(),
        }
    }

    pub fn trace(&self, message: impl Display) {
        self.in_scope(|| trace!(target: LOGGER_TARGET, "{message}"));
    }

    pub fn debug(&self, message: impl Display) {
        self.in_scope(|| debug!(target: LOGGER_TARGET, "{message}"));
    }

    pub fn info(&self, message: impl Display) {
        self.in_scope(|| info!(target: LOGGER_TARGET, "{message}"));
    }

    pub fn warn(&self, message: impl Display) {
        self.in_scope(|| warn!(target: LOGGER_TARGET, "{message}"));
    }

    pub fn error(&self, message: impl Display) {
        self.in_scope(|| error!(target: LOGGER_TARGET, "{message}"));
    }
}
