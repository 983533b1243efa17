// src/timer.rs

//! Script execution timer.
//!
//! The timer starts when the facade is built. An [`ExitTimerGuard`] taken at
//! the top of `main` logs the total elapsed time when it is dropped, which
//! covers a normal return as well as a panic unwinding through `main`.
//!
//! Only one guard per process is ever armed, however many facades exist.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use tracing::{info, info_span};

use crate::logging::{LOGGER_TARGET, Logger};

/// Set by the first armed guard in the process.
static EXIT_GUARD_ARMED: AtomicBool = AtomicBool::new(false);

#[derive(Debug)]
pub struct ExecutionTimer {
    start: Instant,
    started_at: DateTime<Local>,
    fired: AtomicBool,
}

impl ExecutionTimer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            started_at: Local::now(),
            fired: AtomicBool::new(false),
        }
    }

    /// Wall-clock time the timer was started.
    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Elapsed time on the first call; `None` on every call after that.
    pub fn finish(&self) -> Option<Duration> {
        if self.fired.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(self.elapsed())
        }
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Hand out the exit guard. Only the first guard taken in the process
    /// is armed; later ones, from this timer or any other, do nothing when
    /// dropped.
    pub fn guard<'a>(&'a self, logger: &'a Logger) -> ExitTimerGuard<'a> {
        let armed = !EXIT_GUARD_ARMED.swap(true, Ordering::SeqCst);
        ExitTimerGuard {
            timer: armed.then_some(self),
            logger,
        }
    }

    /// Guard that never logs, for facades built with the timer disabled.
    pub fn disarmed<'a>(logger: &'a Logger) -> ExitTimerGuard<'a> {
        ExitTimerGuard {
            timer: None,
            logger,
        }
    }
}

/// Logs `All tasks complete: <elapsed>` once, when dropped.
#[must_use = "the elapsed time is logged when the guard is dropped"]
#[derive(Debug)]
pub struct ExitTimerGuard<'a> {
    timer: Option<&'a ExecutionTimer>,
    logger: &'a Logger,
}

impl ExitTimerGuard<'_> {
    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }
}

impl Drop for ExitTimerGuard<'_> {
    fn drop(&mut self) {
        let Some(timer) = self.timer.take() else {
            return;
        };
        let logger = self.logger;

        // Panics while logging are swallowed here.
        let _ = panic::catch_unwind(AssertUnwindSafe(|| {
            if let Some(elapsed) = timer.finish() {
                logger.in_scope(|| {
                    let span = info_span!(
                        target: LOGGER_TARGET,
                        "exit_timer",
                        elapsed_ms = elapsed.as_millis() as u64
                    );
                    let _entered = span.enter();
                    info!(target: LOGGER_TARGET, "All tasks complete: {}", format_elapsed(elapsed));
                });
            }
        }));
    }
}

/// Render a duration as `H:MM:SS[.ffffff]`, prefixed with `N day(s), ` past
/// 24 hours. The fraction is left out for whole seconds.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let micros = elapsed.subsec_micros();

    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;

    let clock = if micros == 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{hours}:{minutes:02}:{seconds:02}.{micros:06}")
    };
    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    }
}
