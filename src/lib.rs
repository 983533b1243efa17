// src/lib.rs

//! Configuration and logging bootstrap for automation scripts.
//!
//! A script calls [`Automatey::instance`] once (or many times; it is the
//! same instance) to:
//! - find `automatey.toml` in the current directory or a parent,
//! - load it into a [`ConfigTree`],
//! - configure console and optional file logging from `[automatey.logging]`,
//! - start a timer whose guard logs the total run time at the end of `main`.

pub mod cli;
pub mod config;
pub mod errors;
pub mod facade;
pub mod fs;
pub mod instance;
pub mod logging;
pub mod timer;

use anyhow::Result as AnyResult;

pub use crate::config::{ConfigPath, ConfigTree, TaskDeclaration};
pub use crate::errors::{AutomateyError, Result};
pub use crate::facade::{Automatey, AutomateyOptions};
pub use crate::logging::Logger;
pub use crate::timer::ExitTimerGuard;

use crate::cli::CliArgs;

/// High-level entry point used by `main.rs`.
///
/// Builds the shared instance from the CLI flags, holds the exit timer for
/// the duration of the run and reports the declared DAG tasks.
pub fn run(args: CliArgs) -> AnyResult<()> {
    let automatey = Automatey::with_options(args.to_options())?;
    let _timer = automatey.exit_timer();

    report_dag(automatey)?;
    Ok(())
}

/// Log the `[[automatey.dag.tasks]]` entries. Nothing is executed.
fn report_dag(automatey: &Automatey) -> Result<()> {
    let logger = automatey.logger();
    let tasks = automatey.dag_tasks()?;

    if tasks.is_empty() {
        logger.info("No DAG found in the configuration file.");
        return Ok(());
    }

    logger.info(format!(
        "DAG found in {} ({} tasks)",
        automatey.config_location().display(),
        tasks.len()
    ));
    for task in &tasks {
        if task.depends_on.is_empty() {
            logger.info(format!("  - {}", task.name));
        } else {
            logger.info(format!(
                "  - {} (depends on: {})",
                task.name,
                task.depends_on.join(", ")
            ));
        }
    }

    Ok(())
}
