// src/facade.rs

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::de::DeserializeOwned;
use toml::Value;
use tracing::debug;

use crate::config::{
    ConfigPath, ConfigTree, DEFAULT_CONFIG_FILE, DagSection, TaskDeclaration, resolve_config_path,
};
use crate::errors::{AutomateyError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::instance::InstanceCell;
use crate::logging::{self, Logger, ResolvedLogging};
use crate::timer::{ExecutionTimer, ExitTimerGuard};

static INSTANCE: InstanceCell<Automatey> = InstanceCell::new();

/// How the shared [`Automatey`] is built on first use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomateyOptions {
    /// File name searched for upward from `start_dir`, or an absolute path
    /// used as is.
    pub config_file: String,

    /// Directory the search starts in. `None` means the current directory.
    pub start_dir: Option<PathBuf>,

    /// Install console/file sinks from `[automatey.logging]`.
    pub configure_logging: bool,

    /// Log the total run time when the exit guard is dropped.
    pub register_exit_timer: bool,

    /// Level used instead of `automatey.logging.level`.
    pub level_override: Option<String>,
}

impl Default for AutomateyOptions {
    fn default() -> Self {
        Self {
            config_file: DEFAULT_CONFIG_FILE.to_string(),
            start_dir: None,
            configure_logging: true,
            register_exit_timer: true,
            level_override: None,
        }
    }
}

impl AutomateyOptions {
    pub fn config_file(mut self, name: impl Into<String>) -> Self {
        self.config_file = name.into();
        self
    }

    pub fn start_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.start_dir = Some(dir.into());
        self
    }

    pub fn configure_logging(mut self, enabled: bool) -> Self {
        self.configure_logging = enabled;
        self
    }

    pub fn register_exit_timer(mut self, enabled: bool) -> Self {
        self.register_exit_timer = enabled;
        self
    }

    pub fn level_override(mut self, level: impl Into<String>) -> Self {
        self.level_override = Some(level.into());
        self
    }
}

/// Loaded configuration, logging and run timer for one script.
///
/// Use [`Automatey::instance`] (or [`Automatey::with_options`]) to get the
/// process-wide instance:
///
/// ```no_run
/// use automatey::Automatey;
///
/// fn main() -> automatey::Result<()> {
///     let automatey = Automatey::instance()?;
///     let _timer = automatey.exit_timer();
///
///     let level = automatey.get_config_or(&["automatey", "logging", "level"], "INFO")?;
///     automatey.logger().info(format!("running at {level}"));
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Automatey {
    config: ConfigTree,
    config_location: PathBuf,
    logging: Option<ResolvedLogging>,
    logger: Logger,
    timer: ExecutionTimer,
    register_exit_timer: bool,
}

impl Automatey {
    /// The shared instance, built with default options on first call.
    pub fn instance() -> Result<&'static Automatey> {
        Self::with_options(AutomateyOptions::default())
    }

    /// The shared instance. `options` only matter for the call that actually
    /// builds it; once built, every call returns the same instance.
    ///
    /// A failed build leaves nothing behind, so a later call tries again.
    pub fn with_options(options: AutomateyOptions) -> Result<&'static Automatey> {
        INSTANCE.get_or_try_init(|| Self::load(options))
    }

    /// Whether the shared instance has been built in this process.
    pub fn is_initialized() -> bool {
        INSTANCE.is_initialized()
    }

    /// Build an instance that is not shared.
    pub fn load(options: AutomateyOptions) -> Result<Automatey> {
        Self::load_with(&RealFileSystem, options)
    }

    pub fn load_with(fs: &dyn FileSystem, options: AutomateyOptions) -> Result<Automatey> {
        Self::build(fs, options).map_err(AutomateyError::configuration)
    }

    fn build(fs: &dyn FileSystem, options: AutomateyOptions) -> Result<Automatey> {
        let start_dir = match options.start_dir {
            Some(dir) => dir,
            None => std::env::current_dir().map_err(|source| AutomateyError::Io {
                path: PathBuf::from("."),
                source,
            })?,
        };

        let config_location = resolve_config_path(fs, &start_dir, &options.config_file)?;
        let config = ConfigTree::load_with(fs, &config_location)?;

        let (logging, logger) = if options.configure_logging {
            let now = Local::now().naive_local();
            let (resolved, dispatch) =
                logging::configure(&config, options.level_override.as_deref(), &now)?;
            (Some(resolved), Logger::new(dispatch))
        } else {
            (None, Logger::global())
        };

        let timer = ExecutionTimer::start();

        logger.in_scope(|| {
            debug!(
                config = %config_location.display(),
                file_sink = ?logging.as_ref().and_then(|l| l.file.as_ref()).map(|f| &f.path),
                "automatey initialised"
            );
        });

        Ok(Automatey {
            config,
            config_location,
            logging,
            logger,
            timer,
            register_exit_timer: options.register_exit_timer,
        })
    }

    /// Value at `segments`, e.g. `&["automatey", "dag", "tasks"]`.
    pub fn get_config(&self, segments: &[&str]) -> Result<&Value> {
        let path = ConfigPath::new(segments.iter().copied())?;
        self.config.get(&path)
    }

    /// Value at `segments`, or `default` when it is absent.
    ///
    /// An empty path or an empty segment is an `InvalidPath` error, not a
    /// miss.
    pub fn get_config_or(&self, segments: &[&str], default: impl Into<Value>) -> Result<Value> {
        let path = ConfigPath::new(segments.iter().copied())?;
        Ok(self.config.get_or(&path, default.into()))
    }

    /// Deserialize the value at `segments` into `T`.
    pub fn get_config_as<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let path = ConfigPath::new(segments.iter().copied())?;
        self.config.get_as(&path)
    }

    pub fn config(&self) -> &ConfigTree {
        &self.config
    }

    /// Path of the config file that was loaded.
    pub fn config_location(&self) -> &Path {
        &self.config_location
    }

    /// Resolved logging settings; `None` when logging was not configured.
    pub fn logging(&self) -> Option<&ResolvedLogging> {
        self.logging.as_ref()
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Tasks declared under `[[automatey.dag.tasks]]`, in file order.
    pub fn dag_tasks(&self) -> Result<Vec<TaskDeclaration>> {
        let path = ConfigPath::new(["automatey", "dag"])?;
        let dag = self.config.get_as_opt::<DagSection>(&path)?;
        Ok(dag.map(|d| d.tasks).unwrap_or_default())
    }

    pub fn timer(&self) -> &ExecutionTimer {
        &self.timer
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.timer.started_at()
    }

    /// Guard that logs the total run time when dropped.
    ///
    /// Keep it alive for the whole of `main`. Only the first guard handed
    /// out in the process logs; the line is never written twice.
    pub fn exit_timer(&self) -> ExitTimerGuard<'_> {
        if self.register_exit_timer {
            self.timer.guard(&self.logger)
        } else {
            ExecutionTimer::disarmed(&self.logger)
        }
    }

    /// Run `f` while holding the exit guard.
    pub fn scoped<R>(&self, f: impl FnOnce(&Self) -> R) -> R {
        let _timer = self.exit_timer();
        f(self)
    }
}
