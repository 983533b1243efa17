pub mod builders;

use std::path::{Path, PathBuf};
use std::sync::Once;

use automatey::Automatey;
use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Tests that need automatey to own the global subscriber must not call this.
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Lines of a log file containing `needle`.
pub fn lines_containing(path: &Path, needle: &str) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .filter(|line| line.contains(needle))
        .map(str::to_string)
        .collect()
}

/// Project whose config writes a DEBUG log to `<root>/Log/automatey_<DATE>.log`
/// and declares a three-task DAG. Returns the tree and a start directory two
/// levels below the config.
pub fn project_with_file_log() -> (builders::ProjectTree, PathBuf) {
    let project = builders::ProjectTree::new();
    let template = project.root().join("Log").join("automatey_<DATE>.log");
    let contents = builders::ConfigBuilder::new()
        .with_logging("enable_file_handler", true)
        .with_logging("filename", template.to_string_lossy().into_owned())
        .with_logging("level", "DEBUG")
        .with_task("extract", &[])
        .with_task("transform", &["extract"])
        .with_task("load", &["transform"])
        .with_value("automatey.custom.batch_size", 500)
        .build();
    project.write_config("", &contents);
    let start = project.dir("jobs/daily");
    (project, start)
}

/// Path of the file sink a facade was configured with.
pub fn log_file(automatey: &Automatey) -> PathBuf {
    automatey
        .logging()
        .and_then(|l| l.file.as_ref())
        .map(|f| f.path.clone())
        .expect("file sink configured")
}
