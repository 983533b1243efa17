use std::error::Error;
use std::time::Duration;

use automatey::errors::AutomateyError;
use automatey::fs::mock::MockFileSystem;
use automatey::timer::format_elapsed;
use automatey::{Automatey, AutomateyOptions};
use automatey_test_utils::builders::ProjectTree;
use automatey_test_utils::{lines_containing, log_file, project_with_file_log};
use toml::Value;

type TestResult = Result<(), Box<dyn Error>>;

const DONE: &str = "All tasks complete:";

#[test]
fn builds_from_config_found_above_start_dir() -> TestResult {
    let (project, start) = project_with_file_log();

    let automatey = Automatey::load(AutomateyOptions::default().start_dir(&start))?;

    assert_eq!(automatey.config_location(), project.root().join("automatey.toml"));
    assert_eq!(
        automatey.get_config(&["automatey", "custom", "batch_size"])?,
        &Value::Integer(500)
    );

    let log = log_file(&automatey);
    assert!(log.starts_with(project.root().join("Log")));
    assert!(log.exists(), "log file should be created up front");
    assert!(!log.to_string_lossy().contains("<DATE>"));
    Ok(())
}

#[test]
fn get_config_default_policy() -> TestResult {
    let (_project, start) = project_with_file_log();
    let automatey = Automatey::load(AutomateyOptions::default().start_dir(&start))?;

    let workers = automatey.get_config_or(&["automatey", "scheduler", "workers"], 4)?;
    assert_eq!(workers, Value::Integer(4));

    for bad in [&[][..], &["automatey", ""][..]] {
        let err = automatey.get_config_or(bad, 7).unwrap_err();
        assert!(matches!(err, AutomateyError::InvalidPath(_)), "got {:?}", err);
    }

    let err = automatey
        .get_config(&["automatey", "scheduler", "workers"])
        .unwrap_err();
    assert!(
        matches!(&err, AutomateyError::KeyNotFound { segment, .. } if segment == "scheduler"),
        "got {:?}",
        err
    );

    let batch: u32 = automatey.get_config_as(&["automatey", "custom", "batch_size"])?;
    assert_eq!(batch, 500);
    Ok(())
}

#[test]
fn dag_tasks_are_passed_through_in_order() -> TestResult {
    let (_project, start) = project_with_file_log();
    let automatey = Automatey::load(AutomateyOptions::default().start_dir(&start))?;

    let tasks = automatey.dag_tasks()?;
    let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["extract", "transform", "load"]);
    assert_eq!(tasks[2].depends_on, vec!["transform".to_string()]);
    Ok(())
}

#[test]
fn no_dag_section_gives_no_tasks() -> TestResult {
    let project = ProjectTree::new();
    project.write_config("", "[automatey.logging]\nlevel = \"INFO\"\n");

    let automatey = Automatey::load(
        AutomateyOptions::default()
            .start_dir(project.root())
            .configure_logging(false),
    )?;
    assert!(automatey.dag_tasks()?.is_empty());
    assert!(automatey.logging().is_none());
    Ok(())
}

#[test]
fn missing_config_is_configuration_error() {
    let fs = MockFileSystem::new();
    fs.add_dir("/home/ci/job");

    let err = Automatey::load_with(&fs, AutomateyOptions::default().start_dir("/home/ci/job"))
        .unwrap_err();

    assert!(matches!(err, AutomateyError::Configuration(_)), "got {:?}", err);
    assert!(matches!(err.inner(), AutomateyError::NotFound { .. }), "got {:?}", err);
}

#[test]
fn malformed_config_is_configuration_error() {
    let fs = MockFileSystem::new();
    fs.add_file("/home/ci/automatey.toml", "[automatey.logging\n");
    fs.add_dir("/home/ci/job");

    let err = Automatey::load_with(&fs, AutomateyOptions::default().start_dir("/home/ci/job"))
        .unwrap_err();

    assert!(matches!(err.inner(), AutomateyError::Parse { .. }), "got {:?}", err);
}

#[test]
fn bad_logging_level_is_configuration_error() {
    let fs = MockFileSystem::new();
    fs.add_file(
        "/home/ci/automatey.toml",
        "[automatey.logging]\nlevel = \"CHATTY\"\n",
    );

    let err = Automatey::load_with(&fs, AutomateyOptions::default().start_dir("/home/ci"))
        .unwrap_err();

    assert!(matches!(err.inner(), AutomateyError::InvalidLevel(_)), "got {:?}", err);
}

#[test]
fn level_override_replaces_configured_level() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file(
        "/home/ci/automatey.toml",
        "[automatey.logging]\nlevel = \"DEBUG\"\n",
    );

    let automatey = Automatey::load_with(
        &fs,
        AutomateyOptions::default()
            .start_dir("/home/ci")
            .level_override("ERROR"),
    )?;
    assert_eq!(
        automatey.logging().map(|l| l.level),
        Some(tracing::Level::ERROR)
    );
    Ok(())
}

#[test]
fn disabled_exit_timer_logs_nothing() -> TestResult {
    let (_project, start) = project_with_file_log();
    let automatey = Automatey::load(
        AutomateyOptions::default()
            .start_dir(&start)
            .register_exit_timer(false),
    )?;
    let log = log_file(&automatey);

    automatey.scoped(|a| a.logger().info("no timer here"));

    assert!(lines_containing(&log, DONE).is_empty());
    assert_eq!(lines_containing(&log, "no timer here").len(), 1);
    Ok(())
}

#[test]
fn elapsed_is_monotonic_and_non_negative() -> TestResult {
    let (_project, start) = project_with_file_log();
    let automatey = Automatey::load(AutomateyOptions::default().start_dir(&start))?;

    let first = automatey.timer().elapsed();
    std::thread::sleep(Duration::from_millis(5));
    let second = automatey.timer().elapsed();
    assert!(second >= first);
    assert!(automatey.started_at() <= chrono::Local::now());
    Ok(())
}

#[test]
fn elapsed_formats_like_a_clock() {
    assert_eq!(format_elapsed(Duration::from_micros(1_500_000)), "0:00:01.500000");
    assert_eq!(format_elapsed(Duration::from_micros(2)), "0:00:00.000002");
    assert_eq!(format_elapsed(Duration::from_secs(3_723)), "1:02:03");
    assert_eq!(format_elapsed(Duration::ZERO), "0:00:00");
    assert_eq!(format_elapsed(Duration::from_secs(90_000)), "1 day, 1:00:00");
    assert_eq!(
        format_elapsed(Duration::from_millis(2 * 86_400_000 + 5_250)),
        "2 days, 0:00:05.250000"
    );
}
