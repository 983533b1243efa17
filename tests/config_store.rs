use std::error::Error;

use automatey::config::{ConfigLookup, ConfigPath, ConfigTree, TaskDeclaration};
use automatey::errors::AutomateyError;
use automatey_test_utils::builders::{ConfigBuilder, ProjectTree};
use toml::Value;

type TestResult = Result<(), Box<dyn Error>>;

const SAMPLE: &str = r#"
[automatey.logging]
enable_file_handler = true
filename = "./Log/automatey_<YYYY><MM><DD>.log"
level = "INFO"

[automatey.dag]
[[automatey.dag.tasks]]
name = "extract"
depends_on = []

[[automatey.dag.tasks]]
name = "load"
depends_on = ["extract"]
"#;

fn path(dotted: &str) -> ConfigPath {
    dotted.parse().expect("valid path")
}

#[test]
fn value_written_at_path_reads_back() -> TestResult {
    let tree = ConfigBuilder::new()
        .with_value("automatey.custom.retries", 3)
        .with_value("automatey.custom.owner", "ops")
        .with_value("automatey.custom.dry_run", true)
        .build_tree();

    assert_eq!(tree.get(&path("automatey.custom.retries"))?, &Value::Integer(3));
    assert_eq!(tree.get(&path("automatey.custom.owner"))?.as_str(), Some("ops"));
    assert_eq!(tree.get(&path("automatey.custom.dry_run"))?.as_bool(), Some(true));
    Ok(())
}

#[test]
fn loads_file_from_disk() -> TestResult {
    let project = ProjectTree::new();
    let file = project.write_config("", SAMPLE);

    let tree = ConfigTree::load(&file)?;
    let level = tree.get(&path("automatey.logging.level"))?;
    assert_eq!(level.as_str(), Some("INFO"));
    Ok(())
}

#[test]
fn missing_key_without_default_names_first_missing_segment() -> TestResult {
    let tree: ConfigTree = SAMPLE.parse()?;

    let err = tree.get(&path("automatey.scheduler.workers")).unwrap_err();
    match err {
        AutomateyError::KeyNotFound { segment, path } => {
            assert_eq!(segment, "scheduler");
            assert_eq!(path, "automatey.scheduler.workers");
        }
        other => panic!("expected KeyNotFound, got {:?}", other),
    }
    Ok(())
}

#[test]
fn missing_key_with_default_returns_default() -> TestResult {
    let tree: ConfigTree = SAMPLE.parse()?;

    let value = tree.get_or(&path("automatey.scheduler.workers"), Value::Integer(1));
    assert_eq!(value, Value::Integer(1));

    // Present keys ignore the default.
    let value = tree.get_or(&path("automatey.logging.level"), Value::from("DEBUG"));
    assert_eq!(value.as_str(), Some("INFO"));
    Ok(())
}

#[test]
fn scalar_in_the_middle_of_a_path_is_missing() -> TestResult {
    let tree: ConfigTree = SAMPLE.parse()?;

    match tree.lookup(&path("automatey.logging.level.extra")) {
        ConfigLookup::Missing { segment, depth } => {
            assert_eq!(segment, "extra");
            assert_eq!(depth, 3);
        }
        other => panic!("expected Missing, got {:?}", other),
    }
    Ok(())
}

#[test]
fn numeric_segments_index_arrays() -> TestResult {
    let tree: ConfigTree = SAMPLE.parse()?;

    let name = tree.get(&path("automatey.dag.tasks.1.name"))?;
    assert_eq!(name.as_str(), Some("load"));

    let out_of_range = tree.lookup(&path("automatey.dag.tasks.7.name"));
    assert!(matches!(out_of_range, ConfigLookup::Missing { depth: 3, .. }));
    Ok(())
}

#[test]
fn tasks_deserialize_as_inert_declarations() -> TestResult {
    let tree: ConfigTree = SAMPLE.parse()?;

    let tasks: Vec<TaskDeclaration> = tree.get_as(&path("automatey.dag.tasks"))?;
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].name, "extract");
    assert!(tasks[0].depends_on.is_empty());
    assert_eq!(tasks[1].depends_on, vec!["extract".to_string()]);
    Ok(())
}

#[test]
fn cyclic_dependencies_are_carried_unchecked() -> TestResult {
    let tree = ConfigBuilder::new()
        .with_task("a", &["b"])
        .with_task("b", &["a"])
        .build_tree();

    let tasks: Vec<TaskDeclaration> = tree.get_as(&path("automatey.dag.tasks"))?;
    assert_eq!(tasks.len(), 2);
    Ok(())
}

#[test]
fn wrong_type_is_invalid_value() -> TestResult {
    let tree: ConfigTree = SAMPLE.parse()?;

    let err = tree
        .get_as::<Vec<String>>(&path("automatey.logging.level"))
        .unwrap_err();
    assert!(matches!(err, AutomateyError::InvalidValue { .. }), "got {:?}", err);
    Ok(())
}

#[test]
fn malformed_toml_is_parse_error() {
    let project = ProjectTree::new();
    let file = project.write_config("", "[automatey\nlevel = ");

    let err = ConfigTree::load(&file).unwrap_err();
    match err {
        AutomateyError::Parse { path, .. } => assert_eq!(path, file),
        other => panic!("expected Parse, got {:?}", other),
    }
}

#[test]
fn unreadable_file_is_io_error() {
    let project = ProjectTree::new();
    let missing = project.root().join("nope.toml");

    let err = ConfigTree::load(&missing).unwrap_err();
    assert!(matches!(err, AutomateyError::Io { .. }), "got {:?}", err);
}

#[test]
fn empty_segments_are_rejected() {
    assert!(matches!(
        ConfigPath::new(Vec::<String>::new()),
        Err(AutomateyError::InvalidPath(_))
    ));
    assert!(matches!(
        "automatey..level".parse::<ConfigPath>(),
        Err(AutomateyError::InvalidPath(_))
    ));
}

#[test]
fn path_displays_dotted() -> TestResult {
    let p = ConfigPath::new(["automatey", "logging"])?.child("level")?;
    assert_eq!(p.to_string(), "automatey.logging.level");
    assert_eq!(p.segments().len(), 3);
    Ok(())
}
