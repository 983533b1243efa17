#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use automatey::ConfigTree;
use tempfile::TempDir;
use toml::{Table, Value};

/// A temporary directory tree for config discovery tests.
///
/// `root()` is canonicalized, so paths compare equal to what the locator
/// returns even where the temp dir sits behind a symlink.
pub struct ProjectTree {
    _dir: TempDir,
    root: PathBuf,
}

impl ProjectTree {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let root = dir.path().canonicalize().expect("canonicalize temp dir");
        Self { _dir: dir, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create (if needed) and return `root/rel`.
    pub fn dir(&self, rel: impl AsRef<Path>) -> PathBuf {
        let path = self.root.join(rel);
        fs::create_dir_all(&path).expect("create dir");
        path
    }

    /// Write `root/rel` with `contents`, creating parent directories.
    pub fn write_file(&self, rel: impl AsRef<Path>, contents: &str) -> PathBuf {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(&path, contents).expect("write file");
        path
    }

    /// Write `automatey.toml` into `root/rel_dir`.
    pub fn write_config(&self, rel_dir: impl AsRef<Path>, contents: &str) -> PathBuf {
        self.write_file(rel_dir.as_ref().join("automatey.toml"), contents)
    }
}

impl Default for ProjectTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `automatey.toml` contents.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    root: Table,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value at a dotted path, creating intermediate tables.
    pub fn with_value(mut self, dotted: &str, value: impl Into<Value>) -> Self {
        let mut segments: Vec<&str> = dotted.split('.').collect();
        let last = segments.pop().expect("non-empty path");

        let mut table = &mut self.root;
        for segment in segments {
            let entry = table
                .entry(segment.to_string())
                .or_insert_with(|| Value::Table(Table::new()));
            table = entry.as_table_mut().expect("intermediate value is a table");
        }
        table.insert(last.to_string(), value.into());
        self
    }

    /// Set `automatey.logging.<key>`.
    pub fn with_logging(self, key: &str, value: impl Into<Value>) -> Self {
        self.with_value(&format!("automatey.logging.{key}"), value)
    }

    /// Append a `[[automatey.dag.tasks]]` entry.
    pub fn with_task(mut self, name: &str, depends_on: &[&str]) -> Self {
        let mut task = Table::new();
        task.insert("name".to_string(), Value::from(name));
        task.insert(
            "depends_on".to_string(),
            Value::Array(depends_on.iter().map(|d| Value::from(*d)).collect()),
        );

        let tasks = self
            .root
            .entry("automatey".to_string())
            .or_insert_with(|| Value::Table(Table::new()))
            .as_table_mut()
            .expect("automatey is a table")
            .entry("dag".to_string())
            .or_insert_with(|| Value::Table(Table::new()))
            .as_table_mut()
            .expect("dag is a table")
            .entry("tasks".to_string())
            .or_insert_with(|| Value::Array(Vec::new()));

        if let Value::Array(items) = tasks {
            items.push(Value::Table(task));
        }
        self
    }

    pub fn build(self) -> String {
        toml::to_string(&self.root).expect("serialize config")
    }

    /// Parse the built text back through automatey's own loader.
    pub fn build_tree(self) -> ConfigTree {
        self.build().parse().expect("built config parses")
    }
}
