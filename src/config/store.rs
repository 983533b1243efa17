// src/config/store.rs

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::de::DeserializeOwned;
use toml::{Table, Value};
use tracing::debug;

use crate::config::path::ConfigPath;
use crate::errors::{AutomateyError, Result};
use crate::fs::{FileSystem, RealFileSystem};

/// Parsed contents of an `automatey.toml`.
///
/// Immutable once loaded; every accessor borrows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
    root: Table,
}

/// Outcome of navigating a [`ConfigPath`] through a [`ConfigTree`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigLookup<'a> {
    Found(&'a Value),
    /// `segment` is the first segment that could not be followed, found at
    /// index `depth` of the path.
    Missing { segment: String, depth: usize },
}

impl<'a> ConfigLookup<'a> {
    pub fn found(self) -> Option<&'a Value> {
        match self {
            ConfigLookup::Found(value) => Some(value),
            ConfigLookup::Missing { .. } => None,
        }
    }
}

impl ConfigTree {
    /// Read and parse a config file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(&RealFileSystem, path)
    }

    pub fn load_with(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs.read_to_string(path).map_err(|source| AutomateyError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let tree = parse(&contents, path)?;
        debug!(path = %path.display(), keys = tree.root.len(), "loaded config");
        Ok(tree)
    }

    pub fn from_table(root: Table) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Table {
        &self.root
    }

    /// Walk `path` segment by segment.
    pub fn lookup(&self, path: &ConfigPath) -> ConfigLookup<'_> {
        let mut segments = path.segments().iter().enumerate();

        let Some((_, first)) = segments.next() else {
            // `ConfigPath` is never empty.
            return ConfigLookup::Missing {
                segment: String::new(),
                depth: 0,
            };
        };
        let Some(mut current) = self.root.get(first) else {
            return ConfigLookup::Missing {
                segment: first.clone(),
                depth: 0,
            };
        };

        for (depth, segment) in segments {
            let next = match current {
                Value::Table(table) => table.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            };
            match next {
                Some(value) => current = value,
                None => {
                    return ConfigLookup::Missing {
                        segment: segment.clone(),
                        depth,
                    };
                }
            }
        }

        ConfigLookup::Found(current)
    }

    /// Value at `path`, or `KeyNotFound` naming the first missing segment.
    pub fn get(&self, path: &ConfigPath) -> Result<&Value> {
        match self.lookup(path) {
            ConfigLookup::Found(value) => Ok(value),
            ConfigLookup::Missing { segment, .. } => Err(AutomateyError::KeyNotFound {
                segment,
                path: path.to_string(),
            }),
        }
    }

    /// Value at `path`, or `default` when any segment is absent.
    pub fn get_or(&self, path: &ConfigPath, default: Value) -> Value {
        self.lookup(path).found().cloned().unwrap_or(default)
    }

    /// Deserialize the subtree at `path` into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, path: &ConfigPath) -> Result<T> {
        let value = self.get(path)?;
        deserialize_value(value, path)
    }

    /// Like [`get_as`](Self::get_as), but an absent path yields `None`.
    pub fn get_as_opt<T: DeserializeOwned>(&self, path: &ConfigPath) -> Result<Option<T>> {
        match self.lookup(path) {
            ConfigLookup::Found(value) => deserialize_value(value, path).map(Some),
            ConfigLookup::Missing { .. } => Ok(None),
        }
    }
}

impl FromStr for ConfigTree {
    type Err = AutomateyError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s, Path::new("<inline>"))
    }
}

fn parse(contents: &str, path: &Path) -> Result<ConfigTree> {
    let root: Table = toml::from_str(contents).map_err(|source| AutomateyError::Parse {
        path: PathBuf::from(path),
        source,
    })?;
    Ok(ConfigTree { root })
}

fn deserialize_value<T: DeserializeOwned>(value: &Value, path: &ConfigPath) -> Result<T> {
    value
        .clone()
        .try_into()
        .map_err(|e: toml::de::Error| AutomateyError::InvalidValue {
            path: path.to_string(),
            message: e.message().to_string(),
        })
}
