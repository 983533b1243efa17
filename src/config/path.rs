// src/config/path.rs

use std::fmt;
use std::str::FromStr;

use crate::errors::{AutomateyError, Result};

/// An ordered, non-empty sequence of key segments into a [`ConfigTree`].
///
/// `["automatey", "logging", "level"]` and `"automatey.logging.level"` name
/// the same location. A purely numeric segment indexes into an array.
///
/// [`ConfigTree`]: crate::config::ConfigTree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigPath {
    segments: Vec<String>,
}

impl ConfigPath {
    pub fn new<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();

        if segments.is_empty() {
            return Err(AutomateyError::InvalidPath(
                "a config path needs at least one segment".to_string(),
            ));
        }
        if let Some(pos) = segments.iter().position(|s| s.is_empty()) {
            return Err(AutomateyError::InvalidPath(format!(
                "segment {} of '{}' is empty",
                pos,
                segments.join(".")
            )));
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// A new path with `segment` appended.
    pub fn child(&self, segment: impl Into<String>) -> Result<Self> {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self::new(segments)
    }
}

impl FromStr for ConfigPath {
    type Err = AutomateyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s.split('.'))
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}
