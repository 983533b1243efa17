// src/config/model.rs

use serde::Deserialize;

/// `[automatey.logging]` section as written in the file.
///
/// ```toml
/// [automatey.logging]
/// enable_file_handler = true
/// filename = "./Log/automatey_<YYYY><MM><DD>.log"
/// filemode = "a"
/// format = "%(asctime)s: %(levelname)s: %(message)s"
/// datefmt = "%Y-%m-%d %H:%M:%S"
/// encoding = "utf-8"
/// level = "INFO"
/// ```
///
/// Every key is optional; see the `default_*` functions for fallbacks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingSettings {
    /// Attach a file sink next to the console sink.
    #[serde(default)]
    pub enable_file_handler: bool,

    /// Log file path; may contain `<YYYY>`, `<MM>`, `<DD>`, `<hh>`, `<mm>`,
    /// `<ss>`, `<DATE>` and `<TIME>`.
    #[serde(default = "default_filename")]
    pub filename: String,

    /// `"a"` appends, `"w"` truncates.
    #[serde(default = "default_filemode")]
    pub filemode: String,

    #[serde(default = "default_format")]
    pub format: String,

    /// strftime pattern used for `%(asctime)s`.
    #[serde(default = "default_datefmt")]
    pub datefmt: String,

    #[serde(default = "default_encoding")]
    pub encoding: String,

    #[serde(default = "default_level")]
    pub level: String,
}

pub fn default_filename() -> String {
    "./Log/automatey_<DATE>.log".to_string()
}

pub fn default_filemode() -> String {
    "a".to_string()
}

pub fn default_format() -> String {
    "%(asctime)s: %(levelname)s: %(message)s".to_string()
}

pub fn default_datefmt() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

pub fn default_encoding() -> String {
    "utf-8".to_string()
}

pub fn default_level() -> String {
    "INFO".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            enable_file_handler: false,
            filename: default_filename(),
            filemode: default_filemode(),
            format: default_format(),
            datefmt: default_datefmt(),
            encoding: default_encoding(),
            level: default_level(),
        }
    }
}

/// `[automatey.dag]` section.
///
/// Carried as plain data: nothing here is scheduled, ordered or checked for
/// cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DagSection {
    #[serde(default)]
    pub tasks: Vec<TaskDeclaration>,
}

/// One `[[automatey.dag.tasks]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskDeclaration {
    pub name: String,

    #[serde(default)]
    pub depends_on: Vec<String>,
}
