// src/config/mod.rs

//! Configuration discovery and access for automatey.
//!
//! Responsibilities:
//! - Find `automatey.toml` by walking up from a directory (`locator.rs`).
//! - Parse it into an immutable tree with path lookup (`store.rs`, `path.rs`).
//! - Typed views over the sections automatey itself reads (`model.rs`).

pub mod locator;
pub mod model;
pub mod path;
pub mod store;

pub use locator::{DEFAULT_CONFIG_FILE, MAX_ASCENT, locate, locate_with, resolve_config_path};
pub use model::{DagSection, LoggingSettings, TaskDeclaration};
pub use path::ConfigPath;
pub use store::{ConfigLookup, ConfigTree};
