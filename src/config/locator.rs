// src/config/locator.rs

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{AutomateyError, Result};
use crate::fs::{FileSystem, RealFileSystem};

/// Default config file name searched for.
pub const DEFAULT_CONFIG_FILE: &str = "automatey.toml";

/// Upper bound on directories visited when the start cannot be
/// canonicalized and the walk follows the path as given.
pub const MAX_ASCENT: usize = 256;

/// Search `start` and then each of its ancestors for a file called
/// `filename`. Returns `None` once the filesystem root has been checked.
pub fn locate(start: impl AsRef<Path>, filename: &str) -> Option<PathBuf> {
    locate_with(&RealFileSystem, start, filename)
}

/// Same as [`locate`], going through the given filesystem.
///
/// `start` is canonicalized first so the walk follows the physical parent
/// chain up to the root. If that fails the path is walked as given, for at
/// most [`MAX_ASCENT`] levels.
pub fn locate_with(fs: &dyn FileSystem, start: impl AsRef<Path>, filename: &str) -> Option<PathBuf> {
    let start = start.as_ref();
    let (origin, limit) = match fs.canonicalize(start) {
        Ok(canonical) => (canonical, usize::MAX),
        Err(err) => {
            debug!(start = %start.display(), %err, "cannot canonicalize search start; walking it as given");
            (start.to_path_buf(), MAX_ASCENT)
        }
    };

    for dir in origin.ancestors().take(limit) {
        if dir.as_os_str().is_empty() {
            continue;
        }
        let candidate = dir.join(filename);
        if fs.is_file(&candidate) {
            debug!(path = %candidate.display(), "found config file");
            return Some(candidate);
        }
    }

    debug!(start = %origin.display(), filename, "config file not found");
    None
}

/// Resolve the config file named by `name`.
///
/// An absolute `name` is used directly. Anything else is searched for from
/// `start` upward; no match is a `NotFound` error.
pub fn resolve_config_path(fs: &dyn FileSystem, start: &Path, name: &str) -> Result<PathBuf> {
    let as_path = Path::new(name);
    if as_path.is_absolute() {
        return if fs.is_file(as_path) {
            Ok(as_path.to_path_buf())
        } else {
            Err(AutomateyError::NotFound {
                filename: name.to_string(),
                start: as_path.parent().map(Path::to_path_buf).unwrap_or_default(),
            })
        };
    }

    locate_with(fs, start, name).ok_or_else(|| AutomateyError::NotFound {
        filename: name.to_string(),
        start: start.to_path_buf(),
    })
}
