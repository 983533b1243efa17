// src/fs/mock.rs

use super::FileSystem;
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Symlink hops followed before `canonicalize` gives up, like `ELOOP`.
const MAX_LINK_HOPS: usize = 40;

#[derive(Debug, Default)]
struct MockState {
    files: HashMap<PathBuf, Vec<u8>>,
    dirs: HashSet<PathBuf>,
    links: HashMap<PathBuf, PathBuf>,
}

/// In-memory filesystem. Paths are expected to be absolute.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let fs = Self::default();
        fs.add_dir("/");
        fs
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref().to_path_buf();
        let mut state = self.lock();
        if let Some(parent) = path.parent() {
            Self::ensure_dirs(&mut state, parent);
        }
        state.files.insert(path, content.into());
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.lock();
        Self::ensure_dirs(&mut state, path.as_ref());
    }

    /// Register `link` as a symlink pointing at the absolute `target`.
    pub fn add_symlink(&self, link: impl AsRef<Path>, target: impl AsRef<Path>) {
        let link = link.as_ref().to_path_buf();
        let mut state = self.lock();
        if let Some(parent) = link.parent() {
            Self::ensure_dirs(&mut state, parent);
        }
        state.links.insert(link, target.as_ref().to_path_buf());
    }

    fn ensure_dirs(state: &mut MockState, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            state.dirs.insert(ancestor.to_path_buf());
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn resolve(state: &MockState, path: &Path) -> io::Result<PathBuf> {
        // Stack of remaining names, next one on top.
        let mut pending: Vec<OsString> = Vec::new();
        push_components(&mut pending, path);

        let mut resolved = PathBuf::from("/");
        let mut hops = 0;

        while let Some(name) = pending.pop() {
            if name == ".." {
                resolved.pop();
                continue;
            }
            let candidate = resolved.join(&name);
            match state.links.get(&candidate) {
                Some(target) => {
                    hops += 1;
                    if hops > MAX_LINK_HOPS {
                        return Err(io::Error::other(format!(
                            "too many levels of symbolic links: {:?}",
                            path
                        )));
                    }
                    resolved = PathBuf::from("/");
                    push_components(&mut pending, target);
                }
                None => resolved = candidate,
            }
        }

        if state.dirs.contains(&resolved) || state.files.contains_key(&resolved) {
            Ok(resolved)
        } else {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file or directory: {:?}", path),
            ))
        }
    }
}

fn push_components(pending: &mut Vec<OsString>, path: &Path) {
    let names: Vec<OsString> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_os_string()),
            Component::ParentDir => Some(OsString::from("..")),
            _ => None,
        })
        .collect();
    pending.extend(names.into_iter().rev());
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let state = self.lock();
        let resolved = Self::resolve(&state, path)?;
        match state.files.get(&resolved) {
            Some(content) => String::from_utf8(content.clone())
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            None => Err(io::Error::other(format!("is a directory: {:?}", path))),
        }
    }

    fn is_file(&self, path: &Path) -> bool {
        let state = self.lock();
        match Self::resolve(&state, path) {
            Ok(resolved) => state.files.contains_key(&resolved),
            Err(_) => false,
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        let state = self.lock();
        match Self::resolve(&state, path) {
            Ok(resolved) => state.dirs.contains(&resolved),
            Err(_) => false,
        }
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        let state = self.lock();
        Self::resolve(&state, path)
    }
}
