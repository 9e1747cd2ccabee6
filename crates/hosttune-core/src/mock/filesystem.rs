//! In-memory mock filesystem for testing tuners without touching real `/proc`.
//!
//! Clones of a `MockFs` share the same store, so a tuner reading a pseudo-file
//! and an executor writing it (or writing a script) observe each other.

use crate::fs::FileSystem;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Store {
    /// Map from path to file contents.
    files: HashMap<PathBuf, String>,
    /// Set of directories (for read_dir support).
    directories: HashSet<PathBuf>,
    /// Paths whose writes fail with `PermissionDenied`.
    read_only: HashSet<PathBuf>,
}

impl Store {
    fn add_parents(&mut self, path: &Path) {
        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() {
                self.directories.insert(p.to_path_buf());
            }
            parent = p.parent();
        }
    }
}

/// In-memory filesystem for testing.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    store: Arc<Mutex<Store>>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds (or replaces) a file with the given content.
    ///
    /// Parent directories are automatically created.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        let mut store = self.store();
        store.add_parents(&path);
        store.files.insert(path, content.into());
    }

    /// Adds an empty directory.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut store = self.store();
        store.add_parents(&path);
        store.directories.insert(path);
    }

    /// Removes a file. Returns `true` if it existed.
    pub fn remove(&self, path: impl AsRef<Path>) -> bool {
        self.store().files.remove(path.as_ref()).is_some()
    }

    /// Makes every subsequent write to `path` fail.
    pub fn set_read_only(&self, path: impl AsRef<Path>) {
        self.store().read_only.insert(path.as_ref().to_path_buf());
    }

    /// Returns the content of a file, if present.
    pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.store().files.get(path.as_ref()).cloned()
    }

    /// Loads a mock filesystem from a directory snapshot.
    ///
    /// Files under `dir` are mounted below `mount_point`, e.g. a captured
    /// `sys/` tree mounted at `/proc/sys`.
    pub fn from_snapshot(dir: &Path, mount_point: &Path) -> io::Result<Self> {
        let fs = Self::new();
        load_directory_recursive(&fs, dir, mount_point)?;
        Ok(fs)
    }
}

fn load_directory_recursive(fs: &MockFs, real_path: &Path, virtual_path: &Path) -> io::Result<()> {
    fs.add_dir(virtual_path);

    for entry in std::fs::read_dir(real_path)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let real_child = entry.path();
        let virtual_child = virtual_path.join(entry.file_name());

        if file_type.is_dir() {
            load_directory_recursive(fs, &real_child, &virtual_child)?;
        } else if file_type.is_file() {
            // Skip binary files
            if let Ok(content) = std::fs::read_to_string(&real_child) {
                fs.add_file(&virtual_child, content);
            }
        }
    }
    Ok(())
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.store().files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )
        })
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        let mut store = self.store();
        if store.read_only.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("read-only file: {:?}", path),
            ));
        }
        store.add_parents(path);
        store.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let store = self.store();
        store.files.contains_key(path) || store.directories.contains(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let store = self.store();
        if !store.directories.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("directory not found: {:?}", path),
            ));
        }

        let mut entries = HashSet::new();

        for file_path in store.files.keys() {
            if file_path.parent().is_some_and(|parent| parent == path) {
                entries.insert(file_path.clone());
            }
        }

        for dir_path in &store.directories {
            if dir_path.parent().is_some_and(|parent| parent == path) && dir_path != path {
                entries.insert(dir_path.clone());
            }
        }

        Ok(entries.into_iter().collect())
    }
}
