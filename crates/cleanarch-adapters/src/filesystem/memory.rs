//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use cleanarch_core::{
    application::{ApplicationError, ports::Filesystem},
    error::CleanArchResult,
};

/// In-memory filesystem for testing.
///
/// Clones share state. Paths registered with [`fail_writes_to`] reject every
/// write and copy aimed at them, which is how rollback paths are exercised.
///
/// [`fail_writes_to`]: MemoryFilesystem::fail_writes_to
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    failing: BTreeSet<PathBuf>,
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    /// Seed a file, creating its parents.
    pub fn add_file(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        if let Ok(mut inner) = self.inner.write() {
            let path = path.into();
            add_ancestors(&mut inner.directories, &path);
            inner.files.insert(path, content.into());
        }
    }

    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Make every later write or copy to `path` fail.
    pub fn fail_writes_to(&self, path: impl Into<PathBuf>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.failing.insert(path.into());
        }
    }

    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            *inner = MemoryFilesystemInner::default();
        }
    }

    fn read(&self) -> CleanArchResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner.read().map_err(|_| {
            ApplicationError::LockPoisoned {
                resource: "memory filesystem",
            }
            .into()
        })
    }

    fn write(&self) -> CleanArchResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner.write().map_err(|_| {
            ApplicationError::LockPoisoned {
                resource: "memory filesystem",
            }
            .into()
        })
    }
}

fn add_ancestors(directories: &mut BTreeSet<PathBuf>, path: &Path) {
    for ancestor in path.ancestors().skip(1) {
        if ancestor.as_os_str().is_empty() {
            break;
        }
        directories.insert(ancestor.to_path_buf());
    }
}

impl Filesystem for MemoryFilesystem {
    fn read_to_string(&self, path: &Path) -> CleanArchResult<String> {
        self.read()?
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| ApplicationError::filesystem(path, "File not found").into())
    }

    fn write_file(&self, path: &Path, content: &str) -> CleanArchResult<()> {
        let mut inner = self.write()?;
        if inner.failing.contains(path) {
            return Err(ApplicationError::filesystem(path, "Injected write failure").into());
        }
        add_ancestors(&mut inner.directories, path);
        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> CleanArchResult<()> {
        let mut inner = self.write()?;
        add_ancestors(&mut inner.directories, path);
        inner.directories.insert(path.to_path_buf());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> CleanArchResult<()> {
        let content = self.read_to_string(from)?;
        self.write_file(to, &content)
    }

    fn remove_file(&self, path: &Path) -> CleanArchResult<()> {
        let mut inner = self.write()?;
        inner
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| ApplicationError::filesystem(path, "File not found").into())
    }

    fn remove_dir_all(&self, path: &Path) -> CleanArchResult<()> {
        let mut inner = self.write()?;
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> CleanArchResult<Vec<PathBuf>> {
        let inner = self.read()?;
        let children: BTreeSet<PathBuf> = inner
            .files
            .keys()
            .chain(inner.directories.iter())
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect();
        Ok(children.into_iter().collect())
    }
}
