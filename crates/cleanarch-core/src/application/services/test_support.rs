//! In-memory filesystem double for service tests.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::application::{ApplicationError, ports::Filesystem};
use crate::error::CleanArchResult;

#[derive(Default)]
struct State {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
    failing: BTreeSet<PathBuf>,
    writes: usize,
}

#[derive(Default)]
pub struct FakeFilesystem {
    state: Mutex<State>,
}

impl FakeFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, path: impl Into<PathBuf>, content: &str) {
        let path = path.into();
        let mut state = self.state.lock().unwrap();
        add_parents(&mut state.dirs, &path);
        state.files.insert(path, content.to_string());
    }

    pub fn content(&self, path: impl AsRef<Path>) -> Option<String> {
        self.state.lock().unwrap().files.get(path.as_ref()).cloned()
    }

    /// Files below `prefix`.
    pub fn paths_under(&self, prefix: impl AsRef<Path>) -> Vec<PathBuf> {
        let state = self.state.lock().unwrap();
        state
            .files
            .keys()
            .filter(|p| p.starts_with(prefix.as_ref()))
            .cloned()
            .collect()
    }

    /// Every write or copy targeting `path`, or anything below it, fails from
    /// now on.
    pub fn fail_writes_to(&self, path: impl Into<PathBuf>) {
        self.state.lock().unwrap().failing.insert(path.into());
    }

    pub fn write_count(&self) -> usize {
        self.state.lock().unwrap().writes
    }

    pub fn snapshot(&self) -> BTreeMap<PathBuf, String> {
        self.state.lock().unwrap().files.clone()
    }
}

fn add_parents(dirs: &mut BTreeSet<PathBuf>, path: &Path) {
    let mut current = path.parent();
    while let Some(dir) = current {
        if dir.as_os_str().is_empty() {
            break;
        }
        dirs.insert(dir.to_path_buf());
        current = dir.parent();
    }
}

fn injected(path: &Path) -> crate::error::CleanArchError {
    ApplicationError::filesystem(path, "injected failure").into()
}

impl Filesystem for FakeFilesystem {
    fn read_to_string(&self, path: &Path) -> CleanArchResult<String> {
        self.content(path)
            .ok_or_else(|| ApplicationError::filesystem(path, "not found").into())
    }

    fn write_file(&self, path: &Path, content: &str) -> CleanArchResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.failing.iter().any(|p| path.starts_with(p)) {
            return Err(injected(path));
        }
        add_parents(&mut state.dirs, path);
        state.files.insert(path.to_path_buf(), content.to_string());
        state.writes += 1;
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> CleanArchResult<()> {
        let mut state = self.state.lock().unwrap();
        add_parents(&mut state.dirs, path);
        state.dirs.insert(path.to_path_buf());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        state.files.contains_key(path) || state.dirs.contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.state.lock().unwrap().dirs.contains(path)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> CleanArchResult<()> {
        let content = self.read_to_string(from)?;
        self.write_file(to, &content)
    }

    fn remove_file(&self, path: &Path) -> CleanArchResult<()> {
        let mut state = self.state.lock().unwrap();
        match state.files.remove(path) {
            Some(_) => Ok(()),
            None => Err(ApplicationError::filesystem(path, "not found").into()),
        }
    }

    fn remove_dir_all(&self, path: &Path) -> CleanArchResult<()> {
        let mut state = self.state.lock().unwrap();
        state.files.retain(|p, _| !p.starts_with(path));
        state.dirs.retain(|p| !p.starts_with(path));
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> CleanArchResult<Vec<PathBuf>> {
        let state = self.state.lock().unwrap();
        let children: BTreeSet<PathBuf> = state
            .files
            .keys()
            .chain(state.dirs.iter())
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect();
        Ok(children.into_iter().collect())
    }
}
