//! Local filesystem adapter using std::fs.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cleanarch_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{CleanArchError, CleanArchResult},
};
use tracing::debug;
use uuid::Uuid;

/// Production filesystem implementation using `std::fs`.
///
/// Writes go to a sibling temp file that is renamed over the target, so a
/// reader never sees a half-written file.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn read_to_string(&self, path: &Path) -> CleanArchResult<String> {
        fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write_file(&self, path: &Path, content: &str) -> CleanArchResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| map_io_error(parent, e, "create directory"))?;
        }

        let temp = temp_sibling(path);
        fs::write(&temp, content).map_err(|e| map_io_error(&temp, e, "write file"))?;
        if let Err(e) = fs::rename(&temp, path) {
            let _ = fs::remove_file(&temp);
            return Err(map_io_error(path, e, "replace file"));
        }
        debug!(path = %path.display(), "File written");
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> CleanArchResult<()> {
        fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn copy_file(&self, from: &Path, to: &Path) -> CleanArchResult<()> {
        if let Some(parent) = to.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| map_io_error(parent, e, "create directory"))?;
        }
        fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| map_io_error(from, e, "copy file"))
    }

    fn remove_file(&self, path: &Path) -> CleanArchResult<()> {
        fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn remove_dir_all(&self, path: &Path) -> CleanArchResult<()> {
        fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn list_dir(&self, path: &Path) -> CleanArchResult<Vec<PathBuf>> {
        let entries = fs::read_dir(path).map_err(|e| map_io_error(path, e, "read directory"))?;
        let mut children = entries
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_io_error(path, e, "read directory entry"))?;
        children.sort();
        Ok(children)
    }
}

/// `<dir>/.<name>.<uuid>.tmp`
fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4().simple()))
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> CleanArchError {
    ApplicationError::Filesystem {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_creates_parents_and_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let fs_port = LocalFilesystem::new();
        let target = temp.path().join("src/main/resources/application.yml");

        fs_port.write_file(&target, "server:\n  port: 8080\n").unwrap();
        fs_port.write_file(&target, "server:\n  port: 9090\n").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "server:\n  port: 9090\n");
        let siblings = fs_port.list_dir(target.parent().unwrap()).unwrap();
        assert_eq!(siblings, vec![target]);
    }

    #[test]
    fn copy_preserves_exact_bytes() {
        let temp = TempDir::new().unwrap();
        let fs_port = LocalFilesystem::new();
        let source = temp.path().join("build.gradle.kts");
        fs::write(&source, "plugins {\r\n    java\r\n}\r\n").unwrap();

        let dest = temp.path().join("backup/nested/build.gradle.kts");
        fs_port.copy_file(&source, &dest).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), fs::read(&source).unwrap());
    }

    #[test]
    fn missing_file_reports_path() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.txt");
        let err = LocalFilesystem::new().read_to_string(&missing).unwrap_err();
        assert!(err.to_string().contains("nope.txt"));
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[test]
    fn list_dir_is_sorted() {
        let temp = TempDir::new().unwrap();
        for name in ["b", "a", "c"] {
            fs::write(temp.path().join(name), name).unwrap();
        }
        let names: Vec<String> = LocalFilesystem::new()
            .list_dir(temp.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
