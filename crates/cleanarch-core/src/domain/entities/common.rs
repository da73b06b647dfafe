use super::DomainError;
use serde::Serialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A path inside the project tree.
///
/// Invariant: never absolute and never climbs out with `..`. Enforced at
/// construction, so joining it onto a project root stays under that root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RelativePath(PathBuf);

impl RelativePath {
    pub fn try_new(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        if path.is_absolute()
            || path
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(DomainError::AbsolutePathNotAllowed {
                path: path.display().to_string(),
            });
        }
        Ok(Self(normalize(&path)))
    }

    /// Join a segment, maintaining the relative invariant.
    pub fn join(&self, segment: impl AsRef<Path>) -> Result<Self, DomainError> {
        Self::try_new(self.0.join(segment.as_ref()))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// File name, lossy.
    pub fn file_name(&self) -> Option<String> {
        self.0
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

/// Drops `.` components and empty segments from doubled separators.
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_absolute_and_parent_paths() {
        assert!(RelativePath::try_new("/etc/passwd").is_err());
        assert!(RelativePath::try_new("src/../../outside").is_err());
        assert!(RelativePath::try_new("src/main/java").is_ok());
    }

    #[test]
    fn normalizes_current_dir_segments() {
        let path = RelativePath::try_new("./src//main/./java").unwrap();
        assert_eq!(path.as_path(), Path::new("src/main/java"));
        let joined = path.join("Order.java").unwrap();
        assert_eq!(joined.file_name().as_deref(), Some("Order.java"));
    }
}
