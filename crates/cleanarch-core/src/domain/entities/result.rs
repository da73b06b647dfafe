use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// How a file ended up on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
    Created,
    Merged,
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Created => "created",
            Self::Merged => "merged",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFile {
    /// Relative to the project root.
    pub path: PathBuf,
    pub content: String,
    pub action: FileAction,
}

impl GeneratedFile {
    pub fn created(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            action: FileAction::Created,
        }
    }

    pub fn merged(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            action: FileAction::Merged,
        }
    }
}

/// Where a failed run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    /// Pre-flight validation refused the request.
    Validation,
    /// The backup could not be taken; nothing was written.
    Backup,
    /// Writing had started and was rolled back.
    Generation,
}

impl FailureStage {
    /// True when the project on disk is exactly as before the run.
    pub fn left_project_untouched(self) -> bool {
        !matches!(self, Self::Generation)
    }
}

/// Outcome of one orchestrator run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub success: bool,
    pub files: Vec<GeneratedFile>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Set on failure only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_at: Option<FailureStage>,
}

impl GenerationResult {
    pub fn success(files: Vec<GeneratedFile>, warnings: Vec<String>) -> Self {
        Self {
            success: true,
            files,
            errors: Vec::new(),
            warnings,
            failed_at: None,
        }
    }

    pub fn failure(stage: FailureStage, errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            success: false,
            files: Vec::new(),
            errors,
            warnings,
            failed_at: Some(stage),
        }
    }

    pub fn file(&self, path: impl AsRef<std::path::Path>) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == path.as_ref())
    }
}
