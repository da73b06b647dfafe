//! Application layer errors.
//!
//! These errors represent pipeline and I/O failures, not request validity.
//! Business rule violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur while running a generation or managing backups.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApplicationError {
    /// Pre-flight rejected the request; every problem found is listed.
    #[error("Validation failed:\n  - {}", .0.join("\n  - "))]
    ValidationFailed(Vec<String>),

    #[error("Template not found: {id}")]
    TemplateNotFound { id: String },

    #[error("Template '{id}' has a syntax error: {reason}")]
    TemplateSyntax { id: String, reason: String },

    #[error("Template rendering failed for '{template}': {reason}")]
    Rendering { template: String, reason: String },

    #[error("No files specified for backup")]
    NothingToBackUp,

    #[error("Failed to create backup: {reason}")]
    BackupCreation { reason: String },

    #[error("Backup not found: {id} at {}", path.display())]
    BackupNotFound { id: String, path: PathBuf },

    /// A step after the backup failed.
    #[error("{0}")]
    Generation(String),

    /// Restoring a backup failed; the backup is left on disk.
    #[error(
        "Failed to restore backup: {backup_id}. Manual recovery may be required. Backup location: {} ({reason})",
        backup_path.display()
    )]
    RollbackFailed {
        backup_id: String,
        backup_path: PathBuf,
        reason: String,
    },

    #[error("Filesystem error at {}: {reason}", path.display())]
    Filesystem { path: PathBuf, reason: String },

    #[error("Project is not initialized. Run 'cleanarch init' first.")]
    ProjectNotInitialized { root: PathBuf },

    #[error("Project already initialized at {}", path.display())]
    ProjectExists { path: PathBuf },

    #[error("Invalid project configuration at {}: {reason}", path.display())]
    InvalidProjectConfig { path: PathBuf, reason: String },

    /// Shared state lock poisoned (in-memory adapters).
    #[error("Lock poisoned: {resource}")]
    LockPoisoned { resource: &'static str },
}

impl ApplicationError {
    pub fn filesystem(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Filesystem {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ValidationFailed(errors) => vec![
                format!("{} problem(s) found; nothing was written", errors.len()),
                "Fix every listed problem and run the command again".into(),
            ],
            Self::TemplateNotFound { id } => vec![
                format!("Expected template: {}", id),
                "List available templates with: cleanarch templates".into(),
                "Point to another template root with --templates".into(),
            ],
            Self::TemplateSyntax { id, .. } => vec![format!("Fix the template file: {}", id)],
            Self::BackupNotFound { .. } => {
                vec!["List retained backups with: cleanarch backups list".into()]
            }
            Self::RollbackFailed {
                backup_id,
                backup_path,
                ..
            } => vec![
                format!("The backup is still at {}", backup_path.display()),
                format!("Retry with: cleanarch backups restore {}", backup_id),
                "Or copy the files back manually".into(),
            ],
            Self::Filesystem { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::ProjectNotInitialized { root } => vec![
                format!("No .cleanarch.yml found in {}", root.display()),
                "Initialize with: cleanarch init --name <name> --base-package <pkg>".into(),
            ],
            Self::ProjectExists { .. } => vec!["Use --force to overwrite .cleanarch.yml".into()],
            Self::InvalidProjectConfig { path, .. } => {
                vec![format!("Fix or regenerate {}", path.display())]
            }
            Self::LockPoisoned { .. } => vec!["Try again in a moment".into()],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationFailed(_) | Self::ProjectExists { .. } | Self::NothingToBackUp => {
                ErrorCategory::Validation
            }
            Self::TemplateNotFound { .. } | Self::BackupNotFound { .. } => ErrorCategory::NotFound,
            Self::ProjectNotInitialized { .. } | Self::InvalidProjectConfig { .. } => {
                ErrorCategory::Configuration
            }
            Self::TemplateSyntax { .. }
            | Self::Rendering { .. }
            | Self::BackupCreation { .. }
            | Self::Generation(_)
            | Self::RollbackFailed { .. }
            | Self::Filesystem { .. }
            | Self::LockPoisoned { .. } => ErrorCategory::Internal,
        }
    }

    /// Whether the failure happened before anything on disk changed.
    pub fn is_preflight(&self) -> bool {
        matches!(
            self,
            Self::ValidationFailed(_)
                | Self::TemplateNotFound { .. }
                | Self::TemplateSyntax { .. }
                | Self::NothingToBackUp
                | Self::BackupCreation { .. }
                | Self::ProjectNotInitialized { .. }
                | Self::ProjectExists { .. }
                | Self::InvalidProjectConfig { .. }
        )
    }
}
