//! Unified error handling for cleanarch core.
//!
//! Wraps domain and application errors behind one type with categories and
//! user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for cleanarch core operations.
#[derive(Debug, Error, Clone)]
pub enum CleanArchError {
    /// Errors from the domain layer (invalid requests, metadata, merges).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (pipeline failures).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl CleanArchError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check .cleanarch.toml and CLEANARCH_* environment variables".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in cleanarch".into(),
                "Re-run with -vv and include the log when reporting it".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => e.category().into(),
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Whether the failure happened before anything on disk changed.
    pub fn is_preflight(&self) -> bool {
        match self {
            Self::Domain(_) => true,
            Self::Application(e) => e.is_preflight(),
            Self::Configuration { .. } => true,
            Self::Internal { .. } => false,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    NotFound,
    Configuration,
    Internal,
}

impl From<crate::domain::ErrorCategory> for ErrorCategory {
    fn from(category: crate::domain::ErrorCategory) -> Self {
        use crate::domain::ErrorCategory as Domain;
        match category {
            Domain::Validation => Self::Validation,
            Domain::Compatibility => Self::Compatibility,
            Domain::NotFound => Self::NotFound,
            Domain::Internal => Self::Internal,
        }
    }
}

/// Convenient result type alias.
pub type CleanArchResult<T> = Result<T, CleanArchError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> CleanArchResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> CleanArchResult<T> {
        self.map_err(|e| CleanArchError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn domain_categories_map_through() {
        let err: CleanArchError = DomainError::UnknownRole {
            role: "batch".into(),
            architecture: "onion-single".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.is_preflight());
    }

    #[test]
    fn rollback_failure_is_not_preflight() {
        let err: CleanArchError = ApplicationError::RollbackFailed {
            backup_id: "backup_x".into(),
            backup_path: PathBuf::from("/p/.cleanarch/backups/backup_x"),
            reason: "disk full".into(),
        }
        .into();
        assert!(!err.is_preflight());
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert!(err.suggestions().iter().any(|s| s.contains("backup_x")));
    }

    #[test]
    fn context_wraps_foreign_errors() {
        let io: Result<(), std::io::Error> = Err(std::io::Error::other("boom"));
        let err = io.context("reading settings").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Internal error: reading settings: boom. This is a bug, please report it."
        );
    }
}
