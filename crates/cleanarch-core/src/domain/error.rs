// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (results are collected and re-reported)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown {kind} '{value}'. Valid values: {expected}")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Malformed {what} '{input}': {reason}")]
    ParseFailed {
        what: &'static str,
        input: String,
        reason: String,
    },

    #[error("{0} cannot be null")]
    NullDocument(&'static str),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    // ========================================================================
    // Architecture Errors
    // ========================================================================
    #[error("No adapter path defined for type '{role}' in architecture '{architecture}'")]
    UnknownRole { role: String, architecture: String },

    #[error(
        "Architecture '{architecture}' is multi-module but no module was specified. Available modules: {modules}"
    )]
    ModuleRequired {
        architecture: String,
        modules: String,
    },

    #[error("Layer '{from}' cannot depend on layer '{to}'. Allowed dependencies: {allowed}")]
    LayerViolation {
        from: String,
        to: String,
        allowed: String,
    },

    #[error("Invalid metadata for '{subject}': {reason}")]
    InvalidMetadata { subject: String, reason: String },

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidRequest(msg) => vec![
                "Check the generation arguments".into(),
                format!("Details: {}", msg),
            ],
            Self::UnknownVariant { kind, expected, .. } => vec![
                format!("Use one of the supported {} values: {}", kind, expected),
            ],
            Self::ParseFailed { what, .. } => match *what {
                "field" => vec!["Fields use the form name:Type, e.g. id:String,email:String?".into()],
                "method" => vec![
                    "Methods use the form name:ReturnType[:param:Type]*, separated by '|'".into(),
                ],
                "endpoint" => vec![
                    "Endpoints use the form /path:METHOD:useCaseMethod:ReturnType[:name:PATH|BODY|QUERY:Type]*"
                        .into(),
                ],
                _ => vec!["Check the input format".into()],
            },
            Self::UnknownRole { architecture, .. } => vec![
                format!("Check architectures/{}/structure.yml", architecture),
                "Declare the role under 'adapterPaths'".into(),
            ],
            Self::ModuleRequired { modules, .. } => vec![
                format!("Pick one of the declared modules: {}", modules),
            ],
            Self::InvalidMetadata { subject, .. } => vec![
                format!("Metadata for '{}' is incomplete", subject),
                "Validate your templates with: cleanarch templates".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidRequest(_)
            | Self::UnknownVariant { .. }
            | Self::ParseFailed { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::InvalidDocument(_)
            | Self::MissingRequiredField { .. } => ErrorCategory::Validation,
            Self::ModuleRequired { .. } | Self::LayerViolation { .. } => {
                ErrorCategory::Compatibility
            }
            Self::UnknownRole { .. } => ErrorCategory::NotFound,
            Self::InvalidMetadata { .. } | Self::NullDocument(_) => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    NotFound,
    Internal,
}
