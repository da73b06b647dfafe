//! Application layer for cleanarch.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (GenerationOrchestrator, BackupService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. Merge rules, path resolution and validation live
//! in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    BackupService, GenerationOrchestrator, GenerationPlan, GenerationPlanner, GenerationState,
};

pub use ports::{Bindings, Filesystem, ProjectConfigStore, TemplateProvider};

pub use error::ApplicationError;
