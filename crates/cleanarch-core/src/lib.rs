//! cleanarch Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the cleanarch
//! code generator: it adds entities, use cases and adapters to an existing
//! Java/Gradle project and either commits every change or none of them.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           cleanarch-cli (CLI)           │
//! │   (Builds GenerationRequest values)     │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (GenerationOrchestrator, BackupService) │
//! │   Validate → Back up → Generate → Commit│
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │ (Filesystem, TemplateProvider, Config)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │   cleanarch-adapters (Infrastructure)   │
//! │ (LocalFilesystem, Tera templates, YAML) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (PathResolver, mergers, validators)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cleanarch_core::prelude::*;
//!
//! # fn run(
//! #     filesystem: Arc<dyn Filesystem>,
//! #     templates: Arc<dyn TemplateProvider>,
//! #     projects: Arc<dyn ProjectConfigStore>,
//! # ) {
//! let orchestrator = GenerationOrchestrator::new(filesystem, templates, projects);
//!
//! let request = GenerationRequest::new(
//!     "./shop",
//!     AdapterSpec::new("OrderCache", AdapterType::Redis, "Order"),
//! );
//! let result = orchestrator.generate(&request);
//! for error in &result.errors {
//!     eprintln!("{error}");
//! }
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        BackupService, GenerationOrchestrator,
        ports::{Bindings, Filesystem, ProjectConfigStore, TemplateProvider},
    };
    pub use crate::domain::{
        AdapterSpec, AdapterType, ArchitectureMetadata, ArchitectureType, ArtifactMetadata,
        ArtifactSpec, EntitySpec, Framework, GenerationRequest, GenerationResult,
        InputAdapterSpec, InputAdapterType, Paradigm, ProjectConfig, UseCaseSpec,
    };
    pub use crate::error::{CleanArchError, CleanArchResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
