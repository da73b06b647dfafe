//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `cleanarch-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `TemplateProvider`: Template lookup, validation, rendering and metadata
//!   - `ProjectConfigStore`: `.cleanarch.yml` persistence
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (`GenerationOrchestrator::generate`, driven by the CLI)

pub mod output;

pub use output::{Bindings, Filesystem, PROJECT_CONFIG_FILE, ProjectConfigStore, TemplateProvider};

#[cfg(test)]
pub use output::{MockFilesystem, MockProjectConfigStore, MockTemplateProvider};
