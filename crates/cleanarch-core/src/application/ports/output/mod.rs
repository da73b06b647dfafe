//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `cleanarch-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::domain::{
    AdapterType, ArchitectureMetadata, ArchitectureType, ArtifactMetadata, ProjectConfig,
    ValidationResult,
};
use crate::error::CleanArchResult;

/// String-keyed variables handed to the template engine. Values may nest.
pub type Bindings = serde_json::Map<String, serde_json::Value>;

/// File name of the project configuration, relative to the project root.
pub const PROJECT_CONFIG_FILE: &str = ".cleanarch.yml";

/// Port for filesystem operations.
///
/// Implemented by:
/// - `cleanarch_adapters::filesystem::LocalFilesystem` (production)
/// - `cleanarch_adapters::filesystem::MemoryFilesystem` (testing, fault injection)
///
/// ## Design Notes
///
/// - Paths are absolute; services join them onto the project root
/// - `write_file` replaces the target atomically and creates missing parents
/// - `copy_file` copies bytes, so restores are exact
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    fn read_to_string(&self, path: &Path) -> CleanArchResult<String>;

    fn write_file(&self, path: &Path, content: &str) -> CleanArchResult<()>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> CleanArchResult<()>;

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Copy a file, creating the destination's parents.
    fn copy_file(&self, from: &Path, to: &Path) -> CleanArchResult<()>;

    fn remove_file(&self, path: &Path) -> CleanArchResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> CleanArchResult<()>;

    /// Direct children of a directory, sorted.
    fn list_dir(&self, path: &Path) -> CleanArchResult<Vec<PathBuf>>;
}

/// Port for template lookup, validation and rendering.
///
/// Template ids are `/`-separated paths relative to the template root, e.g.
/// `components/entity/Entity.java.tera`. The core never sees the engine.
#[cfg_attr(test, mockall::automock)]
pub trait TemplateProvider: Send + Sync {
    fn exists(&self, id: &str) -> bool;

    /// Syntax check without rendering.
    fn validate(&self, id: &str) -> ValidationResult;

    fn render(&self, id: &str, bindings: &Bindings) -> CleanArchResult<String>;

    /// `adapters/<type>/metadata.yml`
    fn artifact_metadata(&self, adapter_type: AdapterType) -> CleanArchResult<ArtifactMetadata>;

    /// `architectures/<type>/structure.yml`
    fn architecture_metadata(
        &self,
        architecture: ArchitectureType,
    ) -> CleanArchResult<ArchitectureMetadata>;

    /// Every template id under the root, sorted.
    fn list(&self) -> CleanArchResult<Vec<String>>;
}

/// Port for reading and writing `.cleanarch.yml`.
#[cfg_attr(test, mockall::automock)]
pub trait ProjectConfigStore: Send + Sync {
    /// `Ok(None)` when the project is not initialized.
    fn load(&self, root: &Path) -> CleanArchResult<Option<ProjectConfig>>;

    fn save(&self, root: &Path, config: &ProjectConfig) -> CleanArchResult<()>;
}
