//! Infrastructure adapters for cleanarch.
//!
//! This crate implements the ports defined in `cleanarch-core::application::ports`:
//! local and in-memory filesystems, a Tera template provider over a directory
//! tree, and the YAML store for `.cleanarch.yml`. All I/O lives here.

pub mod builtin_templates;
pub mod filesystem;
pub mod metadata_loader;
pub mod project_config;
pub mod renderer;
pub mod template_store;

// Re-export commonly used adapters
pub use builtin_templates::{TEMPLATES_DIR_ENV, locate_template_root};
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use project_config::YamlProjectConfigStore;
pub use renderer::TeraRenderer;
pub use template_store::DirectoryTemplateProvider;
