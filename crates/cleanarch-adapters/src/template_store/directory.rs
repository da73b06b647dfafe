//! Template provider over a directory tree.
//!
//! ```text
//! <root>/
//!   architectures/<architecture>/structure.yml
//!   adapters/<adapter-type>/metadata.yml (+ properties and config templates)
//!   components/entity/Entity.java.tera
//!   frameworks/<framework>/<paradigm>/...
//! ```

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use cleanarch_core::{
    application::{
        ApplicationError,
        ports::{Bindings, TemplateProvider},
    },
    domain::{AdapterType, ArchitectureMetadata, ArchitectureType, ArtifactMetadata, ValidationResult},
    error::{CleanArchError, CleanArchResult},
};
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use crate::metadata_loader::{parse_architecture_metadata, parse_artifact_metadata};
use crate::renderer::TeraRenderer;

/// Serves templates and metadata from `root`. Files are read on every call,
/// so edits to the tree show up without a restart.
#[derive(Debug, Clone)]
pub struct DirectoryTemplateProvider {
    root: PathBuf,
    renderer: TeraRenderer,
}

impl DirectoryTemplateProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            renderer: TeraRenderer::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ids are relative and never climb out of the root.
    fn locate(&self, id: &str) -> Option<PathBuf> {
        let relative = Path::new(id);
        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        (contained && !id.is_empty()).then(|| self.root.join(relative))
    }

    fn read(&self, id: &str) -> Result<String, ApplicationError> {
        let not_found = || ApplicationError::TemplateNotFound { id: id.to_string() };
        let path = self.locate(id).ok_or_else(not_found)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(not_found()),
            Err(e) => Err(ApplicationError::filesystem(
                path,
                format!("Failed to read template: {e}"),
            )),
        }
    }
}

impl TemplateProvider for DirectoryTemplateProvider {
    fn exists(&self, id: &str) -> bool {
        self.locate(id).is_some_and(|path| path.is_file())
    }

    fn validate(&self, id: &str) -> ValidationResult {
        match self.read(id) {
            Ok(source) => self.renderer.check(id, &source),
            Err(e) => ValidationResult::failure(e.to_string()),
        }
    }

    #[instrument(skip(self, bindings))]
    fn render(&self, id: &str, bindings: &Bindings) -> CleanArchResult<String> {
        let source = self.read(id)?;
        self.renderer.render(id, &source, bindings)
    }

    fn artifact_metadata(&self, adapter_type: AdapterType) -> CleanArchResult<ArtifactMetadata> {
        let id = format!("adapters/{adapter_type}/metadata.yml");
        let text = self.read(&id)?;
        let metadata = parse_artifact_metadata(&text, adapter_type.as_str())
            .map_err(CleanArchError::Domain)?;
        debug!(adapter = %adapter_type, "Loaded adapter metadata");
        Ok(metadata)
    }

    fn architecture_metadata(
        &self,
        architecture: ArchitectureType,
    ) -> CleanArchResult<ArchitectureMetadata> {
        let id = format!("architectures/{architecture}/structure.yml");
        let text = self.read(&id)?;
        let metadata = parse_architecture_metadata(&text, architecture.as_str())
            .map_err(CleanArchError::Domain)?;

        if metadata.architecture != architecture {
            warn!(
                requested = %architecture,
                declared = %metadata.architecture,
                "structure.yml declares a different architecture"
            );
        }
        Ok(metadata)
    }

    fn list(&self) -> CleanArchResult<Vec<String>> {
        let mut ids = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(true) {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| self.root.clone());
                ApplicationError::filesystem(path, format!("Failed to read template directory: {e}"))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            let id = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            ids.push(id);
        }
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(root: &Path, id: &str, content: &str) {
        let path = root.join(id);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn provider() -> (TempDir, DirectoryTemplateProvider) {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "components/entity/Entity.java.tera", "package {{ packageName }};\n");
        write(root, "broken/Bad.java.tera", "{% for x in xs %}");
        write(
            root,
            "adapters/redis/metadata.yml",
            "name: Redis\ntype: driven\ndependencies:\n  - group: org.springframework.boot\n    artifact: spring-boot-starter-data-redis-reactive\n    version: 3.2.0\n",
        );
        write(
            root,
            "architectures/onion-single/structure.yml",
            "architecture: onion-single\nadapterPaths:\n  driven: \"src/main/java/{package}\"\n",
        );
        let provider = DirectoryTemplateProvider::new(root);
        (temp, provider)
    }

    // ── lookup ──

    #[test]
    fn exists_rejects_escaping_ids() {
        let (_temp, provider) = provider();
        assert!(provider.exists("components/entity/Entity.java.tera"));
        assert!(!provider.exists("components/entity"));
        assert!(!provider.exists("../outside.tera"));
        assert!(!provider.exists(""));
    }

    #[test]
    fn list_is_sorted_with_forward_slashes() {
        let (_temp, provider) = provider();
        assert_eq!(
            provider.list().unwrap(),
            vec![
                "adapters/redis/metadata.yml",
                "architectures/onion-single/structure.yml",
                "broken/Bad.java.tera",
                "components/entity/Entity.java.tera",
            ]
        );
    }

    // ── validate / render ──

    #[test]
    fn validate_flags_syntax_and_missing_templates() {
        let (_temp, provider) = provider();
        assert!(provider.validate("components/entity/Entity.java.tera").is_valid());

        let broken = provider.validate("broken/Bad.java.tera");
        assert!(broken.first_error().unwrap().contains("syntax error"));

        let missing = provider.validate("nope.tera");
        assert_eq!(missing.first_error(), Some("Template not found: nope.tera"));
    }

    #[test]
    fn render_uses_bindings() {
        let (_temp, provider) = provider();
        let mut bindings = Bindings::new();
        bindings.insert("packageName".into(), json!("com.acme.domain.model"));

        let out = provider
            .render("components/entity/Entity.java.tera", &bindings)
            .unwrap();
        assert_eq!(out, "package com.acme.domain.model;\n");
    }

    #[test]
    fn render_missing_template_is_not_found() {
        let (_temp, provider) = provider();
        let err = provider.render("nope.tera", &Bindings::new()).unwrap_err();
        assert_eq!(err.to_string(), "Application error: Template not found: nope.tera");
    }

    // ── metadata ──

    #[test]
    fn loads_adapter_and_architecture_metadata() {
        let (_temp, provider) = provider();

        let redis = provider.artifact_metadata(AdapterType::Redis).unwrap();
        assert_eq!(redis.dependencies.len(), 1);

        let onion = provider
            .architecture_metadata(ArchitectureType::OnionSingle)
            .unwrap();
        assert_eq!(onion.path_template("driven"), Some("src/main/java/{package}"));
    }

    #[test]
    fn missing_metadata_names_the_file() {
        let (_temp, provider) = provider();
        let err = provider.artifact_metadata(AdapterType::Kafka).unwrap_err();
        assert!(err.to_string().contains("adapters/kafka/metadata.yml"));
    }
}
