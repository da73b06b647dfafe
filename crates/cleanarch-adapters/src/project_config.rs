//! `.cleanarch.yml` persistence.
//!
//! ```yaml
//! project:
//!   name: shop
//!   basePackage: com.acme.shop
//!   pluginVersion: 0.3.0
//!   createdAt: 2026-01-05T10:15:00
//! architecture:
//!   type: hexagonal-single
//!   paradigm: reactive
//!   framework: spring
//!   adaptersAsModules: false
//! dependencyOverrides:
//!   org.springframework.boot:spring-boot-starter-data-redis-reactive: 3.3.1
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDateTime;
use cleanarch_core::{
    application::{
        ApplicationError,
        ports::{Filesystem, PROJECT_CONFIG_FILE, ProjectConfigStore},
    },
    domain::{
        ArchitectureType, Framework, Paradigm, ProjectConfig,
        entities::project::DEFAULT_PLUGIN_VERSION,
    },
    error::CleanArchResult,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectDocument {
    project: ProjectSection,
    architecture: ArchitectureSection,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    dependency_overrides: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectSection {
    name: String,
    base_package: String,
    #[serde(default)]
    plugin_version: Option<String>,
    #[serde(default)]
    created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArchitectureSection {
    #[serde(rename = "type")]
    architecture: ArchitectureType,
    paradigm: Paradigm,
    framework: Framework,
    #[serde(default)]
    adapters_as_modules: bool,
}

impl From<&ProjectConfig> for ProjectDocument {
    fn from(config: &ProjectConfig) -> Self {
        Self {
            project: ProjectSection {
                name: config.name.clone(),
                base_package: config.base_package.clone(),
                plugin_version: Some(config.plugin_version.clone()),
                created_at: Some(config.created_at),
            },
            architecture: ArchitectureSection {
                architecture: config.architecture,
                paradigm: config.paradigm,
                framework: config.framework,
                adapters_as_modules: config.adapters_as_modules,
            },
            dependency_overrides: config.dependency_overrides.clone(),
        }
    }
}

/// Reads and writes `.cleanarch.yml` through the [`Filesystem`] port.
#[derive(Clone)]
pub struct YamlProjectConfigStore {
    filesystem: Arc<dyn Filesystem>,
}

impl YamlProjectConfigStore {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }
}

impl ProjectConfigStore for YamlProjectConfigStore {
    #[instrument(skip(self), fields(root = %root.display()))]
    fn load(&self, root: &Path) -> CleanArchResult<Option<ProjectConfig>> {
        let path = root.join(PROJECT_CONFIG_FILE);
        if !self.filesystem.exists(&path) {
            debug!("No project configuration");
            return Ok(None);
        }

        let text = self.filesystem.read_to_string(&path)?;
        let invalid = |reason: String| ApplicationError::InvalidProjectConfig {
            path: path.clone(),
            reason,
        };

        let document: ProjectDocument =
            serde_yaml::from_str(&text).map_err(|e| invalid(e.to_string()))?;

        let mut config = ProjectConfig::new(document.project.name, document.project.base_package)
            .map_err(|e| invalid(e.to_string()))?
            .with_architecture(document.architecture.architecture)
            .with_paradigm(document.architecture.paradigm)
            .with_framework(document.architecture.framework)
            .with_adapters_as_modules(document.architecture.adapters_as_modules);

        config.plugin_version = document
            .project
            .plugin_version
            .unwrap_or_else(|| DEFAULT_PLUGIN_VERSION.to_string());
        if let Some(created_at) = document.project.created_at {
            config.created_at = created_at;
        }
        config.dependency_overrides = document.dependency_overrides;

        debug!(
            project = %config.name,
            architecture = %config.architecture,
            "Project configuration loaded"
        );
        Ok(Some(config))
    }

    #[instrument(skip(self, config), fields(root = %root.display(), project = %config.name))]
    fn save(&self, root: &Path, config: &ProjectConfig) -> CleanArchResult<()> {
        let path = root.join(PROJECT_CONFIG_FILE);
        let text = serde_yaml::to_string(&ProjectDocument::from(config)).map_err(|e| {
            ApplicationError::InvalidProjectConfig {
                path: path.clone(),
                reason: e.to_string(),
            }
        })?;
        self.filesystem.write_file(&path, &text)
    }
}
