use chrono::NaiveDateTime;
use std::collections::BTreeMap;

use crate::domain::{ArchitectureType, DomainError, Framework, Paradigm, validators};

pub const DEFAULT_PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Settings of an initialized project (`.cleanarch.yml`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub name: String,
    pub base_package: String,
    pub architecture: ArchitectureType,
    pub paradigm: Paradigm,
    pub framework: Framework,
    pub plugin_version: String,
    pub created_at: NaiveDateTime,
    pub adapters_as_modules: bool,
    /// `group:artifact` to a forced version.
    pub dependency_overrides: BTreeMap<String, String>,
}

impl ProjectConfig {
    /// Builds a config with defaults for everything but name and package.
    pub fn new(
        name: impl Into<String>,
        base_package: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        let base_package = base_package.into();

        if name.trim().is_empty() {
            return Err(DomainError::MissingRequiredField {
                field: "project name",
            });
        }
        let check = validators::validate_package(&base_package);
        if !check.is_valid() {
            return Err(DomainError::InvalidRequest(format!(
                "Invalid package name: {base_package}"
            )));
        }

        Ok(Self {
            name,
            base_package,
            architecture: ArchitectureType::HexagonalSingle,
            paradigm: Paradigm::Reactive,
            framework: Framework::Spring,
            plugin_version: DEFAULT_PLUGIN_VERSION.to_string(),
            created_at: chrono::Local::now().naive_local(),
            adapters_as_modules: false,
            dependency_overrides: BTreeMap::new(),
        })
    }

    pub fn with_architecture(mut self, architecture: ArchitectureType) -> Self {
        self.architecture = architecture;
        self
    }

    pub fn with_paradigm(mut self, paradigm: Paradigm) -> Self {
        self.paradigm = paradigm;
        self
    }

    pub fn with_framework(mut self, framework: Framework) -> Self {
        self.framework = framework;
        self
    }

    pub fn with_adapters_as_modules(mut self, enabled: bool) -> Self {
        self.adapters_as_modules = enabled;
        self
    }

    pub fn with_override(mut self, key: impl Into<String>, version: impl Into<String>) -> Self {
        self.dependency_overrides.insert(key.into(), version.into());
        self
    }

    pub fn base_package_path(&self) -> String {
        self.base_package.replace('.', "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_invalid_base_package() {
        assert!(ProjectConfig::new("shop", "Com.Acme").is_err());
        assert!(ProjectConfig::new("", "com.acme").is_err());
    }

    #[test]
    fn defaults_and_builders() {
        let cfg = ProjectConfig::new("shop", "com.acme.shop")
            .unwrap()
            .with_framework(Framework::Quarkus)
            .with_adapters_as_modules(true);
        assert_eq!(cfg.architecture, ArchitectureType::HexagonalSingle);
        assert_eq!(cfg.framework, Framework::Quarkus);
        assert!(cfg.adapters_as_modules);
        assert_eq!(cfg.base_package_path(), "com/acme/shop");
    }
}
