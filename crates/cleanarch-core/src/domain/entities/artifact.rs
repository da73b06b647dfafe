use serde::{Deserialize, Serialize};

use crate::domain::{AdapterRole, Dependency, DependencyScope, ValidationResult};

/// What an adapter template set brings with it besides the main class:
/// dependencies, an optional properties fragment, extra configuration classes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub role: AdapterRole,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    #[serde(default)]
    pub test_dependencies: Vec<Dependency>,
    /// Template id, relative to the adapter's template directory.
    #[serde(
        default,
        rename = "applicationPropertiesTemplate",
        skip_serializing_if = "Option::is_none"
    )]
    pub properties_template: Option<String>,
    #[serde(default)]
    pub configuration_classes: Vec<ConfigurationClass>,
}

/// A secondary class generated alongside an adapter (e.g. a Redis config bean).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationClass {
    pub name: String,
    #[serde(rename = "packagePath")]
    pub package_suffix: String,
    #[serde(rename = "templatePath")]
    pub template: String,
}

impl ConfigurationClass {
    pub fn fully_qualified_name(&self, base_package: &str) -> String {
        format!("{}.{}.{}", base_package, self.package_suffix, self.name)
    }
}

impl ArtifactMetadata {
    pub fn new(name: impl Into<String>, role: AdapterRole) -> Self {
        Self {
            name: name.into(),
            role,
            description: String::new(),
            dependencies: Vec::new(),
            test_dependencies: Vec::new(),
            properties_template: None,
            configuration_classes: Vec::new(),
        }
    }

    pub fn with_dependency(mut self, dep: Dependency) -> Self {
        self.dependencies.push(dep);
        self
    }

    pub fn with_test_dependency(mut self, dep: Dependency) -> Self {
        self.test_dependencies.push(dep.with_scope(DependencyScope::Test));
        self
    }

    pub fn with_properties_template(mut self, template: impl Into<String>) -> Self {
        self.properties_template = Some(template.into());
        self
    }

    pub fn with_configuration_class(mut self, class: ConfigurationClass) -> Self {
        self.configuration_classes.push(class);
        self
    }

    /// Compile-scope list followed by the test list, the latter forced to
    /// test scope regardless of what the document said.
    pub fn all_dependencies(&self) -> Vec<Dependency> {
        self.dependencies
            .iter()
            .cloned()
            .chain(
                self.test_dependencies
                    .iter()
                    .cloned()
                    .map(|d| d.with_scope(DependencyScope::Test)),
            )
            .collect()
    }

    pub fn has_test_dependencies(&self) -> bool {
        !self.test_dependencies.is_empty()
    }

    pub fn has_properties_template(&self) -> bool {
        self.properties_template
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
    }

    pub fn has_configuration_classes(&self) -> bool {
        !self.configuration_classes.is_empty()
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::success();
        if self.name.trim().is_empty() {
            result.add_error("Adapter name cannot be empty");
        }
        for dep in self.dependencies.iter().chain(&self.test_dependencies) {
            if !dep.is_complete() {
                result.add_error(format!(
                    "Incomplete dependency coordinate in metadata '{}': {}",
                    self.name,
                    dep.coordinate()
                ));
            }
        }
        result
    }
}
