//! Architecture metadata: role path templates, naming rules, layer graph.
//!
//! Loaded read-only from `architectures/<id>/structure.yml` once per run.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{ArchitectureType, DomainError, ValidationResult};

/// Layering scheme of a project, as declared by its `structure.yml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchitectureMetadata {
    pub architecture: ArchitectureType,
    /// Role (e.g. `driven`) to a path template with `{placeholder}` tokens.
    pub adapter_paths: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naming_conventions: Option<NamingConventions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_dependencies: Option<LayerDependencies>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub packages: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<String>,
}

impl ArchitectureMetadata {
    pub fn new(architecture: ArchitectureType) -> Self {
        Self {
            architecture,
            adapter_paths: BTreeMap::new(),
            naming_conventions: None,
            layer_dependencies: None,
            packages: Vec::new(),
            modules: Vec::new(),
        }
    }

    pub fn with_path(mut self, role: impl Into<String>, template: impl Into<String>) -> Self {
        self.adapter_paths.insert(role.into(), template.into());
        self
    }

    pub fn with_layer_dependencies(mut self, deps: LayerDependencies) -> Self {
        self.layer_dependencies = Some(deps);
        self
    }

    pub fn with_naming(mut self, naming: NamingConventions) -> Self {
        self.naming_conventions = Some(naming);
        self
    }

    pub fn with_modules<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modules = modules.into_iter().map(Into::into).collect();
        self
    }

    pub fn path_template(&self, role: &str) -> Option<&str> {
        self.adapter_paths.get(role).map(String::as_str)
    }

    /// Declared module list is non-empty.
    pub fn is_multi_module(&self) -> bool {
        !self.modules.is_empty()
    }

    pub fn has_layer_dependencies(&self) -> bool {
        self.layer_dependencies.is_some()
    }

    /// Applies naming conventions for `component`, or `default_suffix` when
    /// the architecture declares none for it.
    pub fn class_name(&self, component: &str, base: &str, default_suffix: &str) -> String {
        match &self.naming_conventions {
            Some(naming) if naming.has_conventions_for(component) => naming.apply(component, base),
            _ => format!("{base}{default_suffix}"),
        }
    }

    pub fn validate(&self) -> ValidationResult {
        if self.adapter_paths.is_empty() {
            return ValidationResult::failure("Adapter paths cannot be empty");
        }
        if !self.adapter_paths.contains_key("driven") && !self.adapter_paths.contains_key("driving")
        {
            return ValidationResult::failure(
                "Adapter paths must contain at least 'driven' or 'driving' entries",
            );
        }
        ValidationResult::success()
    }
}

// ── NamingConventions ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingConventions {
    #[serde(default)]
    pub suffixes: BTreeMap<String, String>,
    #[serde(default)]
    pub prefixes: BTreeMap<String, String>,
}

impl NamingConventions {
    /// `prefix + base + suffix` for the component type.
    pub fn apply(&self, component: &str, base: &str) -> String {
        format!(
            "{}{}{}",
            self.prefix(component).unwrap_or_default(),
            base,
            self.suffix(component).unwrap_or_default()
        )
    }

    pub fn suffix(&self, component: &str) -> Option<&str> {
        self.suffixes.get(component).map(String::as_str)
    }

    pub fn prefix(&self, component: &str) -> Option<&str> {
        self.prefixes.get(component).map(String::as_str)
    }

    pub fn has_conventions_for(&self, component: &str) -> bool {
        self.suffixes.contains_key(component) || self.prefixes.contains_key(component)
    }
}

// ── LayerDependencies ────────────────────────────────────────────────────────

/// Which layers each layer may depend on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerDependencies {
    allowed: BTreeMap<String, Vec<String>>,
}

impl LayerDependencies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow<I, S>(mut self, layer: impl Into<String>, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed
            .insert(layer.into(), targets.into_iter().map(Into::into).collect());
        self
    }

    /// A layer may always depend on itself.
    pub fn can_depend_on(&self, from: &str, to: &str) -> bool {
        if from == to {
            return true;
        }
        self.allowed
            .get(from)
            .is_some_and(|targets| targets.iter().any(|t| t == to))
    }

    pub fn allowed_for(&self, layer: &str) -> &[String] {
        self.allowed.get(layer).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn defines(&self, layer: &str) -> bool {
        self.allowed.contains_key(layer)
    }

    pub fn validate_dependency(&self, from: &str, to: &str) -> Result<(), DomainError> {
        if self.can_depend_on(from, to) {
            return Ok(());
        }
        Err(DomainError::LayerViolation {
            from: from.to_string(),
            to: to.to_string(),
            allowed: format!("[{}]", self.allowed_for(from).join(", ")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hexagonal() -> ArchitectureMetadata {
        ArchitectureMetadata::new(ArchitectureType::HexagonalSingle)
            .with_path("driven", "infrastructure/driven-adapters/{name}")
            .with_path("driving", "infrastructure/entry-points/{name}")
    }

    #[test]
    fn validate_requires_driven_or_driving() {
        assert!(hexagonal().validate().is_valid());

        let empty = ArchitectureMetadata::new(ArchitectureType::OnionSingle);
        assert_eq!(
            empty.validate().first_error(),
            Some("Adapter paths cannot be empty")
        );

        let odd = ArchitectureMetadata::new(ArchitectureType::OnionSingle).with_path("other", "x");
        assert!(!odd.validate().is_valid());
    }

    #[test]
    fn class_name_falls_back_to_default_suffix() {
        let mut naming = NamingConventions::default();
        naming.suffixes.insert("adapter".into(), "Repository".into());
        naming.prefixes.insert("adapter".into(), "Redis".into());
        let arch = hexagonal().with_naming(naming);

        assert_eq!(arch.class_name("adapter", "User", "Adapter"), "RedisUserRepository");
        assert_eq!(arch.class_name("usecase", "User", "UseCase"), "UserUseCase");
    }

    #[test]
    fn layer_dependency_violations_list_allowed_targets() {
        let deps = LayerDependencies::new()
            .allow("infrastructure", ["domain", "application"])
            .allow("domain", Vec::<String>::new());

        assert!(deps.can_depend_on("infrastructure", "domain"));
        assert!(deps.can_depend_on("domain", "domain"));
        let err = deps.validate_dependency("domain", "infrastructure").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Layer 'domain' cannot depend on layer 'infrastructure'. Allowed dependencies: []"
        );
    }

    #[test]
    fn deserializes_structure_document() {
        let yaml = r#"
architecture: onion-multi
adapterPaths:
  driven: "{module}/src/main/java/{basePackage}/{name}"
layerDependencies:
  core: []
  infrastructure: [core]
modules: [core, infrastructure]
"#;
        let meta: ArchitectureMetadata = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(meta.architecture, ArchitectureType::OnionMulti);
        assert!(meta.is_multi_module());
        assert!(meta.layer_dependencies.as_ref().unwrap().defines("core"));
    }
}
