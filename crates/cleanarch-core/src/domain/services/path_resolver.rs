//! Role path templates to concrete paths, and layer membership checks.

use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::domain::{ArchitectureMetadata, DomainError, ValidationResult};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]+)}").expect("placeholder pattern is valid"));

/// Layer names recognized in paths, in no particular priority; the one
/// appearing earliest in the path wins.
const KNOWN_LAYERS: &[&str] = &["core", "domain", "application", "infrastructure"];

pub type Placeholders = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, Default)]
pub struct PathResolver;

impl PathResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolves `role`'s path template for `name`.
    ///
    /// `name` and `type` (the role) are added to the placeholders. A
    /// `{module}` token with no `module` binding is an error for multi-module
    /// architectures and is dropped, along with its separator, otherwise.
    /// Any other unmatched token stays in the output verbatim.
    pub fn resolve(
        &self,
        architecture: &ArchitectureMetadata,
        role: &str,
        name: &str,
        placeholders: &Placeholders,
    ) -> Result<PathBuf, DomainError> {
        let template =
            architecture
                .path_template(role)
                .ok_or_else(|| DomainError::UnknownRole {
                    role: role.to_string(),
                    architecture: architecture.architecture.to_string(),
                })?;

        let mut context = placeholders.clone();
        context.insert("name".into(), name.to_string());
        context.insert("type".into(), role.to_string());

        let mut template = template.to_string();
        if template.contains("{module}") && !context.contains_key("module") {
            if architecture.is_multi_module() {
                return Err(DomainError::ModuleRequired {
                    architecture: architecture.architecture.to_string(),
                    modules: architecture.modules.join(", "),
                });
            }
            template = template.replace("{module}/", "").replace("/{module}", "");
        }

        Ok(PathBuf::from(substitute_placeholders(&template, &context)))
    }

    /// Checks that `path` sits inside a layer the architecture declares.
    ///
    /// Architectures without a layer graph accept any path.
    pub fn validate_layer(&self, path: &Path, architecture: &ArchitectureMetadata) -> ValidationResult {
        let Some(layers) = &architecture.layer_dependencies else {
            return ValidationResult::success();
        };

        let display = path.to_string_lossy();
        let Some(layer) = detect_layer(&display) else {
            return ValidationResult::failure(format!(
                "Could not determine layer from path: {display}"
            ));
        };

        if !layers.defines(layer) {
            return ValidationResult::failure(format!(
                "Layer '{}' is not defined in architecture '{}'",
                layer, architecture.architecture
            ));
        }
        ValidationResult::success()
    }
}

/// Replaces each `{key}` with its binding; unknown keys are left as-is.
pub fn substitute_placeholders(template: &str, context: &Placeholders) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures<'_>| {
            context
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Earliest segment of `path` naming a known layer.
fn detect_layer(path: &str) -> Option<&'static str> {
    let normalized = path.replace('\\', "/").to_lowercase();
    normalized
        .split('/')
        .find_map(|segment| KNOWN_LAYERS.iter().copied().find(|l| *l == segment))
}
