//! Parsing of `metadata.yml` and `structure.yml` documents.
//!
//! `structure.yml` maps one-to-one onto [`ArchitectureMetadata`]. Adapter
//! `metadata.yml` files come in two dependency layouts, a plain list or a
//! `{ gradle: [...] }` map, and accept Maven-style `groupId`/`artifactId`
//! keys, so they go through a DTO first.

use std::str::FromStr;

use cleanarch_core::domain::{
    AdapterRole, ArchitectureMetadata, ArtifactMetadata, ConfigurationClass, Dependency,
    DependencyScope, DomainError,
};
use serde::Deserialize;
use tracing::debug;

/// DTO for adapter `metadata.yml`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetadataDocument {
    name: String,
    #[serde(rename = "type")]
    role: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    dependencies: Option<DependencySection>,
    #[serde(default)]
    test_dependencies: Option<DependencySection>,
    #[serde(default)]
    application_properties_template: Option<String>,
    #[serde(default)]
    configuration_classes: Vec<ConfigurationClass>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DependencySection {
    Gradle { gradle: Vec<DependencyEntry> },
    List(Vec<DependencyEntry>),
}

impl DependencySection {
    fn into_entries(self) -> Vec<DependencyEntry> {
        match self {
            Self::Gradle { gradle } => gradle,
            Self::List(entries) => entries,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DependencyEntry {
    #[serde(alias = "groupId")]
    group: String,
    #[serde(alias = "artifactId")]
    artifact: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    scope: Option<String>,
}

impl DependencyEntry {
    fn into_dependency(self, default_scope: DependencyScope) -> Result<Dependency, DomainError> {
        let scope = match self.scope.as_deref() {
            Some(scope) => DependencyScope::from_str(scope)?,
            None => default_scope,
        };
        Ok(Dependency::new(self.group, self.artifact, self.version, scope))
    }
}

/// Parse an adapter `metadata.yml`. `subject` names the document in errors.
pub fn parse_artifact_metadata(text: &str, subject: &str) -> Result<ArtifactMetadata, DomainError> {
    let document: MetadataDocument =
        serde_yaml::from_str(text).map_err(|e| DomainError::InvalidMetadata {
            subject: subject.to_string(),
            reason: e.to_string(),
        })?;

    let role = AdapterRole::from_str(&document.role)?;
    let dependencies = convert(document.dependencies, DependencyScope::Compile)?;
    let test_dependencies = convert(document.test_dependencies, DependencyScope::Test)?;

    let metadata = ArtifactMetadata {
        name: document.name,
        role,
        description: document.description,
        dependencies,
        test_dependencies,
        properties_template: document.application_properties_template,
        configuration_classes: document.configuration_classes,
    };

    let check = metadata.validate();
    if let Some(reason) = check.first_error() {
        return Err(DomainError::InvalidMetadata {
            subject: subject.to_string(),
            reason: reason.to_string(),
        });
    }

    debug!(
        subject,
        dependencies = metadata.dependencies.len(),
        test_dependencies = metadata.test_dependencies.len(),
        "Parsed artifact metadata"
    );
    Ok(metadata)
}

/// Parse an architecture `structure.yml`.
pub fn parse_architecture_metadata(
    text: &str,
    subject: &str,
) -> Result<ArchitectureMetadata, DomainError> {
    let metadata: ArchitectureMetadata =
        serde_yaml::from_str(text).map_err(|e| DomainError::InvalidMetadata {
            subject: subject.to_string(),
            reason: e.to_string(),
        })?;

    let check = metadata.validate();
    if let Some(reason) = check.first_error() {
        return Err(DomainError::InvalidMetadata {
            subject: subject.to_string(),
            reason: reason.to_string(),
        });
    }
    Ok(metadata)
}

fn convert(
    section: Option<DependencySection>,
    default_scope: DependencyScope,
) -> Result<Vec<Dependency>, DomainError> {
    section
        .map(DependencySection::into_entries)
        .unwrap_or_default()
        .into_iter()
        .map(|entry| entry.into_dependency(default_scope))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── metadata.yml ──

    #[test]
    fn plain_dependency_list() {
        let yaml = r#"
name: Redis
type: driven
description: Redis cache adapter
dependencies:
  - group: org.springframework.boot
    artifact: spring-boot-starter-data-redis-reactive
    version: 3.2.0
testDependencies:
  - group: it.ozimov
    artifact: embedded-redis
    version: 0.7.3
applicationPropertiesTemplate: application-properties.yml.tera
configurationClasses:
  - name: RedisConfig
    packagePath: infrastructure.config
    templatePath: RedisConfig.java.tera
"#;
        let metadata = parse_artifact_metadata(yaml, "redis").unwrap();

        assert_eq!(metadata.role, AdapterRole::Driven);
        assert_eq!(metadata.dependencies.len(), 1);
        assert_eq!(metadata.dependencies[0].scope, DependencyScope::Compile);
        assert_eq!(metadata.test_dependencies[0].scope, DependencyScope::Test);
        assert_eq!(
            metadata.properties_template.as_deref(),
            Some("application-properties.yml.tera")
        );
        assert_eq!(metadata.configuration_classes[0].package_suffix, "infrastructure.config");
    }

    #[test]
    fn gradle_section_with_maven_keys() {
        let yaml = r#"
name: MongoDB
type: driven
dependencies:
  gradle:
    - groupId: org.springframework.boot
      artifactId: spring-boot-starter-data-mongodb-reactive
      version: 3.2.0
    - groupId: org.mapstruct
      artifactId: mapstruct-processor
      version: 1.5.5.Final
      scope: annotationProcessor
"#;
        let metadata = parse_artifact_metadata(yaml, "mongodb").unwrap();

        assert_eq!(metadata.dependencies.len(), 2);
        assert_eq!(metadata.dependencies[0].group, "org.springframework.boot");
        assert_eq!(
            metadata.dependencies[1].scope,
            DependencyScope::AnnotationProcessor
        );
        assert!(metadata.test_dependencies.is_empty());
    }

    #[test]
    fn unknown_role_is_rejected() {
        let yaml = "name: Odd\ntype: sideways\n";
        let err = parse_artifact_metadata(yaml, "odd").unwrap_err();
        assert!(matches!(err, DomainError::UnknownVariant { .. }));
    }

    #[test]
    fn malformed_yaml_names_the_subject() {
        let err = parse_artifact_metadata("name: [unterminated", "kafka").unwrap_err();
        assert!(err.to_string().contains("kafka"));
    }

    // ── structure.yml ──

    #[test]
    fn structure_document() {
        let yaml = r#"
architecture: hexagonal-single
adapterPaths:
  driven: "src/main/java/{package}"
  driving: "src/main/java/{package}"
namingConventions:
  suffixes:
    useCase: UseCase
layerDependencies:
  domain: []
  application: [domain]
  infrastructure: [domain, application]
packages:
  - domain
  - application
  - infrastructure
"#;
        let metadata = parse_architecture_metadata(yaml, "hexagonal-single").unwrap();

        assert_eq!(metadata.path_template("driven"), Some("src/main/java/{package}"));
        assert_eq!(metadata.class_name("useCase", "CreateOrder", "Port"), "CreateOrderUseCase");
        assert!(metadata.has_layer_dependencies());
        assert!(!metadata.is_multi_module());
    }
}
