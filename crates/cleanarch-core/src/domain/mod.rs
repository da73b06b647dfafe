// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for cleanarch.
//!
//! Pure logic only. Filesystem, template rendering and project configuration
//! are reached through ports defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: Merges operate on text and parsed documents, never on paths
//! - **Closed enums**: Unknown tags fail at parse time
//! - **Immutable requests**: A `GenerationRequest` is consumed once
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod parsing;
pub mod services;
pub mod validators;
pub mod value_objects;

mod validation;

// Re-exports for convenience
pub use entities::{
    AdapterSpec, ArchitectureMetadata, ArtifactMetadata, ArtifactSpec, BackupManifest,
    ConfigurationClass, Dependency, Endpoint, EndpointParameter, EntityField, EntitySpec,
    FailureStage, FileAction, GeneratedFile, GenerationRequest, GenerationResult, InputAdapterSpec,
    LayerDependencies, MethodParameter, MethodSpec, NamingConventions, ProjectConfig,
    RelativePath, UseCaseSpec,
};

pub use error::{DomainError, ErrorCategory};

pub use services::{
    ConflictDetector, ContentMerger, DescriptorMerger, MergeResult, PathResolver, Placeholders,
    VersionOverrides,
};

pub use validation::ValidationResult;

pub use value_objects::{
    AdapterRole, AdapterType, ArchitectureType, ArtifactKind, DependencyScope, Framework,
    HttpMethod, InputAdapterType, Paradigm, ParameterType,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    // ========================================================================
    // Cross-service Tests
    // ========================================================================

    #[test]
    fn metadata_dependencies_flow_into_a_descriptor() {
        let metadata = ArtifactMetadata::new("redis", AdapterRole::Driven)
            .with_dependency(Dependency::compile(
                "org.springframework.boot",
                "spring-boot-starter-data-redis-reactive",
                "3.2.0",
            ))
            .with_test_dependency(Dependency::compile("it.ozimov", "embedded-redis", "0.7.3"));

        let descriptor = "dependencies {\n    implementation(\"org.springframework.boot:spring-boot-starter-webflux:3.2.0\")\n}\n";
        let out = DescriptorMerger::new()
            .ensure_dependencies(descriptor, &metadata.all_dependencies())
            .unwrap()
            .unwrap();

        assert!(out.contains(
            "    implementation(\"org.springframework.boot:spring-boot-starter-webflux:3.2.0\")\n    implementation(\"org.springframework.boot:spring-boot-starter-data-redis-reactive:3.2.0\")\n"
        ));
        assert!(out.contains("// Test dependencies\n    testImplementation(\"it.ozimov:embedded-redis:0.7.3\")"));
    }

    #[test]
    fn parsed_declarations_feed_conflict_detection() {
        let descriptor = "dependencies {\n    implementation(\"org.springframework.boot:spring-boot-starter:3.1.0\")\n}\n";
        let existing = services::parse_declarations(descriptor);
        let incoming = [Dependency::compile(
            "org.springframework.boot",
            "spring-boot-starter",
            "3.2.0",
        )];
        let detector = ConflictDetector::new();

        assert_eq!(detector.detect_version_conflicts(&existing, &incoming).len(), 1);

        let overrides = VersionOverrides::from([(
            "org.springframework.boot:spring-boot-starter".to_string(),
            "3.1.0".to_string(),
        )]);
        let pinned = detector.apply_version_overrides(&incoming, Some(&overrides));
        assert!(detector.detect_version_conflicts(&existing, &pinned).is_empty());
    }

    #[test]
    fn resolved_adapter_path_passes_layer_check() {
        let arch = ArchitectureMetadata::new(ArchitectureType::HexagonalSingle)
            .with_path("driven", "infrastructure/driven-adapters/{name}")
            .with_layer_dependencies(
                LayerDependencies::new()
                    .allow("domain", Vec::<String>::new())
                    .allow("infrastructure", ["domain"]),
            );
        let resolver = PathResolver::new();
        let path = resolver
            .resolve(&arch, "driven", "redis-cache", &Placeholders::new())
            .unwrap();

        assert_eq!(path, PathBuf::from("infrastructure/driven-adapters/redis-cache"));
        assert!(resolver.validate_layer(&path, &arch).is_valid());
    }
}
