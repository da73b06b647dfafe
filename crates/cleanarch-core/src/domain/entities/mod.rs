pub mod architecture;
pub mod artifact;
pub mod backup;
pub mod common;
pub mod dependency;
pub mod project;
pub mod request;
pub mod result;

pub use crate::domain::DomainError;
pub use architecture::{ArchitectureMetadata, LayerDependencies, NamingConventions};
pub use artifact::{ArtifactMetadata, ConfigurationClass};
pub use backup::BackupManifest;
pub use common::RelativePath;
pub use dependency::Dependency;
pub use project::ProjectConfig;
pub use request::{
    AdapterSpec, ArtifactSpec, Endpoint, EndpointParameter, EntityField, EntitySpec,
    GenerationRequest, InputAdapterSpec, MethodParameter, MethodSpec, UseCaseSpec,
};
pub use result::{FailureStage, FileAction, GeneratedFile, GenerationResult};
