//! Domain value objects: architecture, framework, adapter kinds, scopes.
//!
//! These are pure value types: `Copy`, equality-by-value, no identity.
//! Every enum is closed. Unknown tags are rejected by `FromStr` with
//! `DomainError::UnknownVariant`, never at a later match site.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str` arm and the `FromStr` arm here
//! 3. Add the matching templates under the template root

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! impl_display_via_as_str {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

// ── ArchitectureType ─────────────────────────────────────────────────────────

/// A named layering scheme. Each one has an `architectures/<id>/structure.yml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArchitectureType {
    HexagonalSingle,
    HexagonalMulti,
    HexagonalMultiGranular,
    OnionSingle,
    OnionMulti,
}

impl ArchitectureType {
    pub const ALL: [Self; 5] = [
        Self::HexagonalSingle,
        Self::HexagonalMulti,
        Self::HexagonalMultiGranular,
        Self::OnionSingle,
        Self::OnionMulti,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::HexagonalSingle => "hexagonal-single",
            Self::HexagonalMulti => "hexagonal-multi",
            Self::HexagonalMultiGranular => "hexagonal-multi-granular",
            Self::OnionSingle => "onion-single",
            Self::OnionMulti => "onion-multi",
        }
    }

    /// Whether the project tree is split into Gradle modules.
    pub const fn is_multi_module(self) -> bool {
        matches!(
            self,
            Self::HexagonalMulti | Self::HexagonalMultiGranular | Self::OnionMulti
        )
    }

    pub const fn is_hexagonal(self) -> bool {
        matches!(
            self,
            Self::HexagonalSingle | Self::HexagonalMulti | Self::HexagonalMultiGranular
        )
    }
}

impl FromStr for ArchitectureType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "hexagonal-single" => Ok(Self::HexagonalSingle),
            "hexagonal-multi" => Ok(Self::HexagonalMulti),
            "hexagonal-multi-granular" => Ok(Self::HexagonalMultiGranular),
            "onion-single" => Ok(Self::OnionSingle),
            "onion-multi" => Ok(Self::OnionMulti),
            _ => Err(DomainError::UnknownVariant {
                kind: "architecture",
                value: s.to_string(),
                expected: "hexagonal-single, hexagonal-multi, hexagonal-multi-granular, onion-single, onion-multi",
            }),
        }
    }
}

// ── Framework ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    Spring,
    Quarkus,
    Micronaut,
}

impl Framework {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Quarkus => "quarkus",
            Self::Micronaut => "micronaut",
        }
    }
}

impl FromStr for Framework {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "spring" | "spring-boot" => Ok(Self::Spring),
            "quarkus" => Ok(Self::Quarkus),
            "micronaut" => Ok(Self::Micronaut),
            _ => Err(DomainError::UnknownVariant {
                kind: "framework",
                value: s.to_string(),
                expected: "spring, quarkus, micronaut",
            }),
        }
    }
}

// ── Paradigm ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Paradigm {
    Reactive,
    Imperative,
}

impl Paradigm {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Reactive => "reactive",
            Self::Imperative => "imperative",
        }
    }
}

impl FromStr for Paradigm {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reactive" => Ok(Self::Reactive),
            "imperative" => Ok(Self::Imperative),
            _ => Err(DomainError::UnknownVariant {
                kind: "paradigm",
                value: s.to_string(),
                expected: "reactive, imperative",
            }),
        }
    }
}

// ── AdapterType ──────────────────────────────────────────────────────────────

/// Technology behind a driven (output) adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdapterType {
    Redis,
    #[serde(rename = "mongodb")]
    MongoDb,
    #[serde(rename = "postgresql")]
    PostgreSql,
    RestClient,
    Kafka,
}

impl AdapterType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Redis => "redis",
            Self::MongoDb => "mongodb",
            Self::PostgreSql => "postgresql",
            Self::RestClient => "rest-client",
            Self::Kafka => "kafka",
        }
    }

    /// Document stores get a mapper and a data entity next to the adapter.
    pub const fn needs_data_mapping(self) -> bool {
        matches!(self, Self::Redis | Self::MongoDb)
    }
}

impl FromStr for AdapterType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "mongodb" | "mongo" => Ok(Self::MongoDb),
            "postgresql" | "postgres" => Ok(Self::PostgreSql),
            "rest-client" | "restclient" | "rest" => Ok(Self::RestClient),
            "kafka" => Ok(Self::Kafka),
            _ => Err(DomainError::UnknownVariant {
                kind: "adapter type",
                value: s.to_string(),
                expected: "redis, mongodb, postgresql, rest-client, kafka",
            }),
        }
    }
}

// ── InputAdapterType ─────────────────────────────────────────────────────────

/// Technology behind a driving (entry point) adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputAdapterType {
    Rest,
    Graphql,
    Grpc,
    Websocket,
}

impl InputAdapterType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rest => "rest",
            Self::Graphql => "graphql",
            Self::Grpc => "grpc",
            Self::Websocket => "websocket",
        }
    }

    pub const fn class_suffix(self) -> &'static str {
        match self {
            Self::Rest => "Controller",
            Self::Graphql => "Resolver",
            Self::Grpc => "Service",
            Self::Websocket => "Handler",
        }
    }
}

impl FromStr for InputAdapterType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rest" => Ok(Self::Rest),
            "graphql" => Ok(Self::Graphql),
            "grpc" => Ok(Self::Grpc),
            "websocket" | "ws" => Ok(Self::Websocket),
            _ => Err(DomainError::UnknownVariant {
                kind: "input adapter type",
                value: s.to_string(),
                expected: "rest, graphql, grpc, websocket",
            }),
        }
    }
}

// ── HttpMethod / ParameterType ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "PATCH" => Ok(Self::Patch),
            _ => Err(DomainError::UnknownVariant {
                kind: "HTTP method",
                value: s.to_string(),
                expected: "GET, POST, PUT, DELETE, PATCH",
            }),
        }
    }
}

/// Where an endpoint parameter is bound from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParameterType {
    Path,
    Body,
    Query,
}

impl ParameterType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "PATH",
            Self::Body => "BODY",
            Self::Query => "QUERY",
        }
    }
}

impl FromStr for ParameterType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PATH" => Ok(Self::Path),
            "BODY" => Ok(Self::Body),
            "QUERY" => Ok(Self::Query),
            _ => Err(DomainError::UnknownVariant {
                kind: "parameter type",
                value: s.to_string(),
                expected: "PATH, BODY, QUERY",
            }),
        }
    }
}

// ── AdapterRole ──────────────────────────────────────────────────────────────

/// Logical placement of an adapter; keys into an architecture's path map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterRole {
    Driven,
    Driving,
}

impl AdapterRole {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Driven => "driven",
            Self::Driving => "driving",
        }
    }
}

impl FromStr for AdapterRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "driven" => Ok(Self::Driven),
            "driving" => Ok(Self::Driving),
            _ => Err(DomainError::UnknownVariant {
                kind: "adapter role",
                value: s.to_string(),
                expected: "driven, driving",
            }),
        }
    }
}

// ── DependencyScope ──────────────────────────────────────────────────────────

/// Gradle configuration a dependency is declared under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DependencyScope {
    #[default]
    Compile,
    Test,
    Runtime,
    CompileOnly,
    AnnotationProcessor,
}

impl DependencyScope {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Compile => "compile",
            Self::Test => "test",
            Self::Runtime => "runtime",
            Self::CompileOnly => "compile-only",
            Self::AnnotationProcessor => "annotation-processor",
        }
    }

    /// The Gradle Kotlin DSL function name, e.g. `testImplementation`.
    pub const fn configuration(self) -> &'static str {
        match self {
            Self::Compile => "implementation",
            Self::Test => "testImplementation",
            Self::Runtime => "runtimeOnly",
            Self::CompileOnly => "compileOnly",
            Self::AnnotationProcessor => "annotationProcessor",
        }
    }

    /// Used in the `// <Label> dependencies` marker comment.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Compile => "Compile",
            Self::Test => "Test",
            Self::Runtime => "Runtime",
            Self::CompileOnly => "Compile-only",
            Self::AnnotationProcessor => "Annotation processor",
        }
    }

    /// Maps a Gradle configuration name back to its scope.
    pub fn from_configuration(name: &str) -> Option<Self> {
        match name {
            "implementation" | "api" => Some(Self::Compile),
            "testImplementation" => Some(Self::Test),
            "runtimeOnly" => Some(Self::Runtime),
            "compileOnly" => Some(Self::CompileOnly),
            "annotationProcessor" => Some(Self::AnnotationProcessor),
            _ => None,
        }
    }
}

impl FromStr for DependencyScope {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(scope) = Self::from_configuration(s) {
            return Ok(scope);
        }
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "compile" => Ok(Self::Compile),
            "test" => Ok(Self::Test),
            "runtime" => Ok(Self::Runtime),
            "compile-only" => Ok(Self::CompileOnly),
            "annotation-processor" => Ok(Self::AnnotationProcessor),
            _ => Err(DomainError::UnknownVariant {
                kind: "dependency scope",
                value: s.to_string(),
                expected: "compile, test, runtime, compile-only, annotation-processor",
            }),
        }
    }
}

// ── ArtifactKind ─────────────────────────────────────────────────────────────

/// What a generation request produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    Entity,
    UseCase,
    Adapter,
    InputAdapter,
}

impl ArtifactKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::UseCase => "use-case",
            Self::Adapter => "adapter",
            Self::InputAdapter => "input-adapter",
        }
    }

    /// Human wording used in result messages ("Failed to generate use case").
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::UseCase => "use case",
            Self::Adapter => "adapter",
            Self::InputAdapter => "input adapter",
        }
    }
}

impl_display_via_as_str!(
    ArchitectureType,
    Framework,
    Paradigm,
    AdapterType,
    InputAdapterType,
    HttpMethod,
    ParameterType,
    AdapterRole,
    DependencyScope,
    ArtifactKind,
);
