//! Generation requests: what the front end asks the orchestrator to build.
//!
//! A request is immutable once built and is consumed by a single run.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::domain::{AdapterType, ArtifactKind, HttpMethod, InputAdapterType, ParameterType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    project_root: PathBuf,
    spec: ArtifactSpec,
}

impl GenerationRequest {
    pub fn new(project_root: impl Into<PathBuf>, spec: impl Into<ArtifactSpec>) -> Self {
        Self {
            project_root: project_root.into(),
            spec: spec.into(),
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn spec(&self) -> &ArtifactSpec {
        &self.spec
    }

    pub fn kind(&self) -> ArtifactKind {
        self.spec.kind()
    }

    pub fn name(&self) -> &str {
        self.spec.name()
    }
}

/// Kind-specific payload of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ArtifactSpec {
    Entity(EntitySpec),
    UseCase(UseCaseSpec),
    Adapter(AdapterSpec),
    InputAdapter(InputAdapterSpec),
}

impl ArtifactSpec {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            Self::Entity(_) => ArtifactKind::Entity,
            Self::UseCase(_) => ArtifactKind::UseCase,
            Self::Adapter(_) => ArtifactKind::Adapter,
            Self::InputAdapter(_) => ArtifactKind::InputAdapter,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Entity(s) => &s.name,
            Self::UseCase(s) => &s.name,
            Self::Adapter(s) => &s.name,
            Self::InputAdapter(s) => &s.name,
        }
    }

    /// Explicit package, if the user gave one.
    pub fn package(&self) -> Option<&str> {
        match self {
            Self::Entity(s) => s.package.as_deref(),
            Self::UseCase(s) => s.package.as_deref(),
            Self::Adapter(s) => s.package.as_deref(),
            Self::InputAdapter(s) => s.package.as_deref(),
        }
    }
}

// ── Entity ──

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitySpec {
    pub name: String,
    pub package: Option<String>,
    pub fields: Vec<EntityField>,
    pub has_id: bool,
    pub id_type: String,
}

impl EntitySpec {
    pub fn new(name: impl Into<String>, fields: Vec<EntityField>) -> Self {
        Self {
            name: name.into(),
            package: None,
            fields,
            has_id: true,
            id_type: "String".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub nullable: bool,
}

impl EntityField {
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
            nullable: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

// ── Use case / methods ──

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UseCaseSpec {
    pub name: String,
    pub package: Option<String>,
    pub methods: Vec<MethodSpec>,
    pub generate_port: bool,
    pub generate_impl: bool,
}

impl UseCaseSpec {
    pub fn new(name: impl Into<String>, methods: Vec<MethodSpec>) -> Self {
        Self {
            name: name.into(),
            package: None,
            methods,
            generate_port: true,
            generate_impl: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSpec {
    pub name: String,
    pub return_type: String,
    pub parameters: Vec<MethodParameter>,
}

impl MethodSpec {
    pub fn new(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            parameters: Vec::new(),
        }
    }

    pub fn param(mut self, name: impl Into<String>, param_type: impl Into<String>) -> Self {
        self.parameters.push(MethodParameter {
            name: name.into(),
            param_type: param_type.into(),
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
}

// ── Adapters ──

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterSpec {
    pub name: String,
    pub package: Option<String>,
    pub adapter_type: AdapterType,
    pub entity_name: String,
    pub methods: Vec<MethodSpec>,
}

impl AdapterSpec {
    pub fn new(
        name: impl Into<String>,
        adapter_type: AdapterType,
        entity_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            package: None,
            adapter_type,
            entity_name: entity_name.into(),
            methods: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputAdapterSpec {
    pub name: String,
    pub package: Option<String>,
    pub adapter_type: InputAdapterType,
    pub use_case_name: String,
    pub endpoints: Vec<Endpoint>,
}

impl InputAdapterSpec {
    pub fn new(
        name: impl Into<String>,
        adapter_type: InputAdapterType,
        use_case_name: impl Into<String>,
        endpoints: Vec<Endpoint>,
    ) -> Self {
        Self {
            name: name.into(),
            package: None,
            adapter_type,
            use_case_name: use_case_name.into(),
            endpoints,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub path: String,
    pub method: HttpMethod,
    pub use_case_method: String,
    pub return_type: String,
    pub parameters: Vec<EndpointParameter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
    pub binding: ParameterType,
}

macro_rules! impl_into_spec {
    ($($ty:ident => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for ArtifactSpec {
                fn from(spec: $ty) -> Self {
                    Self::$variant(spec)
                }
            }
        )+
    };
}

impl_into_spec!(
    EntitySpec => Entity,
    UseCaseSpec => UseCase,
    AdapterSpec => Adapter,
    InputAdapterSpec => InputAdapter,
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_exposes_kind_and_name() {
        let req = GenerationRequest::new(
            "/tmp/shop",
            AdapterSpec::new("OrderCache", AdapterType::Redis, "Order"),
        );
        assert_eq!(req.kind(), ArtifactKind::Adapter);
        assert_eq!(req.name(), "OrderCache");
        assert_eq!(req.spec().package(), None);
    }

    #[test]
    fn endpoint_serializes_to_template_bindings() {
        let ep = Endpoint {
            path: "/orders/{id}".into(),
            method: HttpMethod::Get,
            use_case_method: "findById".into(),
            return_type: "Order".into(),
            parameters: vec![EndpointParameter {
                name: "id".into(),
                param_type: "String".into(),
                binding: ParameterType::Path,
            }],
        };
        let value = serde_json::to_value(&ep).unwrap();
        assert_eq!(value["method"], "GET");
        assert_eq!(value["useCaseMethod"], "findById");
        assert_eq!(value["parameters"][0]["binding"], "PATH");
        assert_eq!(value["parameters"][0]["type"], "String");
    }
}
