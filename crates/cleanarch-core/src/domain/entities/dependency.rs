use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::{DependencyScope, DomainError};

/// A Maven coordinate plus the Gradle scope it is declared under.
///
/// Identity for conflict and duplicate checks is `(group, artifact)`; see
/// [`Dependency::key`]. The full `group:artifact:version` string is what
/// descriptor idempotence checks look for in raw file text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    pub group: String,
    pub artifact: String,
    pub version: String,
    #[serde(default)]
    pub scope: DependencyScope,
}

impl Dependency {
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
        scope: DependencyScope,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
            scope,
        }
    }

    pub fn compile(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self::new(group, artifact, version, DependencyScope::Compile)
    }

    pub fn test(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self::new(group, artifact, version, DependencyScope::Test)
    }

    /// Parses `group:artifact:version`.
    pub fn parse(coordinate: &str, scope: DependencyScope) -> Result<Self, DomainError> {
        let parts: Vec<&str> = coordinate.trim().split(':').collect();
        match parts.as_slice() {
            [group, artifact, version]
                if !group.is_empty() && !artifact.is_empty() && !version.is_empty() =>
            {
                Ok(Self::new(*group, *artifact, *version, scope))
            }
            _ => Err(DomainError::ParseFailed {
                what: "dependency coordinate",
                input: coordinate.to_string(),
                reason: "expected group:artifact:version".into(),
            }),
        }
    }

    /// `group:artifact`
    pub fn key(&self) -> String {
        format!("{}:{}", self.group, self.artifact)
    }

    /// `group:artifact:version`
    pub fn coordinate(&self) -> String {
        format!("{}:{}:{}", self.group, self.artifact, self.version)
    }

    /// The descriptor line body, e.g. `testImplementation("g:a:1.0")`.
    pub fn declaration(&self) -> String {
        format!("{}(\"{}\")", self.scope.configuration(), self.coordinate())
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_scope(mut self, scope: DependencyScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn is_complete(&self) -> bool {
        !self.group.trim().is_empty()
            && !self.artifact.trim().is_empty()
            && !self.version.trim().is_empty()
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.coordinate())
    }
}
