//! Version and framework conflicts between declared and incoming dependencies.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::domain::{Dependency, Framework};

/// `group:artifact` -> version, as stored under `dependencyOverrides`.
pub type VersionOverrides = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictDetector;

impl ConflictDetector {
    pub fn new() -> Self {
        Self
    }

    /// One message per `group:artifact` declared on both sides with a
    /// different version string. Versions are compared textually.
    pub fn detect_version_conflicts(
        &self,
        existing: &[Dependency],
        incoming: &[Dependency],
    ) -> Vec<String> {
        let mut existing_versions: HashMap<String, &str> = HashMap::new();
        for dep in existing {
            existing_versions.insert(dep.key(), dep.version.as_str());
        }

        let mut reported = HashSet::new();
        let mut conflicts = Vec::new();
        for dep in incoming {
            let key = dep.key();
            let Some(existing_version) = existing_versions.get(&key) else {
                continue;
            };
            if *existing_version != dep.version && reported.insert(key.clone()) {
                conflicts.push(format!(
                    "Version conflict for {key}: existing version {existing_version}, new version {}",
                    dep.version
                ));
            }
        }
        conflicts
    }

    /// Flags incoming dependencies from groups known to clash with `framework`.
    pub fn detect_framework_conflicts(
        &self,
        framework: Framework,
        incoming: &[Dependency],
    ) -> Vec<String> {
        let rules = incompatible_groups(framework);
        incoming
            .iter()
            .filter_map(|dep| {
                let (_, alternatives) = rules.iter().find(|(group, _)| *group == dep.group)?;
                Some(format!(
                    "Framework conflict: {} may be incompatible with {} framework. Consider using {} alternatives.",
                    dep.key(),
                    framework,
                    alternatives.join(", ")
                ))
            })
            .collect()
    }

    /// Remediation guidance for a batch of conflict messages.
    pub fn suggest_resolution(&self, conflicts: &[String]) -> Vec<String> {
        if conflicts.is_empty() {
            return Vec::new();
        }

        let mut out: Vec<String> = vec![
            "Dependency conflicts detected. Consider the following resolutions:".into(),
            String::new(),
        ];

        if conflicts.iter().any(|c| c.contains("Version conflict")) {
            out.extend(
                [
                    "• For version conflicts:",
                    "  - Use dependency management to enforce a single version",
                    "  - Add version override in .cleanarch.yml under 'dependencyOverrides'",
                    "  - Example: dependencyOverrides:",
                    "      'org.springframework.boot:spring-boot-starter': '3.2.0'",
                ]
                .map(String::from),
            );
        }

        if conflicts.iter().any(|c| c.contains("Framework conflict")) {
            out.extend(
                [
                    "• For framework conflicts:",
                    "  - Review adapter dependencies for framework compatibility",
                    "  - Use framework-specific adapter variants when available",
                    "  - Consult framework documentation for compatible libraries",
                ]
                .map(String::from),
            );
        }

        out.extend(
            [
                "",
                "To override dependency versions, add to .cleanarch.yml:",
                "dependencyOverrides:",
                "  'group:artifact': 'version'",
            ]
            .map(String::from),
        );
        out
    }

    pub fn version_override<'a>(
        &self,
        dependency: &Dependency,
        overrides: Option<&'a VersionOverrides>,
    ) -> Option<&'a str> {
        overrides?.get(&dependency.key()).map(String::as_str)
    }

    /// Substitutes overridden versions; scopes and order are kept.
    pub fn apply_version_overrides(
        &self,
        dependencies: &[Dependency],
        overrides: Option<&VersionOverrides>,
    ) -> Vec<Dependency> {
        dependencies
            .iter()
            .map(|dep| match self.version_override(dep, overrides) {
                Some(version) => dep.clone().with_version(version),
                None => dep.clone(),
            })
            .collect()
    }
}

fn incompatible_groups(framework: Framework) -> &'static [(&'static str, &'static [&'static str])] {
    match framework {
        Framework::Spring => &[
            ("javax.enterprise", &["spring-context", "spring-boot-starter"]),
            ("io.quarkus", &["spring-boot-starter"]),
        ],
        Framework::Quarkus => &[
            ("org.springframework", &["quarkus-arc", "quarkus-resteasy"]),
            ("org.springframework.boot", &["quarkus-arc", "quarkus-resteasy"]),
        ],
        Framework::Micronaut => &[
            ("org.springframework", &["micronaut-inject"]),
            ("io.quarkus", &["micronaut-inject"]),
        ],
    }
}
