//! Structural validators for generation requests.
//!
//! Pure predicates: no I/O, no early return. Every problem found is pushed
//! into the returned [`ValidationResult`] so a user sees all of them at once.

use crate::domain::{
    AdapterSpec, EntitySpec, InputAdapterSpec, MethodSpec, UseCaseSpec, ValidationResult,
};

const JAVA_KEYWORDS: &[&str] = &[
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "try",
    "void",
    "volatile",
    "while",
    "true",
    "false",
    "null",
];

const VALID_ID_TYPES: &[&str] = &["String", "Long", "UUID"];

// ── predicates ───────────────────────────────────────────────────────────────

pub fn is_java_keyword(word: &str) -> bool {
    JAVA_KEYWORDS.contains(&word)
}

/// `[A-Za-z_$][A-Za-z0-9_$]*`
pub fn is_java_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// PascalCase: `[A-Z][a-zA-Z0-9]*`
pub fn is_class_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

/// camelCase: `[a-z][a-zA-Z0-9]*`
pub fn is_field_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

fn is_package_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

// ── packages ─────────────────────────────────────────────────────────────────

pub fn validate_package(package: &str) -> ValidationResult {
    let mut result = ValidationResult::success();

    if package.trim().is_empty() {
        result.add_error("Package name cannot be null or empty");
        return result;
    }

    if package.starts_with('.') || package.ends_with('.') {
        result.add_error(format!(
            "Package name cannot start or end with a dot: {package}"
        ));
    }

    let mut segments: Vec<&str> = package.split('.').collect();
    while segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }

    if segments.len() < 2 {
        result.add_error(format!(
            "Package name must contain at least two segments: {package}"
        ));
        result.add_error("Example: com.company.service");
    }

    for (i, segment) in segments.iter().enumerate() {
        if segment.is_empty() {
            result.add_error(format!(
                "Package name contains empty segment at position {}: {}",
                i + 1,
                package
            ));
            continue;
        }
        if !segment.starts_with(|c: char| c.is_lowercase()) {
            result.add_error(format!(
                "Package segment must start with lowercase letter: '{segment}' in {package}"
            ));
        }
        if !is_package_segment(segment) {
            result.add_error(format!(
                "Package segment contains invalid characters: '{segment}' in {package}"
            ));
            result.add_error(
                "Segments must contain only lowercase letters, numbers, and underscores",
            );
        }
        if is_java_keyword(segment) {
            result.add_error(format!(
                "Package segment cannot be a Java reserved keyword: '{segment}' in {package}"
            ));
        }
    }

    result
}

/// The package must live strictly below the project's base package.
pub fn validate_base_package_consistency(package: &str, base_package: &str) -> ValidationResult {
    let mut result = ValidationResult::success();

    if package == base_package {
        result.add_error("Package cannot be exactly the base package");
        result.add_error(format!("  Package: {package}"));
        result.add_error("Add additional segments for layer/component organization");
        result.add_error(format!(
            "Example: {base_package}.domain or {base_package}.application"
        ));
    } else if !package.starts_with(&format!("{base_package}.")) {
        result.add_error("Package does not start with base package");
        result.add_error(format!("  Package: {package}"));
        result.add_error(format!("  Base package: {base_package}"));
        result.add_error(
            "All packages must start with the base package defined in .cleanarch.yml",
        );
    }

    result
}

fn validate_adapter_package(package: &str, result: &mut ValidationResult) {
    if package.trim().is_empty() {
        result.add_error("Package name is required");
    } else if !validate_package(package).is_valid() {
        result.add_error(format!("Invalid package name: {package}"));
    } else if package.contains(".adapter.out.") {
        result.add_error(
            "Invalid package structure: use 'driven-adapters' instead of 'adapter.out'. Example: com.company.infrastructure.driven-adapters.redis",
        );
    } else if package.contains(".adapter.in.") {
        result.add_error(
            "Invalid package structure: use 'entry-points' instead of 'adapter.in'. Example: com.company.infrastructure.entry-points.rest",
        );
    }
}

fn validate_methods(methods: &[MethodSpec], result: &mut ValidationResult) {
    for method in methods {
        if method.name.trim().is_empty() {
            result.add_error("Method name is required");
        } else if !is_java_identifier(&method.name) {
            result.add_error(format!("Invalid method name: {}", method.name));
        }
        if method.return_type.trim().is_empty() {
            result.add_error(format!(
                "Method return type is required for method: {}",
                method.name
            ));
        }
        for param in &method.parameters {
            if param.name.trim().is_empty() {
                result.add_error(format!(
                    "Parameter name is required in method: {}",
                    method.name
                ));
            } else if !is_java_identifier(&param.name) {
                result.add_error(format!(
                    "Invalid parameter name: {} in method: {}",
                    param.name, method.name
                ));
            }
            if param.param_type.trim().is_empty() {
                result.add_error(format!(
                    "Parameter type is required for parameter: {}",
                    param.name
                ));
            }
        }
    }
}

// ── per-kind validators ──────────────────────────────────────────────────────

pub fn validate_entity(spec: &EntitySpec) -> ValidationResult {
    let mut result = ValidationResult::success();

    if spec.name.trim().is_empty() {
        result.add_error("Entity name is required");
    } else if !is_class_name(&spec.name) {
        result.add_error(
            "Entity name must be a valid Java class name (PascalCase, no spaces or special characters)",
        );
    }

    if spec.fields.is_empty() {
        result.add_error("Entity must have at least one field");
    }
    for field in &spec.fields {
        if field.name.trim().is_empty() {
            result.add_error("Field name cannot be empty");
        } else if !is_field_name(&field.name) {
            result.add_error(format!(
                "Invalid field name: {}. Must be camelCase",
                field.name
            ));
        }
        if field.field_type.trim().is_empty() {
            result.add_error(format!(
                "Field type cannot be empty for field: {}",
                field.name
            ));
        }
    }

    if spec.has_id && !VALID_ID_TYPES.contains(&spec.id_type.as_str()) {
        result.add_error(format!(
            "Invalid ID type: {}. Valid types: String, Long, UUID",
            spec.id_type
        ));
    }

    result
}

/// `package` is the resolved package (explicit or derived from the base).
pub fn validate_use_case(spec: &UseCaseSpec, package: &str) -> ValidationResult {
    let mut result = ValidationResult::success();

    if spec.name.trim().is_empty() {
        result.add_error("Use case name is required");
    } else if !is_java_identifier(&spec.name) {
        result.add_error(format!(
            "Use case name must be a valid Java identifier: {}",
            spec.name
        ));
    }

    if package.trim().is_empty() {
        result.add_error("Package name is required");
    } else if !validate_package(package).is_valid() {
        result.add_error(format!("Invalid package name: {package}"));
    }

    if spec.methods.is_empty() {
        result.add_error("At least one method is required");
    } else {
        validate_methods(&spec.methods, &mut result);
    }

    if !spec.generate_port && !spec.generate_impl {
        result.add_error("At least one of generatePort or generateImpl must be true");
    }

    result
}

pub fn validate_adapter(spec: &AdapterSpec, package: &str) -> ValidationResult {
    let mut result = ValidationResult::success();

    if spec.name.trim().is_empty() {
        result.add_error("Adapter name is required");
    } else if !is_java_identifier(&spec.name) {
        result.add_error(format!(
            "Adapter name must be a valid Java identifier: {}",
            spec.name
        ));
    }

    validate_adapter_package(package, &mut result);

    if spec.entity_name.trim().is_empty() {
        result.add_error("Entity name is required");
    }

    validate_methods(&spec.methods, &mut result);
    result
}

pub fn validate_input_adapter(spec: &InputAdapterSpec, package: &str) -> ValidationResult {
    let mut result = ValidationResult::success();

    if spec.name.trim().is_empty() {
        result.add_error("Adapter name is required");
    } else if !is_java_identifier(&spec.name) {
        result.add_error(format!(
            "Adapter name must be a valid Java identifier: {}",
            spec.name
        ));
    }

    validate_adapter_package(package, &mut result);

    if spec.use_case_name.trim().is_empty() {
        result.add_error("Use case name is required");
    }

    if spec.endpoints.is_empty() {
        result.add_error("At least one endpoint is required");
    }
    for endpoint in &spec.endpoints {
        if endpoint.path.trim().is_empty() {
            result.add_error("Endpoint path is required");
        } else if !endpoint.path.starts_with('/') {
            result.add_error(format!(
                "Endpoint path must start with '/': {}",
                endpoint.path
            ));
        }
        if endpoint.use_case_method.trim().is_empty() {
            result.add_error(format!(
                "Use case method is required for endpoint: {}",
                endpoint.path
            ));
        }
        if endpoint.return_type.trim().is_empty() {
            result.add_error(format!(
                "Return type is required for endpoint: {}",
                endpoint.path
            ));
        }
        for param in &endpoint.parameters {
            if param.name.trim().is_empty() {
                result.add_error(format!(
                    "Parameter name is required in endpoint: {}",
                    endpoint.path
                ));
            }
            if param.param_type.trim().is_empty() {
                result.add_error(format!(
                    "Parameter type is required for parameter: {}",
                    param.name
                ));
            }
        }
    }

    result
}
