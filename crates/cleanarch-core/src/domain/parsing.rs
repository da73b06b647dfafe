//! Parsers for the compact command-line notations and naming helpers.
//!
//! Notations:
//! - fields: `id:String,email:String?` (trailing `?` marks a nullable field)
//! - methods: `findById:Order:id:String|save:Order:order:Order`
//! - endpoints: `/orders/{id}:GET:findById:Order:id:PATH:String|...`

use crate::domain::{
    DomainError, Endpoint, EndpointParameter, EntityField, HttpMethod, MethodSpec, ParameterType,
};

pub fn parse_fields(input: &str) -> Result<Vec<EntityField>, DomainError> {
    let mut fields = Vec::new();
    for entry in input.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let Some((name, field_type)) = entry.split_once(':') else {
            return Err(malformed("field", entry, "expected name:Type"));
        };
        let (name, field_type) = (name.trim(), field_type.trim());
        if name.is_empty() || field_type.is_empty() || field_type.contains(':') {
            return Err(malformed("field", entry, "expected name:Type"));
        }
        fields.push(match field_type.strip_suffix('?') {
            Some(base) => EntityField::new(name, base.trim()).nullable(),
            None => EntityField::new(name, field_type),
        });
    }
    Ok(fields)
}

pub fn parse_methods(input: &str) -> Result<Vec<MethodSpec>, DomainError> {
    let mut methods = Vec::new();
    for entry in input.split('|').map(str::trim).filter(|e| !e.is_empty()) {
        let parts: Vec<&str> = entry.split(':').map(str::trim).collect();
        if parts.len() < 2 {
            return Err(malformed("method", entry, "expected name:ReturnType"));
        }
        if parts.len() % 2 != 0 {
            return Err(malformed("method", entry, "parameter without a type"));
        }
        let mut method = MethodSpec::new(parts[0], parts[1]);
        for pair in parts[2..].chunks_exact(2) {
            method = method.param(pair[0], pair[1]);
        }
        methods.push(method);
    }
    Ok(methods)
}

pub fn parse_endpoints(input: &str) -> Result<Vec<Endpoint>, DomainError> {
    let mut endpoints = Vec::new();
    for entry in input.split('|').map(str::trim).filter(|e| !e.is_empty()) {
        let parts: Vec<&str> = entry.split(':').map(str::trim).collect();
        if parts.len() < 4 {
            return Err(malformed(
                "endpoint",
                entry,
                "expected /path:METHOD:useCaseMethod:ReturnType",
            ));
        }
        if (parts.len() - 4) % 3 != 0 {
            return Err(malformed(
                "endpoint",
                entry,
                "parameters come in name:PARAMTYPE:Type triples",
            ));
        }
        let method: HttpMethod = parts[1].parse()?;
        let mut parameters = Vec::new();
        for triple in parts[4..].chunks_exact(3) {
            parameters.push(EndpointParameter {
                name: triple[0].to_string(),
                binding: triple[1].parse::<ParameterType>()?,
                param_type: triple[2].to_string(),
            });
        }
        endpoints.push(Endpoint {
            path: parts[0].to_string(),
            method,
            use_case_method: parts[2].to_string(),
            return_type: parts[3].to_string(),
            parameters,
        });
    }
    Ok(endpoints)
}

/// The explicit package when given, else `<base>.<default_suffix>`.
pub fn resolve_package(explicit: Option<&str>, base: &str, default_suffix: &str) -> String {
    match explicit.map(str::trim) {
        Some(pkg) if !pkg.is_empty() => pkg.to_string(),
        _ => format!("{base}.{default_suffix}"),
    }
}

/// `RedisCache` -> `redis-cache`, `orderAPI` -> `order-api`.
pub fn to_kebab_case(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == ' ' || c == '-' {
            if !out.ends_with('-') && !out.is_empty() {
                out.push('-');
            }
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if (prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower))
                && !out.ends_with('-')
            {
                out.push('-');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// `OrderService` -> `orderService`, `order-service` -> `orderService`.
pub fn to_camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut upper_next = false;
    for c in input.chars() {
        if c == '-' || c == '_' || c == ' ' {
            upper_next = !out.is_empty();
            continue;
        }
        if out.is_empty() {
            out.extend(c.to_lowercase());
        } else if upper_next {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        upper_next = false;
    }
    out
}

fn malformed(what: &'static str, input: &str, reason: &str) -> DomainError {
    DomainError::ParseFailed {
        what,
        input: input.to_string(),
        reason: reason.to_string(),
    }
}
