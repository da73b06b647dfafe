//! Non-destructive deep merge of YAML documents.
//!
//! Existing values always win. A differing incoming value is reported as a
//! conflict and dropped; keys only present in the incoming document are added.
//! Lists and scalars are atomic leaves.

use serde_yaml::{Mapping, Value};
use tracing::{debug, info, warn};

use crate::domain::DomainError;

pub const SECURITY_WARNING: &str = "# WARNING: Do not store credentials in source control\n# Use environment variables or secret management in production\n";

const SENSITIVE_PATTERNS: &[&str] = &[
    "password",
    "secret",
    "credential",
    "token",
    "key",
    "uri",
    "url",
];

/// Outcome of [`ContentMerger::merge`].
#[derive(Debug, Clone, PartialEq)]
pub struct MergeResult {
    pub merged: Mapping,
    /// Only the inserted entries, nested under their existing parents.
    pub additions: Mapping,
    /// Human-readable, one per conflicting leaf.
    pub conflicts: Vec<String>,
    /// Dotted paths of inserted keys, in insertion order.
    pub added_keys: Vec<String>,
}

impl MergeResult {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    pub fn added_keys_count(&self) -> usize {
        self.added_keys.len()
    }

    pub fn all_conflicts(&self) -> String {
        self.conflicts.join("\n")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContentMerger;

impl ContentMerger {
    pub fn new() -> Self {
        Self
    }

    /// Merges `overlay` into a copy of `base`. Both must be mappings.
    pub fn merge(&self, base: &Value, overlay: &Value) -> Result<MergeResult, DomainError> {
        let base = as_mapping(base, "Base map")?;
        let overlay = as_mapping(overlay, "Overlay map")?;

        let mut merged = base.clone();
        let mut additions = Mapping::new();
        let mut conflicts = Vec::new();
        let mut added_keys = Vec::new();
        merge_into(
            &mut merged,
            overlay,
            "",
            &mut additions,
            &mut conflicts,
            &mut added_keys,
        );

        if !conflicts.is_empty() {
            warn!(count = conflicts.len(), "Conflicts detected during YAML merge");
            for conflict in &conflicts {
                warn!(%conflict, "YAML merge conflict");
            }
        }
        info!(
            added = added_keys.len(),
            conflicts = conflicts.len(),
            "YAML merge completed"
        );

        Ok(MergeResult {
            merged,
            additions,
            conflicts,
            added_keys,
        })
    }

    /// Same retention rule as [`merge`](Self::merge), without the report.
    pub fn deep_merge(&self, base: &Mapping, overlay: &Mapping) -> Mapping {
        let mut merged = base.clone();
        merge_into(
            &mut merged,
            overlay,
            "",
            &mut Mapping::new(),
            &mut Vec::new(),
            &mut Vec::new(),
        );
        merged
    }

    /// Whether merging `key` would record a conflict.
    ///
    /// False for keys missing from either side and for equal values. When
    /// both values are mappings, true only if some nested key conflicts.
    pub fn has_conflict(&self, base: &Mapping, overlay: &Mapping, key: &str) -> bool {
        match (base.get(key), overlay.get(key)) {
            (Some(b), Some(o)) => values_conflict(b, o),
            _ => false,
        }
    }
}

fn values_conflict(base: &Value, overlay: &Value) -> bool {
    match (base, overlay) {
        (Value::Mapping(b), Value::Mapping(o)) => o
            .iter()
            .any(|(k, ov)| b.get(k).is_some_and(|bv| values_conflict(bv, ov))),
        (b, o) => b != o,
    }
}

fn merge_into(
    base: &mut Mapping,
    overlay: &Mapping,
    prefix: &str,
    additions: &mut Mapping,
    conflicts: &mut Vec<String>,
    added: &mut Vec<String>,
) {
    for (key, incoming) in overlay {
        let path = match prefix {
            "" => key_text(key),
            _ => format!("{}.{}", prefix, key_text(key)),
        };

        let Some(existing) = base.get_mut(key) else {
            base.insert(key.clone(), incoming.clone());
            additions.insert(key.clone(), incoming.clone());
            debug!(key = %path, "Added new key");
            added.push(path);
            continue;
        };

        match (existing, incoming) {
            (Value::Mapping(existing), Value::Mapping(incoming)) => {
                let mut nested = Mapping::new();
                merge_into(existing, incoming, &path, &mut nested, conflicts, added);
                if !nested.is_empty() {
                    additions.insert(key.clone(), Value::Mapping(nested));
                }
            }
            (existing, incoming) if *existing != *incoming => {
                debug!(key = %path, "Conflict detected");
                conflicts.push(format!(
                    "Property '{}' already exists with value '{}', keeping existing value (new value: '{}')",
                    path,
                    value_text(existing),
                    value_text(incoming)
                ));
            }
            _ => {}
        }
    }
}

fn as_mapping<'a>(value: &'a Value, label: &'static str) -> Result<&'a Mapping, DomainError> {
    match value {
        Value::Mapping(m) => Ok(m),
        Value::Null => Err(DomainError::NullDocument(label)),
        other => Err(DomainError::InvalidDocument(format!(
            "{label} must be a mapping, got {}",
            value_text(other)
        ))),
    }
}

fn key_text(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => value_text(other),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| format!("{other:?}")),
    }
}

// ── documents ────────────────────────────────────────────────────────────────

/// Parses YAML text; empty or comment-only text is an empty mapping.
pub fn parse_document(text: &str) -> Result<Mapping, DomainError> {
    match serde_yaml::from_str::<Value>(text) {
        Ok(Value::Null) => Ok(Mapping::new()),
        Ok(Value::Mapping(m)) => Ok(m),
        Ok(_) => Err(DomainError::InvalidDocument(
            "top level of a properties document must be a mapping".into(),
        )),
        Err(e) => Err(DomainError::InvalidDocument(e.to_string())),
    }
}

pub fn is_sensitive_key(key: &str) -> bool {
    let lower = key.to_lowercase();
    SENSITIVE_PATTERNS.iter().any(|p| lower.contains(p))
}

/// True if any key, at any depth, looks like it holds a credential.
pub fn contains_sensitive_keys(doc: &Mapping) -> bool {
    doc.iter().any(|(k, v)| {
        is_sensitive_key(&key_text(k))
            || matches!(v, Value::Mapping(nested) if contains_sensitive_keys(nested))
    })
}

/// Writes `additions` into `existing` without rewriting any of its lines.
/// Each new key lands after the last line of its parent block, indented like
/// its siblings. Prepends [`SECURITY_WARNING`] once when an added key looks
/// sensitive.
pub fn render_document(existing: &str, additions: &Mapping) -> Result<String, DomainError> {
    let newline = if existing.contains("\r\n") { "\r\n" } else { "\n" };
    let mut lines: Vec<String> = existing.lines().map(str::to_owned).collect();
    let end = lines.len();
    splice(&mut lines, 0, end, None, additions)?;

    let mut out = lines.join(newline);
    if !out.is_empty() {
        out.push_str(newline);
    }
    if contains_sensitive_keys(additions) && !out.contains("Do not store credentials") {
        out.insert_str(0, &SECURITY_WARNING.replace('\n', newline));
    }
    Ok(out)
}

/// Inserts `additions` into the block spanning `lines[start..end]` and
/// returns the block's new end.
fn splice(
    lines: &mut Vec<String>,
    start: usize,
    mut end: usize,
    parent_indent: Option<usize>,
    additions: &Mapping,
) -> Result<usize, DomainError> {
    let indent = (start..end)
        .find_map(|i| content_indent(&lines[i]))
        .unwrap_or_else(|| parent_indent.map_or(0, |p| p + 2));

    for (key, value) in additions {
        let name = key_text(key);
        let found = (start..end).find(|&i| {
            content_indent(&lines[i]) == Some(indent) && line_key(&lines[i]) == Some(name.as_str())
        });

        match (found, value) {
            (Some(at), Value::Mapping(nested)) => {
                if !opens_block(&lines[at]) {
                    return Err(DomainError::InvalidDocument(format!(
                        "cannot add keys under inline value of '{name}'; rewrite it in block style"
                    )));
                }
                let block_end = (at + 1..end)
                    .find(|&i| content_indent(&lines[i]).is_some_and(|n| n <= indent))
                    .unwrap_or(end);
                let new_end = splice(lines, at + 1, block_end, Some(indent), nested)?;
                end += new_end - block_end;
            }
            (Some(_), _) => debug!(key = %name, "Key already present"),
            (None, _) => {
                let mut entry = Mapping::new();
                entry.insert(key.clone(), value.clone());
                let text = serde_yaml::to_string(&entry)
                    .map_err(|e| DomainError::InvalidDocument(e.to_string()))?;
                let pad = " ".repeat(indent);
                let inserted: Vec<String> = text
                    .lines()
                    .map(|l| if l.is_empty() { String::new() } else { format!("{pad}{l}") })
                    .collect();

                let at = (start..end)
                    .rev()
                    .find(|&i| content_indent(&lines[i]).is_some())
                    .map_or(start, |i| i + 1);
                end += inserted.len();
                lines.splice(at..at, inserted);
            }
        }
    }
    Ok(end)
}

/// Indentation of a line carrying YAML content; `None` for blanks and comments.
fn content_indent(line: &str) -> Option<usize> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    Some(line.len() - trimmed.len())
}

/// `  host: x` -> `host`; list items have no key.
fn line_key(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.starts_with('-') {
        return None;
    }
    let (key, _) = trimmed.split_once(':')?;
    Some(key.trim().trim_matches(|c| c == '"' || c == '\''))
}

/// `key:` with nothing but an optional comment after the colon.
fn opens_block(line: &str) -> bool {
    line.split_once(':').is_some_and(|(_, rest)| {
        let rest = rest.trim();
        rest.is_empty() || rest.starts_with('#')
    })
}
