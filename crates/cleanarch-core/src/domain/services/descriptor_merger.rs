//! Line-level edits to Gradle Kotlin DSL descriptors.
//!
//! The descriptor is never parsed into a syntax tree. Existing lines are
//! carried through byte-for-byte (line endings included); new declarations
//! are only ever inserted between them.

use regex::Regex;
use std::sync::LazyLock;

use crate::domain::{Dependency, DependencyScope, DomainError};

static BLOCK_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*dependencies\s*\{").expect("block pattern is valid"));

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\s*)([A-Za-z]+)\s*\(\s*"([^":\s]+):([^":\s]+):([^"\s]+)"\s*\)"#)
        .expect("declaration pattern is valid")
});

const DEFAULT_INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptorMerger;

impl DescriptorMerger {
    pub fn new() -> Self {
        Self
    }

    /// Ensures every dependency is declared in `text`.
    ///
    /// Returns `Ok(None)` when all declarations are already present verbatim,
    /// so callers can skip the write entirely.
    pub fn ensure_dependencies(
        &self,
        text: &str,
        dependencies: &[Dependency],
    ) -> Result<Option<String>, DomainError> {
        let eol = line_ending(text);
        let mut lines: Vec<String> = text.split_inclusive('\n').map(str::to_string).collect();
        let mut changed = false;

        for dependency in dependencies {
            let declaration = dependency.declaration();
            if lines.iter().any(|line| line.contains(&declaration)) {
                continue;
            }
            match find_block(&lines)? {
                Some(block) => insert_into_block(&mut lines, block, dependency, eol),
                None => append_block(&mut lines, dependency, eol),
            }
            changed = true;
        }

        Ok(changed.then(|| lines.concat()))
    }

    /// Ensures `include(":<module path>")` is present in a settings script.
    pub fn ensure_include(&self, text: &str, module_path: &str) -> Option<String> {
        let include = settings_include(module_path);
        if text.contains(&include) {
            return None;
        }
        let eol = line_ending(text);
        let mut out = text.to_string();
        if !out.is_empty() && !out.ends_with('\n') {
            out.push_str(eol);
        }
        out.push_str(&include);
        out.push_str(eol);
        Some(out)
    }
}

/// `infrastructure/driven-adapters/redis` -> `include(":infrastructure:driven-adapters:redis")`
pub fn settings_include(module_path: &str) -> String {
    let gradle_path = module_path
        .split(['/', '\\'])
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(":");
    format!("include(\":{gradle_path}\")")
}

/// Every `scope("group:artifact:version")` declaration in `text` whose scope
/// is a known Gradle configuration.
pub fn parse_declarations(text: &str) -> Vec<Dependency> {
    text.lines()
        .filter_map(|line| {
            let caps = DECLARATION.captures(line)?;
            let scope = DependencyScope::from_configuration(&caps[2])?;
            Some(Dependency::new(&caps[3], &caps[4], &caps[5], scope))
        })
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct Block {
    open: usize,
    close: usize,
}

fn line_ending(text: &str) -> &'static str {
    if text.contains("\r\n") { "\r\n" } else { "\n" }
}

/// Locates the first top-level `dependencies { ... }` block.
fn find_block(lines: &[String]) -> Result<Option<Block>, DomainError> {
    let mut depth: i64 = 0;
    let mut open: Option<(usize, i64)> = None;

    for (idx, line) in lines.iter().enumerate() {
        if open.is_none() && depth == 0 && BLOCK_OPEN.is_match(line) {
            open = Some((idx, depth));
        }
        depth += brace_delta(line);
        if let Some((start, base)) = open {
            if depth <= base {
                return Ok(Some(Block { open: start, close: idx }));
            }
        }
    }

    match open {
        Some(_) => Err(DomainError::InvalidDocument(
            "unterminated dependencies block in build descriptor".into(),
        )),
        None => Ok(None),
    }
}

/// Net brace count of a line, ignoring string literals and `//` comments.
fn brace_delta(line: &str) -> i64 {
    let mut delta = 0;
    let mut in_string = false;
    let mut escaped = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '/' if chars.peek() == Some(&'/') => break,
            '{' => delta += 1,
            '}' => delta -= 1,
            _ => {}
        }
    }
    delta
}

fn insert_into_block(lines: &mut Vec<String>, block: Block, dependency: &Dependency, eol: &str) {
    if block.open == block.close {
        let close = split_inline_block(lines, block.open, eol);
        return insert_into_block(
            lines,
            Block {
                open: block.open,
                close,
            },
            dependency,
            eol,
        );
    }

    let body = (block.open + 1)..block.close;
    let configuration = dependency.scope.configuration();

    let last_same_scope = body.clone().rev().find(|&i| {
        DECLARATION
            .captures(&lines[i])
            .is_some_and(|caps| &caps[2] == configuration)
    });

    if let Some(idx) = last_same_scope {
        let indent = indent_of(&lines[idx]);
        ensure_terminated(&mut lines[idx], eol);
        lines.insert(idx + 1, format!("{indent}{}{eol}", dependency.declaration()));
        return;
    }

    let indent = body
        .clone()
        .find_map(|i| DECLARATION.captures(&lines[i]).map(|caps| caps[1].to_string()))
        .unwrap_or_else(|| DEFAULT_INDENT.to_string());
    let has_content = body.clone().any(|i| !lines[i].trim().is_empty());

    let mut insertion = Vec::with_capacity(3);
    if has_content {
        insertion.push(eol.to_string());
    }
    insertion.push(format!("{indent}// {} dependencies{eol}", dependency.scope.label()));
    insertion.push(format!("{indent}{}{eol}", dependency.declaration()));

    if block.close > 0 {
        ensure_terminated(&mut lines[block.close - 1], eol);
    }
    for (offset, line) in insertion.into_iter().enumerate() {
        lines.insert(block.close + offset, line);
    }
}

/// Rewrites a one-line `dependencies { ... }` into opening, body and closing
/// lines, keeping any inline declaration in the body. Returns the index of
/// the closing line.
fn split_inline_block(lines: &mut Vec<String>, idx: usize, eol: &str) -> usize {
    let line = lines[idx].trim_end_matches(['\r', '\n']).to_string();
    let indent = indent_of(&line);
    let (head, tail) = match line.find('{') {
        Some(pos) => line.split_at(pos + 1),
        None => (line.as_str(), ""),
    };
    let (inner, close) = match tail.rfind('}') {
        Some(pos) => tail.split_at(pos),
        None => (tail, "}"),
    };

    let mut replacement = vec![format!("{}{eol}", head.trim_end())];
    let inner = inner.trim();
    if !inner.is_empty() {
        replacement.push(format!("{indent}{DEFAULT_INDENT}{inner}{eol}"));
    }
    replacement.push(format!("{indent}{}{eol}", close.trim()));

    let close_idx = idx + replacement.len() - 1;
    lines.splice(idx..=idx, replacement);
    close_idx
}

fn append_block(lines: &mut Vec<String>, dependency: &Dependency, eol: &str) {
    if let Some(last) = lines.last_mut() {
        ensure_terminated(last, eol);
        lines.push(eol.to_string());
    }
    lines.push(format!("dependencies {{{eol}"));
    lines.push(format!("{DEFAULT_INDENT}{}{eol}", dependency.declaration()));
    lines.push(format!("}}{eol}"));
}

fn indent_of(line: &str) -> String {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').collect()
}

fn ensure_terminated(line: &mut String, eol: &str) {
    if !line.ends_with('\n') {
        line.push_str(eol);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &str = "plugins {\n    java\n}\n\ndependencies {\n    implementation(\"g:a:1\")\n    implementation(\"g:b:2\")\n    testImplementation(\"g:c:3\")\n}\n";

    fn ensure(text: &str, deps: &[Dependency]) -> Option<String> {
        DescriptorMerger::new().ensure_dependencies(text, deps).unwrap()
    }

    // ── insertion ──

    #[test]
    fn test_dependency_lands_after_last_test_line() {
        let out = ensure(MIXED, &[Dependency::test("g", "d", "4")]).unwrap();
        assert_eq!(
            out,
            "plugins {\n    java\n}\n\ndependencies {\n    implementation(\"g:a:1\")\n    implementation(\"g:b:2\")\n    testImplementation(\"g:c:3\")\n    testImplementation(\"g:d:4\")\n}\n"
        );
    }

    #[test]
    fn missing_scope_gets_a_marker_before_the_closing_brace() {
        let text = "dependencies {\n    implementation(\"g:a:1\")\n}\n";
        let out = ensure(text, &[Dependency::test("g", "t", "1")]).unwrap();
        assert_eq!(
            out,
            "dependencies {\n    implementation(\"g:a:1\")\n\n    // Test dependencies\n    testImplementation(\"g:t:1\")\n}\n"
        );
    }

    #[test]
    fn indentation_is_copied_from_neighbours() {
        let text = "dependencies {\n\timplementation(\"g:a:1\")\n}\n";
        let out = ensure(text, &[Dependency::compile("g", "b", "2")]).unwrap();
        assert!(out.contains("\timplementation(\"g:a:1\")\n\timplementation(\"g:b:2\")\n"));
    }

    #[test]
    fn several_dependencies_of_one_scope_stay_grouped() {
        let text = "dependencies {\n    implementation(\"g:a:1\")\n}\n";
        let out = ensure(
            text,
            &[Dependency::test("g", "t1", "1"), Dependency::test("g", "t2", "1")],
        )
        .unwrap();
        assert!(out.ends_with(
            "    // Test dependencies\n    testImplementation(\"g:t1:1\")\n    testImplementation(\"g:t2:1\")\n}\n"
        ));
        assert_eq!(out.matches("// Test dependencies").count(), 1);
    }

    #[test]
    fn buildscript_dependencies_are_not_the_target_block() {
        let text = "buildscript {\n    dependencies {\n        classpath(\"x:y:1\")\n    }\n}\ndependencies {\n    implementation(\"g:a:1\")\n}\n";
        let out = ensure(text, &[Dependency::compile("g", "b", "2")]).unwrap();
        assert!(out.contains("    implementation(\"g:a:1\")\n    implementation(\"g:b:2\")\n}\n"));
        assert!(out.starts_with("buildscript {\n    dependencies {\n        classpath(\"x:y:1\")\n    }\n}\n"));
    }

    #[test]
    fn missing_block_is_appended() {
        let out = ensure("plugins { java }", &[Dependency::compile("g", "a", "1")]).unwrap();
        assert_eq!(
            out,
            "plugins { java }\n\ndependencies {\n    implementation(\"g:a:1\")\n}\n"
        );
    }

    #[test]
    fn inline_empty_block_is_opened_up() {
        let out = ensure("dependencies {}\n", &[Dependency::test("g", "a", "1")]).unwrap();
        assert_eq!(
            out,
            "dependencies {\n    // Test dependencies\n    testImplementation(\"g:a:1\")\n}\n"
        );
    }

    #[test]
    fn inline_declaration_is_kept_before_the_new_one() {
        let out = ensure(
            "plugins { java }\ndependencies { implementation(\"g:a:1\") }\n",
            &[Dependency::compile("g", "b", "2")],
        )
        .unwrap();
        assert_eq!(
            out,
            "plugins { java }\ndependencies {\n    implementation(\"g:a:1\")\n    implementation(\"g:b:2\")\n}\n"
        );
    }

    #[test]
    fn inline_block_keeps_its_trailing_comment() {
        let out = ensure(
            "dependencies { implementation(\"g:a:1\") } // pinned\n",
            &[Dependency::test("g", "t", "1")],
        )
        .unwrap();
        assert_eq!(
            out,
            "dependencies {\n    implementation(\"g:a:1\")\n\n    // Test dependencies\n    testImplementation(\"g:t:1\")\n} // pinned\n"
        );
    }

    #[test]
    fn crlf_line_endings_are_kept() {
        let text = "dependencies {\r\n    implementation(\"g:a:1\")\r\n}\r\n";
        let out = ensure(text, &[Dependency::compile("g", "b", "2")]).unwrap();
        assert_eq!(
            out,
            "dependencies {\r\n    implementation(\"g:a:1\")\r\n    implementation(\"g:b:2\")\r\n}\r\n"
        );
    }

    #[test]
    fn braces_in_strings_and_comments_are_ignored() {
        let text = "dependencies {\n    // }\n    implementation(\"g:a:1\") // {\n    implementation(\"g:}:1\")\n}\n";
        let out = ensure(text, &[Dependency::test("g", "t", "1")]).unwrap();
        assert!(out.ends_with("    testImplementation(\"g:t:1\")\n}\n"));
    }

    #[test]
    fn unterminated_block_is_an_error() {
        let err = DescriptorMerger::new()
            .ensure_dependencies("dependencies {\n    implementation(\"g:a:1\")\n", &[
                Dependency::compile("g", "b", "2"),
            ])
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidDocument(_)));
    }

    // ── idempotence ──

    #[test]
    fn present_coordinate_means_no_rewrite() {
        assert!(ensure(MIXED, &[Dependency::test("g", "c", "3")]).is_none());
        assert!(ensure(MIXED, &[]).is_none());
    }

    #[test]
    fn second_application_is_a_no_op() {
        let deps = [Dependency::test("g", "d", "4"), Dependency::compile("g", "e", "5")];
        let once = ensure(MIXED, &deps).unwrap();
        assert!(ensure(&once, &deps).is_none());
    }

    #[test]
    fn existing_lines_keep_their_order() {
        let out = ensure(MIXED, &[Dependency::compile("g", "z", "9")]).unwrap();
        let original: Vec<&str> = MIXED.lines().collect();
        let kept: Vec<&str> = out.lines().filter(|l| !l.contains("g:z:9")).collect();
        assert_eq!(original, kept);
    }

    // ── settings includes ──

    #[test]
    fn include_is_added_once() {
        let merger = DescriptorMerger::new();
        let text = "rootProject.name = \"shop\"";
        let out = merger
            .ensure_include(text, "infrastructure/driven-adapters/redis-cache")
            .unwrap();
        assert_eq!(
            out,
            "rootProject.name = \"shop\"\ninclude(\":infrastructure:driven-adapters:redis-cache\")\n"
        );
        assert!(merger
            .ensure_include(&out, "infrastructure/driven-adapters/redis-cache")
            .is_none());
    }

    // ── parsing ──

    #[test]
    fn declarations_are_parsed_with_scope() {
        let deps = parse_declarations(MIXED);
        assert_eq!(deps.len(), 3);
        assert_eq!(deps[2], Dependency::test("g", "c", "3"));
        assert!(parse_declarations("classpath(\"x:y:1\")\nplatform(\"a:b:c\")").is_empty());
    }
}
