//! End-to-end tests against the `cleanarch` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const TEMPLATES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../templates");

const DESCRIPTOR: &str = r#"plugins {
    id("java")
}

dependencies {
    implementation("org.springframework.boot:spring-boot-starter-webflux:3.2.1")
}
"#;

/// `cleanarch` pinned to a project directory, an empty config file and the
/// shipped templates, with plain output.
fn cleanarch(project: &Path) -> Command {
    cleanarch_with(project, Path::new(TEMPLATES), "plain")
}

fn cleanarch_with(project: &Path, templates: &Path, format: &str) -> Command {
    let config = project.join("cleanarch-test.toml");
    if !config.exists() {
        fs::write(&config, "").unwrap();
    }

    let mut cmd = Command::cargo_bin("cleanarch").unwrap();
    cmd.current_dir(project)
        .env_remove("RUST_LOG")
        .arg("--output-format")
        .arg(format)
        .arg("--config")
        .arg(&config)
        .arg("--templates")
        .arg(templates)
        .arg("--project")
        .arg(project);
    cmd
}

fn initialized_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    cleanarch(temp.path())
        .args(["init", "--name", "shop", "--base-package", "com.acme.shop"])
        .assert()
        .success();
    temp
}

// ── help / version ──

#[test]
fn help_lists_generation_commands() {
    Command::cargo_bin("cleanarch")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("entity"))
        .stdout(predicate::str::contains("usecase"))
        .stdout(predicate::str::contains("adapter"))
        .stdout(predicate::str::contains("input-adapter"));
}

#[test]
fn version_prints_package_version() {
    Command::cargo_bin("cleanarch")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

// ── init ──

#[test]
fn init_writes_project_config() {
    let temp = TempDir::new().unwrap();

    cleanarch(temp.path())
        .args(["init", "--name", "shop", "--base-package", "com.acme.shop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized project 'shop'"));

    let written = fs::read_to_string(temp.path().join(".cleanarch.yml")).unwrap();
    assert!(written.contains("com.acme.shop"));
}

#[test]
fn init_twice_without_force_is_rejected() {
    let temp = initialized_project();

    cleanarch(temp.path())
        .args(["init", "--name", "shop", "--base-package", "com.acme.shop"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn init_force_overwrites() {
    let temp = initialized_project();

    cleanarch(temp.path())
        .args(["init", "--name", "shop", "--base-package", "com.acme.store", "--force"])
        .assert()
        .success();

    let written = fs::read_to_string(temp.path().join(".cleanarch.yml")).unwrap();
    assert!(written.contains("com.acme.store"));
}

// ── generation ──

#[test]
fn entity_is_generated_and_listed() {
    let temp = initialized_project();

    cleanarch(temp.path())
        .args(["entity", "Order", "--fields", "customerId:String,note:String?"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created"))
        .stdout(predicate::str::contains("Order.java"));

    let entity = temp
        .path()
        .join("src/main/java/com/acme/shop/domain/model/Order.java");
    let content = fs::read_to_string(entity).unwrap();
    assert!(content.contains("public class Order {"));
}

#[test]
fn use_case_alias_generates_port() {
    let temp = initialized_project();

    cleanarch(temp.path())
        .args(["use-case", "CreateOrder", "--methods", "execute:Order:command:CreateOrderCommand"])
        .assert()
        .success();

    assert!(
        temp.path()
            .join("src/main/java/com/acme/shop/domain/port/in/CreateOrderUseCase.java")
            .is_file()
    );
}

#[test]
fn driven_adapter_merges_descriptor() {
    let temp = initialized_project();
    fs::write(temp.path().join("build.gradle.kts"), DESCRIPTOR).unwrap();
    fs::create_dir_all(temp.path().join("src/main/resources")).unwrap();
    fs::write(
        temp.path().join("src/main/resources/application.yml"),
        "server:\n  port: 8080\n",
    )
    .unwrap();

    cleanarch(temp.path())
        .args(["adapter", "OrderCache", "--type", "redis", "--entity", "Order"])
        .assert()
        .success()
        .stdout(predicate::str::contains("merged"));

    let descriptor = fs::read_to_string(temp.path().join("build.gradle.kts")).unwrap();
    assert!(descriptor.contains("spring-boot-starter-data-redis-reactive"));
}

#[test]
fn json_output_reports_generated_files() {
    let temp = initialized_project();

    let assert = cleanarch_with(temp.path(), Path::new(TEMPLATES), "json")
        .args(["entity", "Customer"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["success"], true);
    assert_eq!(value["files"][0]["action"], "created");
}

#[test]
fn generation_in_uninitialized_directory_is_rejected() {
    let temp = TempDir::new().unwrap();

    cleanarch(temp.path())
        .args(["entity", "Order"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to generate entity"))
        .stderr(predicate::str::contains("not initialized"));

    assert!(!temp.path().join("src").exists());
}

#[test]
fn malformed_fields_are_rejected() {
    let temp = initialized_project();

    cleanarch(temp.path())
        .args(["entity", "Order", "--fields", "customerId"])
        .assert()
        .code(2);
}

#[test]
fn missing_template_root_is_a_configuration_error() {
    let temp = initialized_project();
    let empty = TempDir::new().unwrap();

    cleanarch_with(temp.path(), empty.path(), "plain")
        .args(["entity", "Order"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Template root not found"));
}

// ── templates ──

#[test]
fn templates_json_lists_identifiers() {
    let temp = TempDir::new().unwrap();

    let assert = cleanarch(temp.path())
        .args(["templates", "--format", "json"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let ids: Vec<String> = serde_json::from_str(&stdout).unwrap();
    assert!(ids.iter().any(|id| id.ends_with("Entity.java.tera")));
}

#[test]
fn shipped_templates_validate() {
    let temp = TempDir::new().unwrap();

    cleanarch(temp.path())
        .args(["templates", "--validate"])
        .assert()
        .success();
}

// ── backups ──

#[test]
fn backups_list_on_fresh_project() {
    let temp = initialized_project();

    cleanarch(temp.path())
        .args(["backups", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No backups"));
}

#[test]
fn restoring_unknown_backup_is_not_found() {
    let temp = initialized_project();

    cleanarch(temp.path())
        .args(["backups", "restore", "20240101-000000-0", "--yes"])
        .assert()
        .code(3);
}

#[test]
fn backup_id_with_separator_is_rejected() {
    let temp = initialized_project();

    cleanarch(temp.path())
        .args(["backups", "delete", "../escape", "--yes"])
        .assert()
        .code(2);
}

// ── config / completions ──

#[test]
fn config_get_unknown_key_is_a_configuration_error() {
    let temp = TempDir::new().unwrap();

    cleanarch(temp.path())
        .args(["config", "get", "no.such.key"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn config_file_values_are_visible() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("cleanarch-test.toml"),
        "[generation]\nfail_on_conflicts = true\n",
    )
    .unwrap();

    cleanarch(temp.path())
        .args(["config", "get", "generation.fail_on_conflicts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"true\""));
}

#[test]
fn completions_for_bash() {
    Command::cargo_bin("cleanarch")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cleanarch"));
}
