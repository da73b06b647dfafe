//! Tool configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns it; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `CLEANARCH_*` environment variables, `__` separating nested keys
//!    (`CLEANARCH_GENERATION__FAIL_ON_CONFLICTS=true`)
//! 3. Config file: `--config FILE`, else `./.cleanarch.toml`, else
//!    `<config dir>/cleanarch/config.toml`
//! 4. Built-in defaults (always present)

use std::path::PathBuf;

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Name of the per-directory config file.
pub const LOCAL_CONFIG_FILE: &str = ".cleanarch.toml";

const ENV_PREFIX: &str = "CLEANARCH";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub templates: TemplateConfig,
    pub generation: GenerationConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Template root; discovered when unset.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Treat dependency version conflicts as fatal instead of warnings.
    pub fail_on_conflicts: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment over the defaults.
    ///
    /// An explicit `config_file` must exist; the implicit locations are
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let mut builder = Config::builder();

        match config_file {
            Some(path) => {
                builder = builder.add_source(
                    File::from(path.as_path())
                        .format(FileFormat::Toml)
                        .required(true),
                );
            }
            None => {
                let local = PathBuf::from(LOCAL_CONFIG_FILE);
                let file = if local.is_file() {
                    local
                } else {
                    Self::config_path()
                };
                debug!(path = %file.display(), "Config file candidate");
                builder = builder.add_source(
                    File::from(file.as_path())
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?;

        config
            .try_deserialize()
            .context("Invalid configuration values")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.cleanarch.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "cleanarch", "cleanarch")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Look up a dotted key; `None` for unknown keys.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "templates.path" => Some(
                self.templates
                    .path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            ),
            "generation.fail_on_conflicts" => Some(self.generation.fail_on_conflicts.to_string()),
            "output.no_color" => Some(self.output.no_color.to_string()),
            "output.format" => Some(self.output.format.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_lenient() {
        let cfg = AppConfig::default();
        assert!(!cfg.generation.fail_on_conflicts);
        assert!(!cfg.output.no_color);
        assert_eq!(cfg.output.format, "auto");
        assert_eq!(cfg.templates.path, None);
    }

    #[test]
    fn explicit_file_is_read() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cleanarch.toml");
        fs::write(
            &path,
            "[templates]\npath = \"/opt/templates\"\n\n[generation]\nfail_on_conflicts = true\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();

        assert_eq!(cfg.templates.path, Some(PathBuf::from("/opt/templates")));
        assert!(cfg.generation.fail_on_conflicts);
        assert_eq!(cfg.output.format, "auto");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.toml");
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn get_known_and_unknown_keys() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get("generation.fail_on_conflicts").as_deref(), Some("false"));
        assert_eq!(cfg.get("templates.path").as_deref(), Some(""));
        assert_eq!(cfg.get("does.not.exist"), None);
    }

    #[test]
    fn serialises_to_toml_and_back() {
        let mut cfg = AppConfig::default();
        cfg.generation.fail_on_conflicts = true;

        let text = toml::to_string_pretty(&cfg).unwrap();
        assert!(text.contains("fail_on_conflicts = true"));
        assert_eq!(toml::from_str::<AppConfig>(&text).unwrap(), cfg);
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
