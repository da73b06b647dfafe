//! `cleanarch init`: write `.cleanarch.yml` into the project root.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument};

use cleanarch_adapters::{LocalFilesystem, YamlProjectConfigStore};
use cleanarch_core::{
    application::ports::{Filesystem, PROJECT_CONFIG_FILE, ProjectConfigStore},
    domain::ProjectConfig,
};

use crate::{
    cli::{GlobalArgs, InitArgs},
    commands::generate,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(project = %global.project.display()))]
pub fn execute(args: InitArgs, global: &GlobalArgs, output: &OutputManager) -> CliResult<()> {
    let root = generate::project_root(global)?;
    let config_path = root.join(PROJECT_CONFIG_FILE);

    if config_path.exists() && !args.force {
        return Err(CliError::ProjectExists { path: config_path });
    }

    let project = build_config(args, &root)?;

    let filesystem: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
    YamlProjectConfigStore::new(filesystem)
        .save(&root, &project)
        .with_cli_context(|| format!("Writing {}", config_path.display()))?;

    info!(
        project = %project.name,
        architecture = %project.architecture,
        "Project initialized"
    );

    output.success(&format!("Initialized project '{}'", project.name))?;
    output.print(&format!("  Base package: {}", project.base_package))?;
    output.print(&format!("  Architecture: {}", project.architecture))?;
    output.print(&format!(
        "  Stack:        {} {}",
        project.framework, project.paradigm
    ))?;
    if project.adapters_as_modules {
        output.print("  Adapters:     separate modules")?;
    }
    output.info(&format!("Wrote {}", config_path.display()))?;
    Ok(())
}

fn build_config(args: InitArgs, root: &Path) -> CliResult<ProjectConfig> {
    let name = match args.name {
        Some(name) => name,
        None => root
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| CliError::InvalidInput {
                message: format!(
                    "cannot derive a project name from '{}'; pass --name",
                    root.display()
                ),
                source: None,
            })?,
    };

    let project = ProjectConfig::new(name, args.base_package)
        .map_err(|e| CliError::Core(e.into()))?
        .with_architecture(args.architecture)
        .with_paradigm(args.paradigm)
        .with_framework(args.framework)
        .with_adapters_as_modules(args.adapters_as_modules);
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cleanarch_core::domain::{ArchitectureType, Framework, Paradigm};

    fn args(name: Option<&str>, base_package: &str) -> InitArgs {
        InitArgs {
            name: name.map(str::to_string),
            base_package: base_package.into(),
            architecture: ArchitectureType::OnionMulti,
            paradigm: Paradigm::Imperative,
            framework: Framework::Spring,
            adapters_as_modules: true,
            force: false,
        }
    }

    #[test]
    fn name_defaults_to_directory() {
        let config = build_config(args(None, "com.acme.shop"), Path::new("/work/shop")).unwrap();

        assert_eq!(config.name, "shop");
        assert_eq!(config.architecture, ArchitectureType::OnionMulti);
        assert_eq!(config.paradigm, Paradigm::Imperative);
        assert!(config.adapters_as_modules);
    }

    #[test]
    fn invalid_base_package_is_user_error() {
        let err = build_config(args(Some("shop"), "Com..Acme"), Path::new("/work/shop")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn root_without_name_needs_flag() {
        let err = build_config(args(None, "com.acme"), Path::new("/")).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput { .. }));
    }
}
