//! Shared plumbing for the generation commands.
//!
//! Wires the local adapters into a [`GenerationOrchestrator`], runs one
//! request and turns the [`GenerationResult`] into output plus an exit code.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, instrument};

use cleanarch_adapters::{
    DirectoryTemplateProvider, LocalFilesystem, YamlProjectConfigStore, locate_template_root,
};
use cleanarch_core::{
    application::{Filesystem, GenerationOrchestrator},
    domain::{ArtifactSpec, FailureStage, GenerationRequest, GenerationResult},
};

use crate::{
    cli::{GlobalArgs, OutputFormat},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Template root from `--templates`, then `templates.path`, then discovery.
pub fn template_root(global: &GlobalArgs, config: &AppConfig) -> CliResult<PathBuf> {
    let explicit = global
        .templates
        .as_deref()
        .or(config.templates.path.as_deref());
    locate_template_root(explicit).ok_or_else(|| CliError::TemplatesNotFound {
        configured: explicit.map(Path::to_path_buf),
    })
}

/// `--project` made absolute so backup locations print as full paths.
pub fn project_root(global: &GlobalArgs) -> CliResult<PathBuf> {
    std::path::absolute(&global.project).with_cli_context(|| {
        format!(
            "Failed to resolve project directory '{}'",
            global.project.display()
        )
    })
}

pub fn orchestrator(global: &GlobalArgs, config: &AppConfig) -> CliResult<GenerationOrchestrator> {
    let root = template_root(global, config)?;
    let filesystem: Arc<dyn Filesystem> = Arc::new(LocalFilesystem::new());
    let templates = Arc::new(DirectoryTemplateProvider::new(root));
    let projects = Arc::new(YamlProjectConfigStore::new(filesystem.clone()));

    Ok(GenerationOrchestrator::new(filesystem, templates, projects)
        .with_fail_on_conflicts(config.generation.fail_on_conflicts))
}

/// Run one generation request against the project root.
#[instrument(skip_all, fields(kind = %spec.kind(), name = %spec.name()))]
pub fn execute(
    spec: ArtifactSpec,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let orchestrator = orchestrator(global, config)?;
    let request = GenerationRequest::new(project_root(global)?, spec);
    let kind = request.kind().display_name();

    let spinner = output.spinner(format!("Generating {kind} '{}'...", request.name()));
    let result = orchestrator.generate(&request);
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    info!(success = result.success, files = result.files.len(), "Generation finished");
    report(&result, kind, request.name(), output)
}

fn report(
    result: &GenerationResult,
    kind: &str,
    name: &str,
    output: &OutputManager,
) -> CliResult<()> {
    if output.format() == OutputFormat::Json {
        output.json(result)?;
    } else {
        for warning in &result.warnings {
            output.warning(warning)?;
        }
        if result.success && !output.is_quiet() {
            for file in &result.files {
                output.file(file.action, &file.path)?;
            }
            output.success(&format!(
                "Generated {kind} '{name}' ({} file(s))",
                result.files.len()
            ))?;
        }
    }

    if result.success {
        return Ok(());
    }
    Err(CliError::GenerationFailed {
        kind: kind.to_string(),
        errors: result.errors.clone(),
        rejected: result
            .failed_at
            .is_some_and(FailureStage::left_project_untouched),
    })
}
