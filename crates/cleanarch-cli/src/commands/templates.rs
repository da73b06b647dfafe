//! `cleanarch templates`: list or check the templates under the template root.

use tracing::instrument;

use cleanarch_adapters::DirectoryTemplateProvider;
use cleanarch_core::application::ports::TemplateProvider;

use crate::{
    cli::{GlobalArgs, ListFormat, OutputFormat, TemplatesArgs},
    commands::generate,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

const TEMPLATE_SUFFIX: &str = ".tera";

#[instrument(skip_all)]
pub fn execute(
    args: TemplatesArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let root = generate::template_root(global, config)?;
    let provider = DirectoryTemplateProvider::new(&root);
    let ids = provider
        .list()
        .with_cli_context(|| format!("Listing templates under {}", root.display()))?;

    if args.validate {
        return validate(&provider, &ids, output);
    }

    if args.format == ListFormat::Json || output.format() == OutputFormat::Json {
        output.json(&ids)?;
        return Ok(());
    }

    output.header(&format!("Templates in {}", root.display()))?;
    for id in &ids {
        output.print(&format!("  {id}"))?;
    }
    output.print("")?;
    output.info(&format!("{} file(s)", ids.len()))?;
    Ok(())
}

/// Syntax-check every `.tera` file; metadata files are checked when loaded.
fn validate(provider: &dyn TemplateProvider, ids: &[String], output: &OutputManager) -> CliResult<()> {
    let mut checked = 0;
    let mut failed = 0;
    for id in ids.iter().filter(|id| id.ends_with(TEMPLATE_SUFFIX)) {
        checked += 1;
        let result = provider.validate(id);
        for error in result.errors() {
            output.error(error)?;
        }
        if !result.is_valid() {
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(CliError::InvalidTemplates { count: failed });
    }
    output.success(&format!("{checked} template(s) are valid"))?;
    Ok(())
}
