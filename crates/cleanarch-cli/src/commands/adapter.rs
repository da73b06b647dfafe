//! `cleanarch adapter`: generate a driven adapter.

use cleanarch_core::domain::{AdapterSpec, ArtifactSpec, parsing};

use crate::{
    cli::{AdapterArgs, GlobalArgs},
    commands::generate,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(
    args: AdapterArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let spec = build_spec(args)?;
    generate::execute(ArtifactSpec::Adapter(spec), global, config, output)
}

fn build_spec(args: AdapterArgs) -> CliResult<AdapterSpec> {
    let methods = parsing::parse_methods(&args.methods).map_err(|e| CliError::Core(e.into()))?;

    let mut spec = AdapterSpec::new(args.name, args.adapter_type, args.entity);
    spec.package = args.package;
    spec.methods = methods;
    Ok(spec)
}
