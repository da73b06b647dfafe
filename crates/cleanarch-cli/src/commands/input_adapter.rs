//! `cleanarch input-adapter`: generate an entry point.

use cleanarch_core::domain::{ArtifactSpec, InputAdapterSpec, parsing};

use crate::{
    cli::{GlobalArgs, InputAdapterArgs},
    commands::generate,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(
    args: InputAdapterArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let spec = build_spec(args)?;
    generate::execute(ArtifactSpec::InputAdapter(spec), global, config, output)
}

fn build_spec(args: InputAdapterArgs) -> CliResult<InputAdapterSpec> {
    let endpoints =
        parsing::parse_endpoints(&args.endpoints).map_err(|e| CliError::Core(e.into()))?;

    let mut spec = InputAdapterSpec::new(args.name, args.adapter_type, args.use_case, endpoints);
    spec.package = args.package;
    Ok(spec)
}
