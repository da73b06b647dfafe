//! `cleanarch usecase`: generate an input port and its implementation.

use cleanarch_core::domain::{ArtifactSpec, UseCaseSpec, parsing};

use crate::{
    cli::{GlobalArgs, UseCaseArgs},
    commands::generate,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(
    args: UseCaseArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let spec = build_spec(args)?;
    generate::execute(ArtifactSpec::UseCase(spec), global, config, output)
}

fn build_spec(args: UseCaseArgs) -> CliResult<UseCaseSpec> {
    let methods = parsing::parse_methods(&args.methods).map_err(|e| CliError::Core(e.into()))?;

    let mut spec = UseCaseSpec::new(args.name, methods);
    spec.package = args.package;
    spec.generate_port = !args.no_port;
    spec.generate_impl = !args.no_impl;
    Ok(spec)
}
