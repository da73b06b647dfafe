//! `cleanarch entity`: generate a domain entity.

use cleanarch_core::domain::{ArtifactSpec, EntitySpec, parsing};

use crate::{
    cli::{EntityArgs, GlobalArgs},
    commands::generate,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(
    args: EntityArgs,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    let spec = build_spec(args)?;
    generate::execute(ArtifactSpec::Entity(spec), global, config, output)
}

fn build_spec(args: EntityArgs) -> CliResult<EntitySpec> {
    let fields = parsing::parse_fields(&args.fields).map_err(|e| CliError::Core(e.into()))?;

    let mut spec = EntitySpec::new(args.name, fields);
    spec.package = args.package;
    spec.has_id = !args.no_id;
    spec.id_type = args.id_type;
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(fields: &str) -> EntityArgs {
        EntityArgs {
            name: "Order".into(),
            fields: fields.into(),
            package: None,
            no_id: false,
            id_type: "String".into(),
        }
    }

    #[test]
    fn fields_and_id_settings_carry_over() {
        let spec = build_spec(EntityArgs {
            no_id: true,
            id_type: "Long".into(),
            package: Some("com.acme.shop.model".into()),
            ..args("total:BigDecimal,note:String?")
        })
        .unwrap();

        assert_eq!(spec.fields.len(), 2);
        assert!(spec.fields[1].nullable);
        assert!(!spec.has_id);
        assert_eq!(spec.id_type, "Long");
        assert_eq!(spec.package.as_deref(), Some("com.acme.shop.model"));
    }

    #[test]
    fn malformed_fields_are_a_user_error() {
        let err = build_spec(args("total")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
