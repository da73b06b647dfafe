//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

use cleanarch_core::domain::{AdapterType, ArchitectureType, Framework, InputAdapterType, Paradigm};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "cleanarch",
    bin_name = "cleanarch",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Transactional code generation for clean-architecture Java projects",
    long_about = "cleanarch adds entities, use cases, driven adapters and entry points \
                  to an initialized project. Every run is validated up front, existing \
                  files are backed up, and a failed run is rolled back.",
    after_help = "EXAMPLES:\n\
        \x20 cleanarch init --name shop --base-package com.acme.shop\n\
        \x20 cleanarch entity Order --fields \"id:String,total:BigDecimal,note:String?\"\n\
        \x20 cleanarch adapter OrderCache --type redis --entity Order\n\
        \x20 cleanarch completions bash > /usr/share/bash-completion/completions/cleanarch",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a domain entity.
    #[command(
        visible_alias = "e",
        about = "Generate a domain entity",
        after_help = "EXAMPLES:\n\
            \x20 cleanarch entity Order --fields \"id:String,total:BigDecimal\"\n\
            \x20 cleanarch entity Customer --fields \"email:String,phone:String?\" --id-type UUID"
    )]
    Entity(EntityArgs),

    /// Generate a use case (input port plus implementation).
    #[command(
        name = "usecase",
        visible_alias = "use-case",
        about = "Generate a use case",
        after_help = "EXAMPLES:\n\
            \x20 cleanarch usecase CreateOrder --methods \"execute:Order:order:Order\"\n\
            \x20 cleanarch usecase FindOrder --methods \"findById:Order:id:String\" --no-impl"
    )]
    UseCase(UseCaseArgs),

    /// Generate a driven adapter and merge its dependencies and properties.
    #[command(
        about = "Generate a driven adapter",
        after_help = "EXAMPLES:\n\
            \x20 cleanarch adapter OrderCache --type redis --entity Order\n\
            \x20 cleanarch adapter OrderStore --type mongodb --entity Order \\\n\
            \x20     --methods \"save:Order:order:Order|findById:Order:id:String\""
    )]
    Adapter(AdapterArgs),

    /// Generate an entry point (controller, resolver, service, handler).
    #[command(
        about = "Generate an entry point",
        after_help = "EXAMPLES:\n\
            \x20 cleanarch input-adapter OrderApi --type rest --use-case CreateOrder \\\n\
            \x20     --endpoints \"/orders:POST:execute:Order:order:BODY:Order\""
    )]
    InputAdapter(InputAdapterArgs),

    /// Write `.cleanarch.yml` into the project root.
    #[command(
        about = "Initialize a project",
        after_help = "EXAMPLES:\n\
            \x20 cleanarch init --name shop --base-package com.acme.shop\n\
            \x20 cleanarch init --name shop --base-package com.acme.shop --architecture onion-multi"
    )]
    Init(InitArgs),

    /// List (and optionally check) the templates under the template root.
    #[command(
        visible_alias = "ls",
        about = "List available templates",
        after_help = "EXAMPLES:\n\
            \x20 cleanarch templates\n\
            \x20 cleanarch templates --format json\n\
            \x20 cleanarch templates --validate"
    )]
    Templates(TemplatesArgs),

    /// Inspect, restore or delete retained backups.
    #[command(
        about = "Manage backups",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 cleanarch backups list\n\
            \x20 cleanarch backups restore backup_20260105_101500_123_0\n\
            \x20 cleanarch backups delete backup_20260105_101500_123_0 --yes"
    )]
    Backups(BackupCommands),

    /// Manage the cleanarch configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 cleanarch config get templates.path\n\
            \x20 cleanarch config list\n\
            \x20 cleanarch config path"
    )]
    Config(ConfigCommands),

    /// Write a default configuration file.
    #[command(
        about = "Create a default configuration file",
        after_help = "EXAMPLES:\n\
            \x20 cleanarch config-init\n\
            \x20 cleanarch config-init --force"
    )]
    ConfigInit(ConfigInitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 cleanarch completions bash > ~/.local/share/bash-completion/completions/cleanarch\n\
            \x20 cleanarch completions zsh  > ~/.zfunc/_cleanarch\n\
            \x20 cleanarch completions fish > ~/.config/fish/completions/cleanarch.fish"
    )]
    Completions(CompletionsArgs),
}

// ── entity ────────────────────────────────────────────────────────────────────

/// Arguments for `cleanarch entity`.
#[derive(Debug, Args)]
pub struct EntityArgs {
    /// Entity class name, e.g. `Order`.
    #[arg(value_name = "NAME", help = "Entity name")]
    pub name: String,

    /// `name:Type` pairs separated by commas; a trailing `?` marks a nullable field.
    #[arg(
        short = 'f',
        long = "fields",
        value_name = "FIELDS",
        default_value = "",
        help = "Fields, e.g. \"email:String,phone:String?\""
    )]
    pub fields: String,

    /// Package override; defaults to `<base>.domain.model`.
    #[arg(short = 'p', long = "package", value_name = "PACKAGE", help = "Target package")]
    pub package: Option<String>,

    /// Leave out the generated identifier field.
    #[arg(long = "no-id", help = "Do not generate an id field")]
    pub no_id: bool,

    #[arg(
        long = "id-type",
        value_name = "TYPE",
        default_value = "String",
        help = "Identifier type (String, Long, UUID)"
    )]
    pub id_type: String,
}

// ── usecase ───────────────────────────────────────────────────────────────────

/// Arguments for `cleanarch usecase`.
#[derive(Debug, Args)]
pub struct UseCaseArgs {
    #[arg(value_name = "NAME", help = "Use case name")]
    pub name: String,

    /// `name:Return[:param:Type...]` entries separated by `|`.
    #[arg(
        short = 'm',
        long = "methods",
        value_name = "METHODS",
        help = "Methods, e.g. \"execute:Order:order:Order\""
    )]
    pub methods: String,

    /// Package override for the input port; defaults to `<base>.domain.port.in`.
    #[arg(short = 'p', long = "package", value_name = "PACKAGE", help = "Target package")]
    pub package: Option<String>,

    #[arg(long = "no-port", help = "Skip the input port interface")]
    pub no_port: bool,

    #[arg(long = "no-impl", help = "Skip the implementation class")]
    pub no_impl: bool,
}

// ── adapter ───────────────────────────────────────────────────────────────────

/// Arguments for `cleanarch adapter`.
#[derive(Debug, Args)]
pub struct AdapterArgs {
    #[arg(value_name = "NAME", help = "Adapter name")]
    pub name: String,

    /// Driven adapter technology.
    #[arg(
        short = 't',
        long = "type",
        value_name = "TYPE",
        help = "Adapter type (redis, mongodb, postgresql, rest-client, kafka)"
    )]
    pub adapter_type: AdapterType,

    /// Entity the adapter persists or sends.
    #[arg(short = 'e', long = "entity", value_name = "ENTITY", help = "Entity name")]
    pub entity: String,

    #[arg(short = 'p', long = "package", value_name = "PACKAGE", help = "Target package")]
    pub package: Option<String>,

    #[arg(
        short = 'm',
        long = "methods",
        value_name = "METHODS",
        default_value = "",
        help = "Methods, e.g. \"save:Order:order:Order|findById:Order:id:String\""
    )]
    pub methods: String,
}

// ── input-adapter ─────────────────────────────────────────────────────────────

/// Arguments for `cleanarch input-adapter`.
#[derive(Debug, Args)]
pub struct InputAdapterArgs {
    #[arg(value_name = "NAME", help = "Entry point name")]
    pub name: String,

    #[arg(
        short = 't',
        long = "type",
        value_name = "TYPE",
        help = "Entry point type (rest, graphql, grpc, websocket)"
    )]
    pub adapter_type: InputAdapterType,

    /// Use case the entry point delegates to.
    #[arg(short = 'u', long = "use-case", value_name = "USE_CASE", help = "Use case name")]
    pub use_case: String,

    /// `path:METHOD:useCaseMethod:Return[:name:BINDING:Type...]` entries separated by `|`.
    #[arg(
        long = "endpoints",
        value_name = "ENDPOINTS",
        help = "Endpoints, e.g. \"/orders/{id}:GET:findById:Order:id:PATH:String\""
    )]
    pub endpoints: String,

    #[arg(short = 'p', long = "package", value_name = "PACKAGE", help = "Target package")]
    pub package: Option<String>,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `cleanarch init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Project name; defaults to the project directory name.
    #[arg(short = 'n', long = "name", value_name = "NAME", help = "Project name")]
    pub name: Option<String>,

    #[arg(
        short = 'p',
        long = "base-package",
        value_name = "PACKAGE",
        help = "Base Java package, e.g. com.acme.shop"
    )]
    pub base_package: String,

    #[arg(
        short = 'a',
        long = "architecture",
        value_name = "ARCH",
        default_value = "hexagonal-single",
        help = "Architecture (hexagonal-single, hexagonal-multi, hexagonal-multi-granular, onion-single, onion-multi)"
    )]
    pub architecture: ArchitectureType,

    #[arg(
        long = "paradigm",
        value_name = "PARADIGM",
        default_value = "reactive",
        help = "Paradigm (reactive, imperative)"
    )]
    pub paradigm: Paradigm,

    #[arg(
        long = "framework",
        value_name = "FRAMEWORK",
        default_value = "spring",
        help = "Framework (spring, quarkus, micronaut)"
    )]
    pub framework: Framework,

    /// Generate each driven adapter as its own Gradle module.
    #[arg(long = "adapters-as-modules", help = "Generate adapters as separate modules")]
    pub adapters_as_modules: bool,

    /// Overwrite an existing `.cleanarch.yml`.
    #[arg(short = 'f', long = "force", help = "Overwrite existing project configuration")]
    pub force: bool,
}

// ── templates ─────────────────────────────────────────────────────────────────

/// Arguments for `cleanarch templates`.
#[derive(Debug, Args)]
pub struct TemplatesArgs {
    #[arg(
        long = "format",
        value_enum,
        default_value = "list",
        help = "Listing format"
    )]
    pub format: ListFormat,

    /// Parse every `.tera` template and report syntax errors.
    #[arg(long = "validate", help = "Check template syntax")]
    pub validate: bool,
}

/// Output format for `cleanarch templates`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// One template id per line.
    #[default]
    List,
    /// A JSON array of ids.
    Json,
}

// ── backups ───────────────────────────────────────────────────────────────────

/// Subcommands for `cleanarch backups`.
#[derive(Debug, Subcommand)]
pub enum BackupCommands {
    /// List retained backups, newest first.
    List,
    /// Copy a backup's files back into the project.
    Restore {
        /// Backup id as printed by `backups list`.
        id: String,
        /// Skip the confirmation prompt.
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },
    /// Remove a backup directory.
    Delete {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },
}

// ── config ────────────────────────────────────────────────────────────────────

/// Subcommands for `cleanarch config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `generation.fail_on_conflicts`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

/// Arguments for `cleanarch config-init`.
#[derive(Debug, Args)]
pub struct ConfigInitArgs {
    /// Write `./.cleanarch.toml` instead of the user config directory.
    #[arg(long = "local", help = "Create local configuration in current directory")]
    pub local: bool,

    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `cleanarch completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

impl std::fmt::Display for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bash => write!(f, "bash"),
            Self::Zsh => write!(f, "zsh"),
            Self::Fish => write!(f, "fish"),
            Self::PowerShell => write!(f, "powershell"),
            Self::Elvish => write!(f, "elvish"),
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
