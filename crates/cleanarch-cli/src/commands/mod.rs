//! Command handlers, one module per subcommand.
//!
//! Handlers translate parsed arguments into core requests and print the
//! outcome. No generation logic lives here.

pub mod adapter;
pub mod backups;
pub mod completions;
pub mod config;
pub mod config_init;
pub mod entity;
pub mod generate;
pub mod init;
pub mod input_adapter;
pub mod templates;
pub mod usecase;
