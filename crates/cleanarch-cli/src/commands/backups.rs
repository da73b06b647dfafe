//! `cleanarch backups`: manual recovery for retained backups.
//!
//! Backups survive only when a run failed; successful runs delete theirs.
//! Nothing here sweeps old backups automatically.

use std::path::{Component, Path};
use std::sync::Arc;

use tracing::{info, instrument};

use cleanarch_adapters::LocalFilesystem;
use cleanarch_core::{
    application::{ApplicationError, BackupService},
    domain::BackupManifest,
    error::CleanArchError,
};

use crate::{
    cli::{BackupCommands, GlobalArgs, OutputFormat},
    commands::generate,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Dispatch to the correct backups subcommand.
#[instrument(skip_all)]
pub fn execute(cmd: BackupCommands, global: &GlobalArgs, output: &OutputManager) -> CliResult<()> {
    let root = generate::project_root(global)?;
    let service = BackupService::new(Arc::new(LocalFilesystem::new()));

    match cmd {
        BackupCommands::List => list(&service, &root, output),
        BackupCommands::Restore { id, yes } => {
            let dir = existing_backup(&root, &id)?;
            if !yes && !confirm(&format!("Restore {id} over the current project files?"))? {
                return Err(CliError::Cancelled);
            }
            let manifest = service
                .restore_backup(&root, &id)
                .with_cli_context(|| format!("Restoring {}", dir.display()))?;
            info!(backup_id = %id, files = manifest.files.len(), "Backup restored manually");

            for file in &manifest.files {
                output.print(&format!("  restored  {}", file.display()))?;
            }
            output.success(&format!(
                "Restored {} file(s) from {id}",
                manifest.files.len()
            ))?;
            output.info(&format!(
                "The backup is kept; remove it with 'cleanarch backups delete {id}'"
            ))?;
            Ok(())
        }
        BackupCommands::Delete { id, yes } => {
            existing_backup(&root, &id)?;
            if !yes && !confirm(&format!("Delete backup {id}?"))? {
                return Err(CliError::Cancelled);
            }
            service
                .delete_backup(&root, &id)
                .with_cli_context(|| format!("Deleting backup {id}"))?;
            output.success(&format!("Deleted {id}"))?;
            Ok(())
        }
    }
}

fn list(service: &BackupService, root: &Path, output: &OutputManager) -> CliResult<()> {
    let manifests = service
        .list_backups(root)
        .with_cli_context(|| "Listing backups")?;

    if output.format() == OutputFormat::Json {
        output.json(&manifests)?;
        return Ok(());
    }
    if manifests.is_empty() {
        output.info("No backups")?;
        return Ok(());
    }

    output.header(&format!("Backups in {}", root.display()))?;
    for manifest in &manifests {
        output.print(&summary(manifest))?;
    }
    Ok(())
}

fn summary(manifest: &BackupManifest) -> String {
    format!(
        "  {}  {}  {} file(s)",
        manifest.id,
        manifest.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        manifest.files.len()
    )
}

/// Backup ids are single directory names under the backup directory.
fn existing_backup(root: &Path, id: &str) -> CliResult<std::path::PathBuf> {
    let mut components = Path::new(id).components();
    let single_name = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single_name {
        return Err(CliError::InvalidInput {
            message: format!("'{id}' is not a backup id"),
            source: None,
        });
    }

    let dir = BackupService::backup_path(root, id);
    if !dir.is_dir() {
        return Err(CliError::Core(CleanArchError::Application(
            ApplicationError::BackupNotFound {
                id: id.to_string(),
                path: dir,
            },
        )));
    }
    Ok(dir)
}

/// Ask on a terminal; refuse when nobody can answer.
#[cfg(feature = "interactive")]
fn confirm(prompt: &str) -> CliResult<bool> {
    use std::io::IsTerminal as _;

    if !std::io::stdin().is_terminal() {
        return Err(non_interactive());
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "Failed to read confirmation".into(),
            source: std::io::Error::other(e),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm(_prompt: &str) -> CliResult<bool> {
    Err(non_interactive())
}

fn non_interactive() -> CliError {
    CliError::InvalidInput {
        message: "confirmation required; pass --yes".into(),
        source: None,
    }
}
