//! Backup Service - file snapshots for all-or-nothing generation.
//!
//! A backup lives at `<root>/.cleanarch/backups/<id>/`, mirroring the relative
//! paths it captured, plus a `manifest.yml`. Nothing sweeps old backups; a
//! backup survives until it is deleted explicitly.

use chrono::{Local, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{ApplicationError, ports::Filesystem},
    domain::{BackupManifest, RelativePath},
    error::{CleanArchError, CleanArchResult},
};

pub const BACKUP_DIR: &str = ".cleanarch/backups";
pub const MANIFEST_FILE: &str = "manifest.yml";

/// Disambiguates ids created within the same millisecond.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

pub struct BackupService {
    filesystem: Arc<dyn Filesystem>,
}

impl BackupService {
    pub fn new(filesystem: Arc<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Where backup `id` lives (or would live) for `root`.
    pub fn backup_path(root: &Path, id: &str) -> PathBuf {
        root.join(BACKUP_DIR).join(id)
    }

    /// Snapshots the files in `paths` (relative to `root`) that exist now.
    ///
    /// Missing files are skipped and left out of the manifest. On any copy
    /// failure the partial backup directory is removed.
    #[instrument(skip_all, fields(root = %root.display(), requested = paths.len()))]
    pub fn create_backup(&self, root: &Path, paths: &[PathBuf]) -> CleanArchResult<BackupManifest> {
        if paths.is_empty() {
            return Err(ApplicationError::NothingToBackUp.into());
        }

        let id = next_backup_id();
        let dir = Self::backup_path(root, &id);
        let mut manifest = BackupManifest::new(&id, Utc::now());

        match self.capture(root, &dir, paths, &mut manifest) {
            Ok(()) => {
                info!(backup_id = %id, files = manifest.files.len(), "Backup created");
                Ok(manifest)
            }
            Err(e) => {
                if self.filesystem.exists(&dir) {
                    if let Err(cleanup) = self.filesystem.remove_dir_all(&dir) {
                        warn!(error = %cleanup, path = %dir.display(), "Could not remove partial backup");
                    }
                }
                Err(ApplicationError::BackupCreation {
                    reason: e.to_string(),
                }
                .into())
            }
        }
    }

    fn capture(
        &self,
        root: &Path,
        dir: &Path,
        paths: &[PathBuf],
        manifest: &mut BackupManifest,
    ) -> CleanArchResult<()> {
        self.filesystem.create_dir_all(dir)?;

        for path in paths {
            let relative = RelativePath::try_new(path.clone())?;
            let source = root.join(relative.as_path());
            if !self.filesystem.exists(&source) {
                debug!(path = %relative, "Skipping missing file");
                continue;
            }
            self.filesystem
                .copy_file(&source, &dir.join(relative.as_path()))?;
            if !manifest.files.iter().any(|f| f.as_path() == relative.as_path()) {
                manifest.files.push(relative.into_path_buf());
            }
        }

        let yaml = serde_yaml::to_string(manifest).map_err(|e| CleanArchError::Internal {
            message: format!("Failed to serialize backup manifest: {e}"),
        })?;
        self.filesystem.write_file(&dir.join(MANIFEST_FILE), &yaml)
    }

    /// Copies every captured file back over its original location.
    #[instrument(skip_all, fields(root = %root.display(), backup_id = %id))]
    pub fn restore_backup(&self, root: &Path, id: &str) -> CleanArchResult<BackupManifest> {
        let dir = Self::backup_path(root, id);
        if !self.filesystem.exists(&dir) {
            return Err(ApplicationError::BackupNotFound {
                id: id.to_string(),
                path: dir,
            }
            .into());
        }

        let restore = || -> CleanArchResult<BackupManifest> {
            let manifest = self.read_manifest(&dir)?;
            for file in &manifest.files {
                self.filesystem.copy_file(&dir.join(file), &root.join(file))?;
                debug!(path = %file.display(), "Restored");
            }
            Ok(manifest)
        };

        match restore() {
            Ok(manifest) => {
                info!(files = manifest.files.len(), "Backup restored");
                Ok(manifest)
            }
            Err(e) => Err(ApplicationError::RollbackFailed {
                backup_id: id.to_string(),
                backup_path: dir,
                reason: e.to_string(),
            }
            .into()),
        }
    }

    /// Removes backup `id`. Unknown ids are a no-op.
    #[instrument(skip_all, fields(root = %root.display(), backup_id = %id))]
    pub fn delete_backup(&self, root: &Path, id: &str) -> CleanArchResult<()> {
        let dir = Self::backup_path(root, id);
        if !self.filesystem.exists(&dir) {
            debug!("Backup already absent");
            return Ok(());
        }
        self.filesystem.remove_dir_all(&dir)?;
        info!("Backup deleted");
        Ok(())
    }

    /// Manifests of every retained backup, newest first. Unreadable entries
    /// are logged and skipped.
    pub fn list_backups(&self, root: &Path) -> CleanArchResult<Vec<BackupManifest>> {
        let base = root.join(BACKUP_DIR);
        if !self.filesystem.is_dir(&base) {
            return Ok(Vec::new());
        }

        let mut manifests = Vec::new();
        for entry in self.filesystem.list_dir(&base)? {
            if !self.filesystem.is_dir(&entry) {
                continue;
            }
            match self.read_manifest(&entry) {
                Ok(manifest) => manifests.push(manifest),
                Err(e) => warn!(path = %entry.display(), error = %e, "Skipping unreadable backup"),
            }
        }
        manifests.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| sequence_of(&b.id).cmp(&sequence_of(&a.id)))
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(manifests)
    }

    fn read_manifest(&self, dir: &Path) -> CleanArchResult<BackupManifest> {
        let path = dir.join(MANIFEST_FILE);
        let text = self.filesystem.read_to_string(&path)?;
        serde_yaml::from_str(&text).map_err(|e| ApplicationError::filesystem(path, e).into())
    }
}

/// `backup_<yyyyMMdd_HHmmss_SSS>_<seq>`
fn next_backup_id() -> String {
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("backup_{}_{seq}", Local::now().format("%Y%m%d_%H%M%S_%3f"))
}

/// Trailing `_<seq>` of a backup id; ids without one sort last.
fn sequence_of(id: &str) -> Option<u64> {
    id.rsplit_once('_').and_then(|(_, seq)| seq.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockFilesystem;
    use crate::application::services::test_support::FakeFilesystem;

    fn setup() -> (Arc<FakeFilesystem>, BackupService, PathBuf) {
        let fs = Arc::new(FakeFilesystem::new());
        let service = BackupService::new(fs.clone());
        (fs, service, PathBuf::from("/proj"))
    }

    // ── create ──

    #[test]
    fn empty_path_list_is_rejected() {
        let (_, service, root) = setup();
        let err = service.create_backup(&root, &[]).unwrap_err();
        assert_eq!(err.to_string(), "Application error: No files specified for backup");
    }

    #[test]
    fn only_existing_files_are_captured() {
        let (fs, service, root) = setup();
        fs.seed("/proj/build.gradle.kts", "plugins {}\n");

        let manifest = service
            .create_backup(
                &root,
                &[PathBuf::from("build.gradle.kts"), PathBuf::from("missing.yml")],
            )
            .unwrap();

        assert_eq!(manifest.files, vec![PathBuf::from("build.gradle.kts")]);
        let dir = BackupService::backup_path(&root, &manifest.id);
        assert_eq!(fs.content(dir.join("build.gradle.kts")).as_deref(), Some("plugins {}\n"));
        assert!(fs.content(dir.join(MANIFEST_FILE)).is_some());
    }

    #[test]
    fn ids_are_unique_per_call() {
        let (fs, service, root) = setup();
        fs.seed("/proj/a.txt", "a");
        let first = service.create_backup(&root, &[PathBuf::from("a.txt")]).unwrap();
        let second = service.create_backup(&root, &[PathBuf::from("a.txt")]).unwrap();
        assert_ne!(first.id, second.id);
        assert!(first.id.starts_with("backup_"));
    }

    #[test]
    fn absolute_paths_are_rejected_and_cleaned_up() {
        let (fs, service, root) = setup();
        let err = service
            .create_backup(&root, &[PathBuf::from("/etc/passwd")])
            .unwrap_err();
        assert!(err.to_string().contains("Failed to create backup"));
        assert!(fs.paths_under("/proj/.cleanarch/backups").is_empty());
    }

    #[test]
    fn copy_failure_aborts_creation() {
        let mut fs = MockFilesystem::new();
        fs.expect_create_dir_all().returning(|_| Ok(()));
        fs.expect_exists().returning(|_| true);
        fs.expect_copy_file().returning(|_, to| {
            Err(ApplicationError::filesystem(to, "disk full").into())
        });
        fs.expect_remove_dir_all().times(1).returning(|_| Ok(()));

        let service = BackupService::new(Arc::new(fs));
        let err = service
            .create_backup(Path::new("/proj"), &[PathBuf::from("a.txt")])
            .unwrap_err();
        assert!(matches!(
            err,
            CleanArchError::Application(ApplicationError::BackupCreation { .. })
        ));
    }

    // ── restore ──

    #[test]
    fn restore_brings_back_exact_content() {
        let (fs, service, root) = setup();
        fs.seed("/proj/src/main/resources/application.yml", "server:\n  port: 8080\n");
        let manifest = service
            .create_backup(&root, &[PathBuf::from("src/main/resources/application.yml")])
            .unwrap();

        fs.seed("/proj/src/main/resources/application.yml", "garbage");
        service.restore_backup(&root, &manifest.id).unwrap();

        assert_eq!(
            fs.content("/proj/src/main/resources/application.yml").as_deref(),
            Some("server:\n  port: 8080\n")
        );
    }

    #[test]
    fn restore_of_unknown_backup_names_its_location() {
        let (_, service, root) = setup();
        let err = service.restore_backup(&root, "backup_nope").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Application error: Backup not found: backup_nope at /proj/.cleanarch/backups/backup_nope"
        );
    }

    #[test]
    fn failed_restore_reports_manual_recovery() {
        let (fs, service, root) = setup();
        fs.seed("/proj/a.txt", "a");
        let manifest = service.create_backup(&root, &[PathBuf::from("a.txt")]).unwrap();
        fs.fail_writes_to("/proj/a.txt");

        let err = service.restore_backup(&root, &manifest.id).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Manual recovery may be required"));
        assert!(msg.contains(&format!("/proj/.cleanarch/backups/{}", manifest.id)));
    }

    // ── delete & list ──

    #[test]
    fn delete_is_idempotent() {
        let (fs, service, root) = setup();
        service.delete_backup(&root, "backup_never_created").unwrap();

        fs.seed("/proj/a.txt", "a");
        let manifest = service.create_backup(&root, &[PathBuf::from("a.txt")]).unwrap();
        service.delete_backup(&root, &manifest.id).unwrap();
        service.delete_backup(&root, &manifest.id).unwrap();
        assert!(!fs.exists(&BackupService::backup_path(&root, &manifest.id)));
    }

    #[test]
    fn list_returns_newest_first() {
        let (fs, service, root) = setup();
        assert!(service.list_backups(&root).unwrap().is_empty());

        fs.seed("/proj/a.txt", "a");
        let older = service.create_backup(&root, &[PathBuf::from("a.txt")]).unwrap();
        let newer = service.create_backup(&root, &[PathBuf::from("a.txt")]).unwrap();

        let ids: Vec<String> = service
            .list_backups(&root)
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }

    #[test]
    fn same_instant_backups_order_by_numeric_sequence() {
        let (fs, service, root) = setup();
        let at = Utc::now();
        for id in [
            "backup_20240101_000000_000_9",
            "backup_20240101_000000_000_10",
            "backup_20240101_000000_000_2",
        ] {
            let manifest = BackupManifest::new(id, at);
            fs.seed(
                root.join(BACKUP_DIR).join(id).join(MANIFEST_FILE),
                &serde_yaml::to_string(&manifest).unwrap(),
            );
        }

        let ids: Vec<String> = service
            .list_backups(&root)
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();

        assert_eq!(
            ids,
            vec![
                "backup_20240101_000000_000_10",
                "backup_20240101_000000_000_9",
                "backup_20240101_000000_000_2",
            ]
        );
    }
}
