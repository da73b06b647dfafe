//! Generation Orchestrator - validate, back up, generate, commit or roll back.
//!
//! One run per project root at a time. Nothing here locks; two concurrent
//! runs against the same tree can corrupt each other's backups.
//!
//! ```text
//! Idle → Validating → Rejected
//!                   → Validated → BackingUp → Generating → Committed  → Done
//!                                                        → RollingBack → Done
//! ```

use serde_yaml::Value;
use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Bindings, Filesystem, ProjectConfigStore, TemplateProvider},
        services::{
            backup_service::BackupService,
            planner::{
                DescriptorUpdate, GenerationPlan, GenerationPlanner, PlannedFileKind,
                PropertiesMerge, SETTINGS_FILE, resolve_package,
            },
        },
    },
    domain::{
        ArtifactSpec, BackupManifest, ConflictDetector, ContentMerger, DescriptorMerger,
        FailureStage, GeneratedFile, GenerationRequest, GenerationResult, PathResolver,
        ProjectConfig, ValidationResult,
        services::{parse_declarations, parse_document, render_document},
        validators,
    },
    error::{CleanArchError, CleanArchResult},
};

pub const ROLLED_BACK: &str = "All changes have been rolled back.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    Validating,
    Rejected,
    Validated,
    BackingUp,
    Generating,
    Committed,
    RollingBack,
    Done,
}

impl GenerationState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Rejected => "rejected",
            Self::Validated => "validated",
            Self::BackingUp => "backing-up",
            Self::Generating => "generating",
            Self::Committed => "committed",
            Self::RollingBack => "rolling-back",
            Self::Done => "done",
        }
    }

    fn advance(self, next: Self) -> Self {
        debug!(from = %self, to = %next, "State transition");
        next
    }
}

impl fmt::Display for GenerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything pre-flight learned that the write phase needs.
struct Prepared {
    project: ProjectConfig,
    plan: GenerationPlan,
    /// Planned files that are not rendered.
    skipped: BTreeSet<PathBuf>,
    /// Touched paths present before the run, relative to the root.
    existing: BTreeSet<PathBuf>,
    warnings: Vec<String>,
}

#[derive(Default)]
struct Run {
    files: Vec<GeneratedFile>,
    /// Paths this run brought into existence; rollback removes them.
    created: Vec<PathBuf>,
    /// Absolute directories missing before the run wrote into them.
    created_dirs: BTreeSet<PathBuf>,
    warnings: Vec<String>,
}

impl Run {
    fn record(&mut self, path: &Path, content: String, existed: bool) {
        if let Some(file) = self.files.iter_mut().find(|f| f.path == path) {
            file.content = content;
            return;
        }
        if existed {
            self.files.push(GeneratedFile::merged(path, content));
        } else {
            self.created.push(path.to_path_buf());
            self.files.push(GeneratedFile::created(path, content));
        }
    }
}

pub struct GenerationOrchestrator {
    filesystem: Arc<dyn Filesystem>,
    templates: Arc<dyn TemplateProvider>,
    projects: Arc<dyn ProjectConfigStore>,
    backups: BackupService,
    planner: GenerationPlanner,
    resolver: PathResolver,
    content_merger: ContentMerger,
    descriptor_merger: DescriptorMerger,
    conflicts: ConflictDetector,
    fail_on_conflicts: bool,
}

impl GenerationOrchestrator {
    pub fn new(
        filesystem: Arc<dyn Filesystem>,
        templates: Arc<dyn TemplateProvider>,
        projects: Arc<dyn ProjectConfigStore>,
    ) -> Self {
        Self {
            backups: BackupService::new(filesystem.clone()),
            filesystem,
            templates,
            projects,
            planner: GenerationPlanner::new(),
            resolver: PathResolver::new(),
            content_merger: ContentMerger::new(),
            descriptor_merger: DescriptorMerger,
            conflicts: ConflictDetector::new(),
            fail_on_conflicts: false,
        }
    }

    /// Treat dependency conflicts as generation errors instead of warnings.
    pub fn with_fail_on_conflicts(mut self, fail: bool) -> Self {
        self.fail_on_conflicts = fail;
        self
    }

    pub fn backups(&self) -> &BackupService {
        &self.backups
    }

    /// Runs one request to a terminal state.
    ///
    /// Pre-flight failures never touch the disk. A failure after the backup
    /// restores it and removes the files and directories the run created;
    /// the backup directory is kept in that case. `failed_at` tells the
    /// two apart.
    #[instrument(
        skip_all,
        fields(
            kind = %request.kind(),
            name = %request.name(),
            root = %request.project_root().display()
        )
    )]
    pub fn generate(&self, request: &GenerationRequest) -> GenerationResult {
        let root = request.project_root();
        let kind = request.kind().display_name();
        let state = GenerationState::Idle.advance(GenerationState::Validating);

        let prepared = match self.preflight(request) {
            Ok(prepared) => prepared,
            Err(report) => {
                state.advance(GenerationState::Rejected);
                let (errors, warnings) = report.into_parts();
                warn!(errors = errors.len(), "Pre-flight validation failed");
                for e in &errors {
                    debug!("  - {e}");
                }
                return GenerationResult::failure(FailureStage::Validation, errors, warnings);
            }
        };
        let state = state
            .advance(GenerationState::Validated)
            .advance(GenerationState::BackingUp);

        let to_back_up: Vec<PathBuf> = prepared.existing.iter().cloned().collect();
        let backup = if to_back_up.is_empty() {
            debug!("No existing files touched, skipping backup");
            None
        } else {
            match self.backups.create_backup(root, &to_back_up) {
                Ok(manifest) => {
                    info!(backup_id = %manifest.id, "Created backup");
                    Some(manifest)
                }
                Err(e) => {
                    error!(error = %e, "Backup failed, nothing was modified");
                    return GenerationResult::failure(
                        FailureStage::Backup,
                        vec![format!("Failed to generate {kind}: {}", reason(&e))],
                        prepared.warnings,
                    );
                }
            }
        };

        let state = state.advance(GenerationState::Generating);
        let mut run = Run {
            warnings: prepared.warnings.clone(),
            ..Run::default()
        };

        match self.write_plan(root, &prepared, &mut run) {
            Ok(()) => {
                state
                    .advance(GenerationState::Committed)
                    .advance(GenerationState::Done);
                if let Some(manifest) = &backup {
                    if let Err(e) = self.backups.delete_backup(root, &manifest.id) {
                        warn!(error = %e, backup_id = %manifest.id, "Could not delete backup");
                        run.warnings
                            .push(format!("Could not delete backup {}: {}", manifest.id, reason(&e)));
                    }
                }
                info!(files = run.files.len(), "Generation committed");
                GenerationResult::success(run.files, run.warnings)
            }
            Err(e) => {
                error!(error = %e, "Generation failed, rolling back");
                state.advance(GenerationState::RollingBack);
                let result = self.roll_back(root, backup.as_ref(), run, kind, &e);
                GenerationState::RollingBack.advance(GenerationState::Done);
                result
            }
        }
    }

    // -------------------------------------------------------------------------
    // Pre-flight
    // -------------------------------------------------------------------------

    fn preflight(&self, request: &GenerationRequest) -> Result<Prepared, ValidationResult> {
        let root = request.project_root();
        let mut report = ValidationResult::success();

        let project = match self.projects.load(root) {
            Ok(Some(project)) => Some(project),
            Ok(None) => {
                report.add_error(
                    ApplicationError::ProjectNotInitialized {
                        root: root.to_path_buf(),
                    }
                    .to_string(),
                );
                None
            }
            Err(e) => {
                report.add_error(reason(&e));
                None
            }
        };

        let package = match &project {
            Some(project) => resolve_package(request.spec(), &project.base_package),
            None => request.spec().package().unwrap_or_default().to_string(),
        };
        report.absorb(structural_checks(request.spec(), &package));

        let Some(project) = project else {
            return Err(report);
        };
        report.absorb(validators::validate_base_package_consistency(
            &package,
            &project.base_package,
        ));

        let architecture = match self.templates.architecture_metadata(project.architecture) {
            Ok(metadata) => {
                report.absorb(metadata.validate());
                Some(metadata)
            }
            Err(e) => {
                report.add_error(format!(
                    "Architecture metadata not found for '{}': {}",
                    project.architecture,
                    reason(&e)
                ));
                None
            }
        };

        let artifact = match request.spec() {
            ArtifactSpec::Adapter(spec) => match self.templates.artifact_metadata(spec.adapter_type) {
                Ok(metadata) => {
                    report.absorb(metadata.validate());
                    Some(metadata)
                }
                Err(e) => {
                    report.add_error(format!(
                        "Adapter metadata not found for '{}': {}",
                        spec.adapter_type,
                        reason(&e)
                    ));
                    return Err(report);
                }
            },
            _ => None,
        };

        let Some(architecture) = architecture else {
            return Err(report);
        };
        let plan = match self
            .planner
            .plan(request, &project, &architecture, artifact.as_ref())
        {
            Ok(plan) => plan,
            Err(e) => {
                report.add_error(e.to_string());
                return Err(report);
            }
        };

        let mut seen = BTreeSet::new();
        for id in plan.templates() {
            if seen.insert(id) {
                self.check_template(id, &mut report);
            }
        }

        let mut skipped = BTreeSet::new();
        for file in plan.files.iter().filter(|f| f.optional) {
            if self.templates.exists(&file.template_id) {
                self.check_template(&file.template_id, &mut report);
            } else {
                report.add_warning(format!(
                    "Module build template not found: {} (required for adaptersAsModules=true)",
                    file.template_id
                ));
                skipped.insert(file.path.clone());
            }
        }

        for dir in &plan.layer_checks {
            report.absorb(self.resolver.validate_layer(dir, &architecture));
        }

        let existing: BTreeSet<PathBuf> = plan
            .touched_paths()
            .into_iter()
            .filter(|p| self.filesystem.exists(&root.join(p)))
            .collect();
        for file in plan.files.iter().filter(|f| existing.contains(&f.path)) {
            match file.kind {
                PlannedFileKind::Source => {
                    report.add_error(format!("File already exists: {}", file.path.display()));
                }
                PlannedFileKind::Shared | PlannedFileKind::ModuleDescriptor => {
                    debug!(path = %file.path.display(), "Shared file exists, keeping it");
                    skipped.insert(file.path.clone());
                }
            }
        }

        if !report.is_valid() {
            return Err(report);
        }
        let (_, warnings) = report.into_parts();
        Ok(Prepared {
            project,
            plan,
            skipped,
            existing,
            warnings,
        })
    }

    fn check_template(&self, id: &str, report: &mut ValidationResult) {
        if !self.templates.exists(id) {
            report.add_error(ApplicationError::TemplateNotFound { id: id.to_string() }.to_string());
            return;
        }
        let verdict = self.templates.validate(id);
        if let Some(first) = verdict.first_error() {
            report.add_error(
                ApplicationError::TemplateSyntax {
                    id: id.to_string(),
                    reason: first.to_string(),
                }
                .to_string(),
            );
        }
    }

    // -------------------------------------------------------------------------
    // Generating
    // -------------------------------------------------------------------------

    fn write_plan(&self, root: &Path, prepared: &Prepared, run: &mut Run) -> CleanArchResult<()> {
        let plan = &prepared.plan;

        for file in &plan.files {
            if prepared.skipped.contains(&file.path) {
                continue;
            }
            let content = self.render(&file.template_id, &file.bindings)?;
            self.write(root, &file.path, content, prepared, run)?;
        }

        if let Some(properties) = &plan.properties {
            self.merge_properties(root, properties, prepared, run)?;
        }
        if let Some(update) = &plan.descriptor {
            self.update_descriptor(root, update, prepared, run)?;
        }
        for module in &plan.settings_includes {
            self.include_module(root, module, prepared, run)?;
        }
        Ok(())
    }

    fn render(&self, id: &str, bindings: &Bindings) -> CleanArchResult<String> {
        self.templates.render(id, bindings)
    }

    fn write(
        &self,
        root: &Path,
        path: &Path,
        content: String,
        prepared: &Prepared,
        run: &mut Run,
    ) -> CleanArchResult<()> {
        let target = root.join(path);
        // Recorded before writing so a half-finished write is still cleaned up.
        run.created_dirs.extend(self.missing_parents(root, &target));
        self.filesystem.write_file(&target, &content)?;
        debug!(path = %path.display(), bytes = content.len(), "Wrote file");
        run.record(path, content, prepared.existing.contains(path));
        Ok(())
    }

    /// Ancestors of `target` below `root` that do not exist yet.
    fn missing_parents(&self, root: &Path, target: &Path) -> Vec<PathBuf> {
        target
            .ancestors()
            .skip(1)
            .take_while(|dir| dir.starts_with(root) && *dir != root)
            .take_while(|dir| !self.filesystem.exists(dir))
            .map(Path::to_path_buf)
            .collect()
    }

    fn read_or_empty(&self, path: &Path) -> CleanArchResult<String> {
        if self.filesystem.exists(path) {
            self.filesystem.read_to_string(path)
        } else {
            Ok(String::new())
        }
    }

    #[instrument(skip_all, fields(path = %merge.path.display()))]
    fn merge_properties(
        &self,
        root: &Path,
        merge: &PropertiesMerge,
        prepared: &Prepared,
        run: &mut Run,
    ) -> CleanArchResult<()> {
        let overlay_text = self.render(&merge.template_id, &merge.bindings)?;
        let overlay = parse_document(&overlay_text)?;

        let content = if prepared.existing.contains(&merge.path) {
            let existing = self.filesystem.read_to_string(&root.join(&merge.path))?;
            let base = parse_document(&existing)?;
            let result = self
                .content_merger
                .merge(&Value::Mapping(base), &Value::Mapping(overlay))?;

            for conflict in &result.conflicts {
                warn!(conflict = %conflict, "Kept existing property");
            }
            run.warnings.extend(result.conflicts.iter().cloned());

            if result.added_keys.is_empty() {
                debug!("Properties already present");
                return Ok(());
            }
            info!(added = result.added_keys_count(), "Merged application properties");
            render_document(&existing, &result.additions)?
        } else {
            render_document("", &overlay)?
        };

        self.write(root, &merge.path, content, prepared, run)
    }

    #[instrument(skip_all, fields(path = %update.path.display(), dependencies = update.dependencies.len()))]
    fn update_descriptor(
        &self,
        root: &Path,
        update: &DescriptorUpdate,
        prepared: &Prepared,
        run: &mut Run,
    ) -> CleanArchResult<()> {
        let text = self.read_or_empty(&root.join(&update.path))?;
        let overrides = &prepared.project.dependency_overrides;
        let incoming = self
            .conflicts
            .apply_version_overrides(&update.dependencies, Some(overrides));

        let existing = parse_declarations(&text);
        let mut conflicts = self.conflicts.detect_version_conflicts(&existing, &incoming);
        conflicts.extend(
            self.conflicts
                .detect_framework_conflicts(prepared.project.framework, &incoming),
        );

        if !conflicts.is_empty() {
            if self.fail_on_conflicts {
                return Err(ApplicationError::Generation(format!(
                    "Dependency conflicts detected: {}",
                    conflicts.join("; ")
                ))
                .into());
            }
            warn!(count = conflicts.len(), "Dependency conflicts detected");
            let suggestions = self.conflicts.suggest_resolution(&conflicts);
            run.warnings.extend(conflicts);
            run.warnings.extend(suggestions);
        }

        match self.descriptor_merger.ensure_dependencies(&text, &incoming)? {
            Some(updated) => self.write(root, &update.path, updated, prepared, run),
            None => {
                debug!("Descriptor already declares every dependency");
                Ok(())
            }
        }
    }

    fn include_module(
        &self,
        root: &Path,
        module: &str,
        prepared: &Prepared,
        run: &mut Run,
    ) -> CleanArchResult<()> {
        let settings = Path::new(SETTINGS_FILE);
        let text = self.read_or_empty(&root.join(settings))?;
        match self.descriptor_merger.ensure_include(&text, module) {
            Some(updated) => {
                info!(module, "Added module to settings");
                self.write(root, settings, updated, prepared, run)
            }
            None => Ok(()),
        }
    }

    // -------------------------------------------------------------------------
    // Rolling back
    // -------------------------------------------------------------------------

    fn roll_back(
        &self,
        root: &Path,
        backup: Option<&BackupManifest>,
        run: Run,
        kind: &str,
        cause: &CleanArchError,
    ) -> GenerationResult {
        let mut errors = vec![format!("Failed to generate {kind}: {}", reason(cause))];
        let mut clean = true;

        for path in run.created.iter().rev() {
            if let Err(e) = self.filesystem.remove_file(&root.join(path)) {
                warn!(path = %path.display(), error = %e, "Could not remove generated file");
                errors.push(format!("Could not remove generated file: {}", path.display()));
                clean = false;
            }
        }

        let mut dirs: Vec<&PathBuf> = run.created_dirs.iter().collect();
        dirs.sort_by_key(|dir| Reverse(dir.components().count()));
        for dir in dirs {
            match self.filesystem.list_dir(dir) {
                Ok(children) if children.is_empty() => {
                    if let Err(e) = self.filesystem.remove_dir_all(dir) {
                        warn!(path = %dir.display(), error = %e, "Could not remove created directory");
                        errors.push(format!("Could not remove created directory: {}", dir.display()));
                        clean = false;
                    }
                }
                Ok(_) => debug!(path = %dir.display(), "Directory not empty, keeping it"),
                Err(e) => warn!(path = %dir.display(), error = %e, "Could not list created directory"),
            }
        }

        match backup {
            Some(manifest) => match self.backups.restore_backup(root, &manifest.id) {
                Ok(_) => {
                    info!(backup_id = %manifest.id, "Restored backup");
                    if clean {
                        errors.push(ROLLED_BACK.to_string());
                    }
                }
                Err(e) => {
                    error!(backup_id = %manifest.id, error = %e, "Failed to restore backup");
                    errors.push("Failed to restore backup automatically.".into());
                    errors.push("Manual recovery may be required.".into());
                    errors.push(format!(
                        "Backup location: {}",
                        BackupService::backup_path(root, &manifest.id).display()
                    ));
                }
            },
            None if clean => errors.push(ROLLED_BACK.to_string()),
            None => {}
        }

        GenerationResult::failure(FailureStage::Generation, errors, run.warnings)
    }
}

fn structural_checks(spec: &ArtifactSpec, package: &str) -> ValidationResult {
    match spec {
        ArtifactSpec::Entity(s) => validators::validate_entity(s),
        ArtifactSpec::UseCase(s) => validators::validate_use_case(s, package),
        ArtifactSpec::Adapter(s) => validators::validate_adapter(s, package),
        ArtifactSpec::InputAdapter(s) => validators::validate_input_adapter(s, package),
    }
}

/// The message without the layer prefix.
fn reason(error: &CleanArchError) -> String {
    match error {
        CleanArchError::Domain(e) => e.to_string(),
        CleanArchError::Application(e) => e.to_string(),
        other => other.to_string(),
    }
}
