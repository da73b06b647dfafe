//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "generate an adapter" or "restore a backup".

pub mod backup_service;
pub mod orchestrator;
pub mod planner;

#[cfg(test)]
pub(crate) mod test_support;

pub use backup_service::{BACKUP_DIR, BackupService, MANIFEST_FILE};
pub use orchestrator::{GenerationOrchestrator, GenerationState, ROLLED_BACK};
pub use planner::{
    APPLICATION_PROPERTIES, DescriptorUpdate, GenerationPlan, GenerationPlanner, JAVA_ROOT,
    PlannedFile, PlannedFileKind, PropertiesMerge, ROOT_DESCRIPTOR, SETTINGS_FILE,
};
