//! Pure domain services. No I/O; every input arrives as a value or text.

pub mod conflict_detector;
pub mod content_merger;
pub mod descriptor_merger;
pub mod path_resolver;

pub use conflict_detector::{ConflictDetector, VersionOverrides};
pub use content_merger::{
    ContentMerger, MergeResult, SECURITY_WARNING, contains_sensitive_keys, is_sensitive_key,
    parse_document, render_document,
};
pub use descriptor_merger::{DescriptorMerger, parse_declarations, settings_include};
pub use path_resolver::{PathResolver, Placeholders, substitute_placeholders};
