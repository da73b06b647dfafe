//! Discovery of the template root that ships with cleanarch.
//!
//! # Template root resolution order
//!
//! The first candidate that is a directory containing an `architectures/`
//! subdirectory wins:
//!
//! 1. **Explicit path** : `--templates` or `templates.path` in the config file.
//! 2. **`$CLEANARCH_TEMPLATES_DIR`** : environment override, also read from `.env`.
//! 3. **`./templates`** : relative to the current working directory.
//! 4. **`<executable-dir>/templates`** : sibling to the installed binary.
//! 5. **`../templates`** : development fallback when running from `target/`.
//!
//! An explicit path that does not qualify is not silently replaced by a
//! later candidate; [`locate_template_root`] returns `None` for it.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

/// Environment variable naming a template root.
pub const TEMPLATES_DIR_ENV: &str = "CLEANARCH_TEMPLATES_DIR";

/// Subdirectory every template root must contain.
const ROOT_MARKER: &str = "architectures";

// ── Public API ────────────────────────────────────────────────────────────────

/// Find the template root using the resolution order in the module docs.
#[instrument]
pub fn locate_template_root(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if is_template_root(path) {
            info!(path = %path.display(), "using configured template root");
            return Some(path.to_path_buf());
        }
        warn!(
            path = %path.display(),
            "configured template root has no '{ROOT_MARKER}' directory"
        );
        return None;
    }

    for candidate in candidate_paths() {
        debug!(path = %candidate.display(), "checking candidate template root");
        if is_template_root(&candidate) {
            info!(path = %candidate.display(), "template root found");
            return Some(candidate);
        }
    }

    warn!(
        "no template root found; checked ${TEMPLATES_DIR_ENV}, \
         ./templates, <exe>/templates, and ../templates"
    );
    None
}

/// Whether `path` looks like a template root.
pub fn is_template_root(path: &Path) -> bool {
    path.join(ROOT_MARKER).is_dir()
}

// ── Resolution helpers ────────────────────────────────────────────────────────

fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(4);

    if let Ok(env_dir) = std::env::var(TEMPLATES_DIR_ENV) {
        let p = PathBuf::from(env_dir);
        debug!(path = %p.display(), "candidate from ${TEMPLATES_DIR_ENV}");
        paths.push(p);
    }

    paths.push(PathBuf::from("templates"));

    if let Some(exe_sibling) = exe_sibling_templates() {
        debug!(path = %exe_sibling.display(), "candidate from exe sibling");
        paths.push(exe_sibling);
    }

    paths.push(PathBuf::from("../templates"));

    paths
}

/// `None` when the executable path cannot be determined (some test runners).
fn exe_sibling_templates() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("templates")))
}
