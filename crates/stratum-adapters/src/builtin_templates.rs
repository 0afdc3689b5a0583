//! Shipped template-layer discovery.
//!
//! This module provides [`discover_templates_dir`], the single entry-point for
//! locating the layer tree that ships with Stratum. It abstracts over the
//! discovery strategy so callers do not need to know where layers live on disk.
//!
//! # Resolution order
//!
//! Candidates are probed in this priority order, stopping at the first one
//! that contains a `base/` layer:
//!
//! 1. **`$STRATUM_TEMPLATES_DIR`**: environment variable override. Set this
//!    in `.env` or your shell profile to point at a custom layer collection.
//! 2. **`./templates`**: relative to the current working directory.
//! 3. **`<executable-dir>/templates`**: sibling to the `stratum` binary.
//! 4. **`../templates`**: one level above CWD, for `cargo run` from `target/`.
//!
//! If nothing is found, [`discover_templates_dir`] returns `None` and emits a
//! `WARN` log entry. The CLI surfaces an actionable error.
//!
//! # Expected layout
//!
//! ```text
//! templates/
//! ├── base/
//! │   ├── .gitignore.template.toml
//! │   └── README.md
//! └── solidity-frameworks/
//!     ├── hardhat/
//!     │   └── .gitignore.args.toml
//!     └── foundry/
//!         └── .gitignore.args.toml
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use stratum_core::domain::BASE_DIR;

/// Environment variable naming the templates root.
pub const TEMPLATES_DIR_ENV: &str = "STRATUM_TEMPLATES_DIR";

// ── Public API ────────────────────────────────────────────────────────────────

/// Locate the templates root using the order described in the module docs.
#[instrument]
pub fn discover_templates_dir() -> Option<PathBuf> {
    let found = first_templates_root(candidate_paths());
    match &found {
        Some(path) => info!(path = %path.display(), "templates root found"),
        None => warn!(
            "no templates directory found; checked ${TEMPLATES_DIR_ENV}, \
             ./templates, <exe>/templates, and ../templates"
        ),
    }
    found
}

/// Whether `path` looks like a templates root.
pub fn is_templates_root(path: &Path) -> bool {
    path.join(BASE_DIR).is_dir()
}

// ── Resolution helpers ────────────────────────────────────────────────────────

fn first_templates_root(candidates: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    candidates.into_iter().find(|candidate| {
        let usable = is_templates_root(candidate);
        debug!(path = %candidate.display(), usable, "checked candidate templates path");
        usable
    })
}

/// Build the ordered list of candidate paths to probe.
///
/// Missing env-var or unresolvable exe paths are silently omitted.
fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(4);

    if let Ok(env_dir) = std::env::var(TEMPLATES_DIR_ENV) {
        paths.push(PathBuf::from(env_dir));
    }

    paths.push(PathBuf::from("templates"));

    if let Some(exe_sibling) = exe_sibling_templates() {
        paths.push(exe_sibling);
    }

    paths.push(PathBuf::from("../templates"));

    paths
}

/// Return `<directory of current executable>/templates`, or `None` if the
/// executable path cannot be determined (some platforms / test runners).
fn exe_sibling_templates() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("templates")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn first_candidate_with_base_layer_wins() {
        let empty = TempDir::new().unwrap();
        let layered = TempDir::new().unwrap();
        std::fs::create_dir(layered.path().join("base")).unwrap();

        let found = first_templates_root([
            PathBuf::from("/no/such/dir"),
            empty.path().to_path_buf(),
            layered.path().to_path_buf(),
        ]);
        assert_eq!(found.as_deref(), Some(layered.path()));
    }

    #[test]
    fn nothing_usable_yields_none() {
        assert_eq!(first_templates_root([PathBuf::from("/no/such/dir")]), None);
    }

    #[test]
    fn cwd_and_parent_are_always_candidates() {
        let paths = candidate_paths();
        assert!(paths.contains(&PathBuf::from("templates")));
        assert_eq!(paths.last(), Some(&PathBuf::from("../templates")));
    }
}
