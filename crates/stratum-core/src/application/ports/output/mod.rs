//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `stratum-adapters` crate provides implementations.

use std::path::Path;

use crate::domain::{
    ConfigValue, FileRole, Layer, LogicalPath, ParameterizedTemplate, RemovalKind,
};
use crate::error::StratumResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `stratum_adapters::filesystem::LocalFilesystem` (production)
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> StratumResult<()>;

    /// Write bytes to a file, replacing any previous content.
    fn write_file(&self, path: &Path, content: &[u8]) -> StratumResult<()>;

    /// Copy a single file. The destination's parent must exist.
    fn copy_file(&self, from: &Path, to: &Path) -> StratumResult<()>;

    /// Read a UTF-8 file.
    fn read_to_string(&self, path: &Path) -> StratumResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> StratumResult<()>;
}

/// One file found under a layer root, after [`Layer::admit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerFile {
    pub logical: LogicalPath,
    pub role: FileRole,
}

/// Ordered slot contributions from one arguments file.
pub type Contributions = Vec<(String, ConfigValue)>;

/// Port for reading (and, for migration fixes, writing) layer trees.
///
/// Implemented by:
/// - `stratum_adapters::layer_store::DiskLayerStore` (templates on disk)
pub trait LayerSource: Send + Sync {
    /// Every admitted file of `layer`, in a stable directory-then-file order.
    /// A missing layer root yields an empty list.
    fn list_files(&self, layer: &Layer) -> StratumResult<Vec<LayerFile>>;

    /// Parse `<logical>.template.toml`.
    fn load_template(
        &self,
        layer: &Layer,
        logical: &LogicalPath,
    ) -> StratumResult<ParameterizedTemplate>;

    /// Parse `<logical>.args.toml` into ordered contributions.
    fn load_arguments(&self, layer: &Layer, logical: &LogicalPath) -> StratumResult<Contributions>;

    /// Rewrite `<logical>.args.toml`.
    fn write_arguments(
        &self,
        layer: &Layer,
        logical: &LogicalPath,
        contributions: &[(String, ConfigValue)],
    ) -> StratumResult<()>;

    /// Raw bytes of a static file.
    fn read_static(&self, layer: &Layer, logical: &LogicalPath) -> StratumResult<Vec<u8>>;

    /// Contents of a baseline marker at the layer root, if present.
    fn read_marker(&self, layer: &Layer, name: &str) -> StratumResult<Option<String>>;
}

/// Port for the git primitives capture needs.
///
/// Implemented by `stratum_adapters::vcs::GitCli`.
#[cfg_attr(test, mockall::automock)]
pub trait VersionControl: Send + Sync {
    /// Add a named remote. An existing remote of that name is left alone.
    fn add_remote(&self, repo: &Path, name: &str, url: &str) -> StratumResult<()>;

    /// Fetch one branch of a remote, without tags.
    fn fetch(&self, repo: &Path, remote: &str, branch: &str) -> StratumResult<()>;

    /// Resolve a revision to a full commit hash.
    fn rev_parse(&self, repo: &Path, rev: &str) -> StratumResult<String>;

    /// Merge-base of HEAD and `rev`; `None` when the histories are unrelated.
    fn merge_base(&self, repo: &Path, rev: &str) -> StratumResult<Option<String>>;

    /// Committer time of `commit`, seconds since the epoch.
    fn commit_timestamp(&self, repo: &Path, commit: &str) -> StratumResult<i64>;

    /// Paths added or modified between `base` and HEAD (deletions excluded).
    fn changed_files(&self, repo: &Path, base: &str) -> StratumResult<Vec<String>>;

    /// Paths deleted or renamed away between `base` and HEAD.
    fn removed_files(&self, repo: &Path, base: &str) -> StratumResult<Vec<(RemovalKind, String)>>;

    /// `git init` plus an initial commit. A no-op when `dir` is already a repository.
    fn init_and_commit(&self, dir: &Path, message: &str) -> StratumResult<()>;
}

/// Port for remote extension repositories.
///
/// Implemented by `stratum_adapters::vcs::GitRepositoryHost`.
pub trait RepositoryHost: Send + Sync {
    /// Whether `url` (and `branch`, when given) exists.
    fn exists(&self, url: &str, branch: Option<&str>) -> StratumResult<bool>;

    /// Shallow-clone `url` into `dest`.
    fn clone_into(&self, url: &str, branch: Option<&str>, dest: &Path) -> StratumResult<()>;
}
