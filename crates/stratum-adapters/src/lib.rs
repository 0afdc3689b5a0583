//! Infrastructure adapters for Stratum.
//!
//! This crate implements the ports defined in `stratum-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod builtin_extensions;
pub mod builtin_templates;
pub mod filesystem;
pub mod layer_store;
pub mod vcs;

// Re-export commonly used adapters
pub use builtin_extensions::{curated_catalog, manifest_json};
pub use builtin_templates::discover_templates_dir;
pub use filesystem::LocalFilesystem;
pub use layer_store::DiskLayerStore;
pub use vcs::{GitCli, GitRepositoryHost};
