//! Application layer for Stratum.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (materialize, capture, resolve, migrate)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    CaptureService, ExplicitBaseline, ExtensionResolver, FetchedExtension, MaterializeOptions,
    MaterializeReport, MaterializeService, MigrationOptions, MigrationService, Upstream,
    CLONE_DIR,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Contributions, Filesystem, LayerFile, LayerSource, RepositoryHost, VersionControl};

pub use error::ApplicationError;
