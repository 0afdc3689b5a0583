//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "materialize a project" or "capture an extension".

pub mod capture_service;
pub mod catalog;
pub mod extension_resolver;
pub mod materialize_service;
pub mod migration_service;

#[cfg(test)]
pub(crate) mod testing;

pub use capture_service::{CaptureService, ExplicitBaseline, Upstream};
pub use extension_resolver::{CLONE_DIR, ExtensionResolver, FetchedExtension};
pub use materialize_service::{MaterializeOptions, MaterializeReport, MaterializeService};
pub use migration_service::{MigrationOptions, MigrationService};
