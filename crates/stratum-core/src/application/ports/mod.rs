//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `stratum-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `LayerSource`: Layer walking and template/arguments parsing
//!   - `VersionControl`: git merge-base, diff and commit primitives
//!   - `RepositoryHost`: Remote extension existence checks and clones
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

#[cfg(test)]
pub use output::MockVersionControl;
pub use output::{
    Contributions, Filesystem, LayerFile, LayerSource, RepositoryHost, VersionControl,
};
