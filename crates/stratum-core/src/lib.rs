//! Stratum Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Stratum
//! layered scaffolder, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           stratum-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (Materialize, Capture, Resolve, Migrate)│
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (LayerSource, Filesystem, VersionControl)│
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    stratum-adapters (Infrastructure)    │
//! │  (DiskLayerStore, LocalFilesystem, git) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Layers, slot templates, deep-merge,    │
//! │  capture classification, baselines)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use stratum_core::prelude::*;
//!
//! # fn run(source: Box<dyn LayerSource>, filesystem: Box<dyn Filesystem>) -> StratumResult<()> {
//! // 1. Pick the layers
//! let stack = LayerStack::resolve(Path::new("templates"), Some(SolidityFramework::Hardhat), None);
//!
//! // 2. Use application service (with injected adapters)
//! let service = MaterializeService::new(source, filesystem);
//! service.materialize(&stack, Path::new("./my-dapp"), MaterializeOptions::default())?;
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        CaptureService, ExplicitBaseline, ExtensionResolver, MaterializeOptions,
        MaterializeService, MigrationOptions, MigrationService, Upstream,
        ports::{Filesystem, LayerSource, RepositoryHost, VersionControl},
    };
    pub use crate::domain::{
        ConfigValue, ExtensionCatalog, Layer, LayerStack, LogicalPath, ProjectStructure,
        SlotArgs, SolidityFramework, TemplateCatalog,
    };
    pub use crate::error::{StratumError, StratumResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
