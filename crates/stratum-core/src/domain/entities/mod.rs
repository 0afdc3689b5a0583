pub mod baseline;
pub mod capture;
pub mod common;
pub mod extension;
pub mod layer;
pub mod project_structure;

pub use crate::domain::DomainError;
pub use baseline::{BaselineInference, BaselineMarkerSet, BranchProbe, Confidence};
pub use capture::{CaptureReport, ChangeClass, TemplateCatalog};
pub use common::LogicalPath;
pub use extension::{ExtensionCatalog, ExtensionDescriptor, RepositoryRef, ResolvedExtension};
pub use layer::{Layer, LayerStack};
pub use project_structure::{FileContent, ProjectStructure};
