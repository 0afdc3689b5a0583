//! Classification of files changed since an extension's baseline.

use std::collections::BTreeSet;
use std::fmt;

use crate::domain::{
    entities::{baseline::BaselineMarkerSet, common::LogicalPath},
    value_objects::FileRole,
};

/// Logical paths known to the base and framework layers.
///
/// Built once by the composition root and passed to the capture service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateCatalog {
    parameterized: BTreeSet<LogicalPath>,
    core_files: BTreeSet<LogicalPath>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one core-layer file. Arguments files are not outputs and are ignored.
    pub fn record(&mut self, logical: LogicalPath, role: FileRole) {
        match role {
            FileRole::Template => {
                self.parameterized.insert(logical);
            }
            FileRole::Static => {
                self.core_files.insert(logical);
            }
            FileRole::Arguments => {}
        }
    }

    pub fn is_parameterized(&self, path: &LogicalPath) -> bool {
        self.parameterized.contains(path)
    }

    pub fn is_core_file(&self, path: &LogicalPath) -> bool {
        self.core_files.contains(path)
    }

    pub fn parameterized(&self) -> impl Iterator<Item = &LogicalPath> {
        self.parameterized.iter()
    }

    pub fn len(&self) -> usize {
        self.parameterized.len() + self.core_files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What capture does with one changed file. Exactly one applies per file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeClass {
    /// The path is rendered from a slot template; changes go through its
    /// arguments file instead.
    TemplateConflict { arguments_path: String },
    /// Lockfiles and other derived outputs are never captured.
    GeneratedArtifact { advice: String },
    /// Overlays may add files, not shadow core ones.
    ExistingCoreFile,
    /// Copied verbatim into the overlay.
    NovelAddition,
}

impl ChangeClass {
    pub fn is_copied(&self) -> bool {
        matches!(self, Self::NovelAddition)
    }

    /// Actionable message for rejected files.
    pub fn advice(&self, path: &LogicalPath) -> Option<String> {
        match self {
            Self::TemplateConflict { arguments_path } => Some(format!(
                "{path} is generated from a template. Please instead create/update: {arguments_path}"
            )),
            Self::GeneratedArtifact { advice } => Some(format!("{path} {advice}")),
            Self::ExistingCoreFile => Some(format!(
                "{path} already exists in the base or a framework layer; overlays may only add new files"
            )),
            Self::NovelAddition => None,
        }
    }
}

impl fmt::Display for ChangeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TemplateConflict { .. } => f.write_str("template-conflict"),
            Self::GeneratedArtifact { .. } => f.write_str("generated-artifact"),
            Self::ExistingCoreFile => f.write_str("existing-core-file"),
            Self::NovelAddition => f.write_str("novel-addition"),
        }
    }
}

const LOCKFILES: [&str; 3] = ["yarn.lock", "package-lock.json", "pnpm-lock.yaml"];
const DEPLOYED_CONTRACTS: &str = "deployedContracts.ts";
const PACKAGE_MANIFEST: &str = "package.json";

/// Derived files that capture never copies and an extension layer never
/// overwrites, with the follow-up advice for each. `shadows_core` is whether
/// a base or framework layer already ships the path; a package manifest is
/// only protected then, so new packages may bring their own.
pub fn generated_artifact(path: &LogicalPath, shadows_core: bool) -> Option<&'static str> {
    let name = path.file_name();
    if LOCKFILES.contains(&name) {
        return Some("will be generated when running the package manager install");
    }
    if name == DEPLOYED_CONTRACTS {
        return Some("can be generated using `yarn deploy`");
    }
    if name == PACKAGE_MANIFEST && shadows_core {
        return Some(
            "is owned by the base or a framework layer and an extension cannot replace it; \
             add the new dependencies and scripts to the generated project instead",
        );
    }
    None
}

/// Classify one changed path. Precedence: template conflict, generated
/// artifact, existing core file, novel addition.
pub fn classify_change(path: &LogicalPath, catalog: &TemplateCatalog) -> ChangeClass {
    if catalog.is_parameterized(path) {
        return ChangeClass::TemplateConflict {
            arguments_path: path.arguments_path(),
        };
    }
    if let Some(advice) = generated_artifact(path, catalog.is_core_file(path)) {
        return ChangeClass::GeneratedArtifact {
            advice: advice.into(),
        };
    }
    if catalog.is_core_file(path) {
        return ChangeClass::ExistingCoreFile;
    }
    ChangeClass::NovelAddition
}

/// Deleted-or-renamed entry from the baseline diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalKind {
    Deleted,
    Renamed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub path: LogicalPath,
    pub kind: RemovalKind,
}

/// Per-file capture result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOutcome {
    pub path: LogicalPath,
    pub class: ChangeClass,
}

/// Result of a completed capture. Rejections are advisories, not failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureReport {
    pub markers: BaselineMarkerSet,
    pub outcomes: Vec<CaptureOutcome>,
    pub removals: Vec<Removal>,
}

impl CaptureReport {
    pub fn copied(&self) -> impl Iterator<Item = &LogicalPath> {
        self.outcomes
            .iter()
            .filter(|o| o.class.is_copied())
            .map(|o| &o.path)
    }

    /// `(path, message)` for every rejected file, in diff order.
    pub fn advisories(&self) -> Vec<(&LogicalPath, String)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.class.advice(&o.path).map(|msg| (&o.path, msg)))
            .collect()
    }

    pub fn has_advisories(&self) -> bool {
        self.outcomes.iter().any(|o| !o.class.is_copied())
    }
}
