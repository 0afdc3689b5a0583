use std::path::{Path, PathBuf};

use crate::domain::{
    entities::{baseline::MARKER_FILES, common::LogicalPath},
    error::DomainError,
    value_objects::{FileRole, LayerKind, SolidityFramework},
};

/// Directory of the base layer under the templates root.
pub const BASE_DIR: &str = "base";

/// Directory holding one subtree per solidity framework.
pub const FRAMEWORKS_DIR: &str = "solidity-frameworks";

/// Directory holding an extension's overlay tree.
pub const EXTENSION_DIR: &str = "extension";

/// One layer root contributing files to a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    root: PathBuf,
    kind: LayerKind,
}

impl Layer {
    pub fn new(root: impl Into<PathBuf>, kind: LayerKind) -> Self {
        Self {
            root: root.into(),
            kind,
        }
    }

    pub fn base(templates_root: &Path) -> Self {
        Self::new(templates_root.join(BASE_DIR), LayerKind::Base)
    }

    /// The `<frameworks>/<framework>/` subtree, re-rooted as its own layer.
    pub fn framework(templates_root: &Path, framework: SolidityFramework) -> Self {
        Self::new(
            templates_root.join(FRAMEWORKS_DIR).join(framework.as_str()),
            LayerKind::Framework(framework),
        )
    }

    /// An extension checked out at `extension_root` (its overlay lives in
    /// `extension_root/extension`).
    pub fn extension(extension_root: &Path, framework: Option<SolidityFramework>) -> Self {
        Self::new(
            extension_root.join(EXTENSION_DIR),
            LayerKind::Extension { framework },
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    /// Map a layer-relative file path to its logical path and role.
    ///
    /// Returns `Ok(None)` for files that never take part in materialization:
    /// baseline marker logs at an extension root, and an extension's
    /// `packages/<framework>` subtrees for frameworks other than the active one.
    pub fn admit(&self, relative: &str) -> Result<Option<(LogicalPath, FileRole)>, DomainError> {
        let (logical, role) = LogicalPath::classify(relative)?;

        if let LayerKind::Extension { framework } = self.kind {
            if MARKER_FILES.contains(&logical.as_str()) {
                return Ok(None);
            }
            let foreign = SolidityFramework::ALL
                .iter()
                .filter(|fw| Some(**fw) != framework)
                .any(|fw| logical.starts_with(&format!("packages/{fw}")));
            if foreign {
                return Ok(None);
            }
        }

        Ok(Some((logical, role)))
    }
}

/// Ordered layers for one run: base, then framework, then extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerStack {
    layers: Vec<Layer>,
}

impl LayerStack {
    /// Pick the ordered layer list for the given selections.
    pub fn resolve(
        templates_root: &Path,
        framework: Option<SolidityFramework>,
        extension_root: Option<&Path>,
    ) -> Self {
        let mut layers = vec![Layer::base(templates_root)];
        if let Some(fw) = framework {
            layers.push(Layer::framework(templates_root, fw));
        }
        if let Some(ext) = extension_root {
            layers.push(Layer::extension(ext, framework));
        }
        Self { layers }
    }

    /// Build from explicit layers. Callers are responsible for ordering.
    pub fn from_layers(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    /// Base and every framework layer: the core files an overlay may not shadow.
    pub fn core(templates_root: &Path) -> Self {
        let mut layers = vec![Layer::base(templates_root)];
        layers.extend(
            SolidityFramework::ALL
                .iter()
                .map(|fw| Layer::framework(templates_root, *fw)),
        );
        Self { layers }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn extension(&self) -> Option<&Layer> {
        self.layers.iter().find(|l| l.kind().is_extension())
    }

    pub fn framework(&self) -> Option<SolidityFramework> {
        self.layers.iter().find_map(|l| match l.kind() {
            LayerKind::Framework(fw) => Some(fw),
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
