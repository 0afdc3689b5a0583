//! Materialize Service - composes layers and writes the output project.
//!
//! This service coordinates one generation run:
//! 1. Walk every active layer and group files by logical path
//! 2. Render each parameterized path once, with every layer's arguments
//! 3. Resolve static files (later layers win, protected files excepted)
//! 4. Replay the extension's recorded deletions
//! 5. Write to filesystem
//!
//! Writes are independent per file. A failure part-way leaves the files
//! already written in place; there is no rollback.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, LayerSource},
    },
    domain::{
        generated_artifact, BaselineMarkerSet, FileContent, FileRole, Layer, LayerStack,
        LogicalPath, ProjectStructure, SkippedFile, SlotArgs, DELETED_FILES_LOG,
    },
    error::StratumResult,
};

/// Options for one materialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeOptions {
    /// Write into an existing output directory.
    pub allow_existing: bool,
    /// Compose but do not write.
    pub dry_run: bool,
}

/// What a materialization produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializeReport {
    pub written: Vec<LogicalPath>,
    pub skipped: Vec<SkippedFile>,
    /// Paths dropped because the extension recorded them as deleted.
    pub removed: Vec<LogicalPath>,
    pub dry_run: bool,
}

/// Layer composition and output writing.
pub struct MaterializeService {
    source: Box<dyn LayerSource>,
    filesystem: Box<dyn Filesystem>,
}

impl MaterializeService {
    /// Create a new materialize service with the given adapters.
    pub fn new(source: Box<dyn LayerSource>, filesystem: Box<dyn Filesystem>) -> Self {
        Self { source, filesystem }
    }

    /// Compose `stack` and write it under `output_root`.
    #[instrument(
        skip_all,
        fields(
            layers = stack.len(),
            output = %output_root.display(),
            dry_run = options.dry_run
        )
    )]
    pub fn materialize(
        &self,
        stack: &LayerStack,
        output_root: &Path,
        options: MaterializeOptions,
    ) -> StratumResult<MaterializeReport> {
        if !options.allow_existing && !options.dry_run && self.filesystem.exists(output_root) {
            return Err(ApplicationError::OutputExists {
                path: output_root.to_path_buf(),
            }
            .into());
        }

        let structure = self.compose(stack, output_root)?;
        info!(files = structure.file_count(), "Layers composed");

        if !options.dry_run {
            self.write_structure(&structure)?;
            info!("Materialization completed successfully");
        }

        Ok(MaterializeReport {
            written: structure.files().map(|f| f.path.clone()).collect(),
            skipped: structure.skipped().to_vec(),
            removed: structure.removed().to_vec(),
            dry_run: options.dry_run,
        })
    }

    /// Compose every layer into a project structure without writing anything.
    pub fn compose(&self, stack: &LayerStack, output_root: &Path) -> StratumResult<ProjectStructure> {
        let mut groups: BTreeMap<LogicalPath, Vec<(&Layer, FileRole)>> = BTreeMap::new();
        for layer in stack.layers() {
            let files = self.source.list_files(layer)?;
            debug!(layer = %layer.kind(), files = files.len(), "Walked layer");
            for file in files {
                groups
                    .entry(file.logical)
                    .or_default()
                    .push((layer, file.role));
            }
        }

        let mut structure = ProjectStructure::new(output_root);
        for (logical, entries) in &groups {
            self.compose_path(logical, entries, &mut structure)?;
        }

        if let Some(extension) = stack.extension() {
            let shipped: BTreeSet<&LogicalPath> = groups
                .iter()
                .filter(|(_, entries)| entries.iter().any(|(l, _)| l.kind().is_extension()))
                .map(|(logical, _)| logical)
                .collect();
            self.replay_deletions(extension, &shipped, &mut structure)?;
        }

        structure.validate()?;
        Ok(structure)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Resolve one logical path from its contributions, in layer order.
    fn compose_path(
        &self,
        logical: &LogicalPath,
        entries: &[(&Layer, FileRole)],
        structure: &mut ProjectStructure,
    ) -> StratumResult<()> {
        let of_role = |role: FileRole| -> Vec<&Layer> {
            entries
                .iter()
                .filter(|(_, r)| *r == role)
                .map(|(layer, _)| *layer)
                .collect()
        };
        let templates = of_role(FileRole::Template);
        let arguments = of_role(FileRole::Arguments);
        let statics = of_role(FileRole::Static);

        if let Some(template_layer) = templates.last() {
            if templates.len() > 1 {
                warn!(path = %logical, layer = %template_layer.kind(), "Several layers ship this template; using the last");
            }
            if !statics.is_empty() {
                warn!(path = %logical, "Static file shadowed by a template of the same path");
            }

            let template = self.source.load_template(template_layer, logical)?;
            let mut args = SlotArgs::new();
            for layer in &arguments {
                for (slot, value) in self.source.load_arguments(layer, logical)? {
                    args.contribute(slot, value);
                }
            }
            let text = template.with_defaults(logical).call(&args)?;
            debug!(path = %logical, contributors = arguments.len(), "Rendered template");
            structure.add_file(logical.clone(), FileContent::Rendered(text), template_layer.kind());
            return Ok(());
        }

        let mut winner: Option<&Layer> = None;
        for layer in statics {
            let shadows_core = winner.is_some();
            if shadows_core
                && layer.kind().is_extension()
                && generated_artifact(logical, shadows_core).is_some()
            {
                warn!(path = %logical, "Extension may not overwrite a generated file; skipping");
                structure.skip(logical.clone(), "extension may not overwrite generated files");
                continue;
            }
            if let Some(previous) = winner {
                debug!(path = %logical, from = %previous.kind(), to = %layer.kind(), "Static file replaced");
            }
            winner = Some(layer);
        }

        match winner {
            Some(layer) => {
                let bytes = self.source.read_static(layer, logical)?;
                structure.add_file(logical.clone(), FileContent::Static(bytes), layer.kind());
            }
            None => {
                warn!(path = %logical, "Arguments file has no template in any active layer; ignoring");
                structure.skip(logical.clone(), "arguments without a template");
            }
        }
        Ok(())
    }

    /// Drop paths the extension recorded as deleted, unless it ships them itself.
    fn replay_deletions(
        &self,
        extension: &Layer,
        shipped: &BTreeSet<&LogicalPath>,
        structure: &mut ProjectStructure,
    ) -> StratumResult<()> {
        let Some(log) = self.source.read_marker(extension, DELETED_FILES_LOG)? else {
            return Ok(());
        };
        for path in BaselineMarkerSet::parse_deleted(&log) {
            if shipped.contains(&path) {
                continue;
            }
            if structure.remove(&path) {
                debug!(path = %path, "Removed file deleted by extension");
            }
        }
        Ok(())
    }

    /// Write all files in the structure.
    fn write_structure(&self, structure: &ProjectStructure) -> StratumResult<()> {
        let root = structure.root();
        self.filesystem.create_dir_all(root)?;

        for file in structure.files() {
            let path = root.join(file.path.to_path_buf());
            if let Some(parent) = path.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.write_file(&path, file.content.as_bytes())?;
        }

        Ok(())
    }
}
