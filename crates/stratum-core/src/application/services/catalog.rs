//! Template catalog initialization.

use std::path::Path;

use tracing::{debug, instrument};

use crate::{
    application::ports::LayerSource,
    domain::{LayerStack, TemplateCatalog},
    error::StratumResult,
};

impl TemplateCatalog {
    /// Scan the base layer and every framework layer under `templates_root`.
    ///
    /// Called once by the composition root; the result is passed to capture.
    #[instrument(skip_all, fields(templates_root = %templates_root.display()))]
    pub fn scan(source: &dyn LayerSource, templates_root: &Path) -> StratumResult<Self> {
        let mut catalog = Self::new();
        for layer in LayerStack::core(templates_root).layers() {
            let files = source.list_files(layer)?;
            debug!(layer = %layer.kind(), files = files.len(), "Scanned layer");
            for file in files {
                catalog.record(file.logical, file.role);
            }
        }
        Ok(catalog)
    }
}
