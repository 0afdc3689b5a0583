//! Layer store reading layer trees from disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};
use walkdir::WalkDir;

use stratum_core::{
    application::ports::{Contributions, LayerFile, LayerSource},
    domain::{ConfigValue, Layer, LogicalPath, ParameterizedTemplate},
    error::StratumResult,
};

use super::format::{parse_arguments, parse_template, render_arguments};
use crate::filesystem::map_io_error;

/// Directories never treated as layer content.
const IGNORED_DIRS: [&str; 2] = [".git", "node_modules"];

/// Reads layers straight from their directories.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskLayerStore;

impl DiskLayerStore {
    pub fn new() -> Self {
        Self
    }

    fn read_text(path: &Path) -> StratumResult<String> {
        fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn file_path(layer: &Layer, relative: &str) -> PathBuf {
        layer.root().join(relative)
    }
}

impl LayerSource for DiskLayerStore {
    #[instrument(skip_all, fields(root = %layer.root().display()))]
    fn list_files(&self, layer: &Layer) -> StratumResult<Vec<LayerFile>> {
        let root = layer.root();
        if !root.is_dir() {
            debug!("Layer root missing; contributes nothing");
            return Ok(Vec::new());
        }

        let walker = WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                !(e.file_type().is_dir()
                    && IGNORED_DIRS.iter().any(|d| e.file_name() == *d))
            });

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                map_io_error(&path, e.into(), "walk layer")
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(root)
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();
            if let Some((logical, role)) = layer.admit(&relative)? {
                files.push(LayerFile { logical, role });
            }
        }

        debug!(files = files.len(), "Walked layer");
        Ok(files)
    }

    fn load_template(
        &self,
        layer: &Layer,
        logical: &LogicalPath,
    ) -> StratumResult<ParameterizedTemplate> {
        let text = Self::read_text(&Self::file_path(layer, &logical.template_path()))?;
        Ok(parse_template(logical, &text)?)
    }

    fn load_arguments(&self, layer: &Layer, logical: &LogicalPath) -> StratumResult<Contributions> {
        let text = Self::read_text(&Self::file_path(layer, &logical.arguments_path()))?;
        Ok(parse_arguments(logical, &text)?)
    }

    fn write_arguments(
        &self,
        layer: &Layer,
        logical: &LogicalPath,
        contributions: &[(String, ConfigValue)],
    ) -> StratumResult<()> {
        let path = Self::file_path(layer, &logical.arguments_path());
        let text = render_arguments(logical, contributions)?;
        fs::write(&path, text).map_err(|e| map_io_error(&path, e, "write file"))
    }

    fn read_static(&self, layer: &Layer, logical: &LogicalPath) -> StratumResult<Vec<u8>> {
        let path = Self::file_path(layer, logical.as_str());
        fs::read(&path).map_err(|e| map_io_error(&path, e, "read file"))
    }

    fn read_marker(&self, layer: &Layer, name: &str) -> StratumResult<Option<String>> {
        let path = Self::file_path(layer, name);
        if !path.is_file() {
            return Ok(None);
        }
        Self::read_text(&path).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_core::domain::{FileRole, LayerKind, SolidityFramework};
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn lists_roles_in_sorted_order() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "b.txt", "b");
        write(root, "a/z.ts.template.toml", "body = \"\"");
        write(root, "a/z.ts.args.toml", "");
        write(root, ".git/HEAD", "ref");

        let layer = Layer::new(root, LayerKind::Base);
        let files = DiskLayerStore::new().list_files(&layer).unwrap();
        let listed: Vec<(&str, FileRole)> =
            files.iter().map(|f| (f.logical.as_str(), f.role)).collect();

        assert_eq!(
            listed,
            vec![
                ("a/z.ts", FileRole::Arguments),
                ("a/z.ts", FileRole::Template),
                ("b.txt", FileRole::Static),
            ]
        );
    }

    #[test]
    fn extension_layer_filters_markers_and_foreign_packages() {
        let temp = TempDir::new().unwrap();
        let ext = temp.path().join("extension");
        write(&ext, "commitHash.log", "abc");
        write(&ext, "packages/hardhat/contracts/A.sol", "");
        write(&ext, "packages/foundry/contracts/A.sol", "");
        write(&ext, "packages/nextjs/page.tsx", "");

        let layer = Layer::extension(temp.path(), Some(SolidityFramework::Foundry));
        let store = DiskLayerStore::new();
        let files = store.list_files(&layer).unwrap();
        let listed: Vec<&str> = files.iter().map(|f| f.logical.as_str()).collect();

        assert_eq!(listed, vec!["packages/foundry/contracts/A.sol", "packages/nextjs/page.tsx"]);
        assert_eq!(store.read_marker(&layer, "commitHash.log").unwrap().as_deref(), Some("abc"));
        assert_eq!(store.read_marker(&layer, "deletedFiles.log").unwrap(), None);
    }

    #[test]
    fn missing_root_is_empty() {
        let layer = Layer::new("/no/such/layer", LayerKind::Base);
        assert!(DiskLayerStore::new().list_files(&layer).unwrap().is_empty());
    }

    #[test]
    fn arguments_round_trip_through_disk() {
        let temp = TempDir::new().unwrap();
        let layer = Layer::new(temp.path(), LayerKind::Base);
        let logical = LogicalPath::try_new("README.md").unwrap();
        let store = DiskLayerStore::new();

        store
            .write_arguments(&layer, &logical, &[("extraContents".into(), ConfigValue::from("x"))])
            .unwrap();
        let args = store.load_arguments(&layer, &logical).unwrap();
        assert_eq!(args, vec![("extraContents".to_string(), ConfigValue::from("x"))]);
    }
}
