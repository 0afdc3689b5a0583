//! In-crate fakes for service tests.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::{
    application::{
        ApplicationError,
        ports::{Contributions, Filesystem, LayerFile, LayerSource, RepositoryHost},
    },
    domain::{ConfigValue, Layer, LogicalPath, ParameterizedTemplate},
    error::StratumResult,
};

#[derive(Debug, Clone)]
enum Entry {
    Template(ParameterizedTemplate),
    Arguments(Contributions),
    Bytes(Vec<u8>),
}

/// Layer trees keyed by root, then by layer-relative file path.
#[derive(Debug, Clone, Default)]
pub struct FakeLayers {
    trees: Arc<RwLock<BTreeMap<PathBuf, BTreeMap<String, Entry>>>>,
}

impl FakeLayers {
    pub fn new() -> Self {
        Self::default()
    }

    fn put(&self, root: &Path, relative: String, entry: Entry) {
        self.trees
            .write()
            .unwrap()
            .entry(root.to_path_buf())
            .or_default()
            .insert(relative, entry);
    }

    pub fn template(&self, root: &Path, logical: &str, template: ParameterizedTemplate) -> &Self {
        let logical = LogicalPath::try_new(logical).unwrap();
        self.put(root, logical.template_path(), Entry::Template(template));
        self
    }

    pub fn arguments(&self, root: &Path, logical: &str, args: &[(&str, ConfigValue)]) -> &Self {
        let logical = LogicalPath::try_new(logical).unwrap();
        let args = args.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        self.put(root, logical.arguments_path(), Entry::Arguments(args));
        self
    }

    pub fn file(&self, root: &Path, relative: &str, content: &str) -> &Self {
        self.put(root, relative.to_string(), Entry::Bytes(content.as_bytes().to_vec()));
        self
    }

    fn get(&self, layer: &Layer, relative: &str) -> Option<Entry> {
        self.trees
            .read()
            .unwrap()
            .get(layer.root())
            .and_then(|tree| tree.get(relative).cloned())
    }

    fn missing(layer: &Layer, relative: &str) -> ApplicationError {
        ApplicationError::FilesystemError {
            path: layer.root().join(relative),
            reason: "not found".into(),
        }
    }
}

impl LayerSource for FakeLayers {
    fn list_files(&self, layer: &Layer) -> StratumResult<Vec<LayerFile>> {
        let trees = self.trees.read().unwrap();
        let Some(tree) = trees.get(layer.root()) else {
            return Ok(Vec::new());
        };
        let mut files = Vec::new();
        for relative in tree.keys() {
            if let Some((logical, role)) = layer.admit(relative)? {
                files.push(LayerFile { logical, role });
            }
        }
        Ok(files)
    }

    fn load_template(
        &self,
        layer: &Layer,
        logical: &LogicalPath,
    ) -> StratumResult<ParameterizedTemplate> {
        match self.get(layer, &logical.template_path()) {
            Some(Entry::Template(t)) => Ok(t),
            _ => Err(Self::missing(layer, &logical.template_path()).into()),
        }
    }

    fn load_arguments(&self, layer: &Layer, logical: &LogicalPath) -> StratumResult<Contributions> {
        match self.get(layer, &logical.arguments_path()) {
            Some(Entry::Arguments(a)) => Ok(a),
            _ => Err(Self::missing(layer, &logical.arguments_path()).into()),
        }
    }

    fn write_arguments(
        &self,
        layer: &Layer,
        logical: &LogicalPath,
        contributions: &[(String, ConfigValue)],
    ) -> StratumResult<()> {
        self.put(
            layer.root(),
            logical.arguments_path(),
            Entry::Arguments(contributions.to_vec()),
        );
        Ok(())
    }

    fn read_static(&self, layer: &Layer, logical: &LogicalPath) -> StratumResult<Vec<u8>> {
        match self.get(layer, logical.as_str()) {
            Some(Entry::Bytes(b)) => Ok(b),
            _ => Err(Self::missing(layer, logical.as_str()).into()),
        }
    }

    fn read_marker(&self, layer: &Layer, name: &str) -> StratumResult<Option<String>> {
        Ok(match self.get(layer, name) {
            Some(Entry::Bytes(b)) => Some(String::from_utf8_lossy(&b).into_owned()),
            _ => None,
        })
    }
}

/// Flat in-memory filesystem recording every write.
#[derive(Debug, Clone, Default)]
pub struct FakeFs {
    files: Arc<RwLock<BTreeMap<PathBuf, Vec<u8>>>>,
    dirs: Arc<RwLock<BTreeSet<PathBuf>>>,
}

impl FakeFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl AsRef<Path>, content: &str) -> Self {
        self.files
            .write()
            .unwrap()
            .insert(path.as_ref().to_path_buf(), content.as_bytes().to_vec());
        self
    }

    pub fn read(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files
            .read()
            .unwrap()
            .get(path.as_ref())
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    pub fn file_count(&self) -> usize {
        self.files.read().unwrap().len()
    }

    /// Written paths relative to `root`, sorted.
    pub fn paths_under(&self, root: impl AsRef<Path>) -> Vec<String> {
        self.files
            .read()
            .unwrap()
            .keys()
            .filter_map(|p| p.strip_prefix(root.as_ref()).ok())
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .collect()
    }
}

impl Filesystem for FakeFs {
    fn create_dir_all(&self, path: &Path) -> StratumResult<()> {
        self.dirs.write().unwrap().insert(path.to_path_buf());
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> StratumResult<()> {
        self.files
            .write()
            .unwrap()
            .insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    fn copy_file(&self, from: &Path, to: &Path) -> StratumResult<()> {
        let content = self.files.read().unwrap().get(from).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: from.to_path_buf(),
                reason: "not found".into(),
            }
        })?;
        self.write_file(to, &content)
    }

    fn read_to_string(&self, path: &Path) -> StratumResult<String> {
        self.read(path).ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "not found".into(),
            }
            .into()
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.read().unwrap().keys().any(|p| p.starts_with(path))
            || self.dirs.read().unwrap().iter().any(|p| p.starts_with(path))
    }

    fn remove_dir_all(&self, path: &Path) -> StratumResult<()> {
        self.files.write().unwrap().retain(|p, _| !p.starts_with(path));
        self.dirs.write().unwrap().retain(|p| !p.starts_with(path));
        Ok(())
    }
}

/// Repository host that knows a fixed set of URLs and "clones" by
/// materializing files into a [`FakeFs`].
#[derive(Debug, Clone, Default)]
pub struct FakeHost {
    pub known: Vec<String>,
    pub clone_files: Vec<(String, String)>,
    pub fs: FakeFs,
}

impl RepositoryHost for FakeHost {
    fn exists(&self, url: &str, _branch: Option<&str>) -> StratumResult<bool> {
        Ok(self.known.iter().any(|k| k == url))
    }

    fn clone_into(&self, _url: &str, _branch: Option<&str>, dest: &Path) -> StratumResult<()> {
        for (relative, content) in &self.clone_files {
            self.fs.write_file(&dest.join(relative), content.as_bytes())?;
        }
        Ok(())
    }
}
