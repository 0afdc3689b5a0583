use std::collections::HashSet;
use std::path::PathBuf;

use crate::domain::{entities::common::LogicalPath, error::DomainError, value_objects::LayerKind};

/// Composed output project, ready to be written.
///
/// This is the output of layer composition. It contains no business logic,
/// only data, in logical-path order.
#[derive(Debug, Clone)]
pub struct ProjectStructure {
    pub(crate) root: PathBuf,
    pub(crate) files: Vec<FileToWrite>,
    pub(crate) skipped: Vec<SkippedFile>,
    pub(crate) removed: Vec<LogicalPath>,
}

impl ProjectStructure {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: Vec::new(),
            skipped: Vec::new(),
            removed: Vec::new(),
        }
    }

    pub fn add_file(&mut self, path: LogicalPath, content: FileContent, origin: LayerKind) {
        self.files.push(FileToWrite {
            path,
            content,
            origin,
        });
    }

    pub fn with_file(mut self, path: LogicalPath, content: FileContent, origin: LayerKind) -> Self {
        self.add_file(path, content, origin);
        self
    }

    pub fn skip(&mut self, path: LogicalPath, reason: impl Into<String>) {
        self.skipped.push(SkippedFile {
            path,
            reason: reason.into(),
        });
    }

    /// Drop a composed file. Returns whether anything was removed.
    pub fn remove(&mut self, path: &LogicalPath) -> bool {
        let before = self.files.len();
        self.files.retain(|f| &f.path != path);
        let removed = before != self.files.len();
        if removed {
            self.removed.push(path.clone());
        }
        removed
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for file in &self.files {
            if !seen.insert(&file.path) {
                return Err(DomainError::InvalidTemplate {
                    path: file.path.to_string(),
                    reason: "composed twice".into(),
                });
            }
        }
        Ok(())
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    pub fn files(&self) -> impl Iterator<Item = &FileToWrite> {
        self.files.iter()
    }

    pub fn file(&self, path: &str) -> Option<&FileToWrite> {
        self.files.iter().find(|f| f.path.as_str() == path)
    }

    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }

    pub fn removed(&self) -> &[LogicalPath] {
        &self.removed
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Text produced by a slot template, or bytes copied from a layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Rendered(String),
    Static(Vec<u8>),
}

impl FileContent {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Rendered(text) => text.as_bytes(),
            Self::Static(bytes) => bytes,
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered(_))
    }
}

#[derive(Debug, Clone)]
pub struct FileToWrite {
    pub path: LogicalPath,
    pub content: FileContent,
    /// Layer that supplied the winning content.
    pub origin: LayerKind,
}

impl FileToWrite {
    pub fn is_empty(&self) -> bool {
        self.content.as_bytes().is_empty()
    }

    pub fn size(&self) -> usize {
        self.content.as_bytes().len()
    }
}

/// A contribution that composition refused to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: LogicalPath,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(p: &str) -> LogicalPath {
        LogicalPath::try_new(p).unwrap()
    }

    #[test]
    fn builds_and_removes_files() {
        let mut structure = ProjectStructure::new("/tmp/out")
            .with_file(path("README.md"), FileContent::Static(b"# hi".to_vec()), LayerKind::Base)
            .with_file(
                path(".gitignore"),
                FileContent::Rendered("node_modules\n".into()),
                LayerKind::Base,
            );

        assert_eq!(structure.file_count(), 2);
        assert!(structure.file(".gitignore").unwrap().content.is_rendered());
        assert!(structure.remove(&path("README.md")));
        assert!(!structure.remove(&path("README.md")));
        assert_eq!(structure.file_count(), 1);
        assert_eq!(structure.removed().len(), 1);
    }

    #[test]
    fn duplicate_paths_fail_validation() {
        let structure = ProjectStructure::new("/tmp/out")
            .with_file(path("a"), FileContent::Static(vec![]), LayerKind::Base)
            .with_file(path("a"), FileContent::Static(vec![]), LayerKind::Base);
        assert!(structure.validate().is_err());
    }
}
