use super::DomainError;
use crate::domain::value_objects::FileRole;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Suffix marking a parameterized template file.
pub const TEMPLATE_SUFFIX: &str = ".template.toml";

/// Suffix marking a layer's arguments file for a logical path.
pub const ARGUMENTS_SUFFIX: &str = ".args.toml";

/// The identity of one output file across every layer.
///
/// Invariant: relative, forward-slash separated, no `.`/`..` segments, and
/// never carries a template or arguments suffix. Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogicalPath(String);

impl LogicalPath {
    /// Fallible constructor.
    pub fn try_new(path: impl AsRef<str>) -> Result<Self, DomainError> {
        let raw = path.as_ref().replace('\\', "/");
        let as_path = Path::new(&raw);
        if as_path.is_absolute() || raw.starts_with('/') {
            return Err(DomainError::AbsolutePathNotAllowed { path: raw });
        }

        let mut segments = Vec::new();
        for component in as_path.components() {
            match component {
                Component::Normal(s) => segments.push(s.to_string_lossy().into_owned()),
                Component::CurDir => {}
                _ => return Err(DomainError::AbsolutePathNotAllowed { path: raw }),
            }
        }
        if segments.is_empty() {
            return Err(DomainError::InvalidTemplate {
                path: raw,
                reason: "empty path".into(),
            });
        }
        Ok(Self(segments.join("/")))
    }

    /// Split a layer-relative file path into its logical path and role.
    ///
    /// `a/b.ts.template.toml` → (`a/b.ts`, Template),
    /// `a/b.ts.args.toml` → (`a/b.ts`, Arguments), anything else is Static.
    pub fn classify(relative: impl AsRef<str>) -> Result<(Self, FileRole), DomainError> {
        let relative = relative.as_ref();
        if let Some(stripped) = relative.strip_suffix(TEMPLATE_SUFFIX) {
            return Ok((Self::try_new(stripped)?, FileRole::Template));
        }
        if let Some(stripped) = relative.strip_suffix(ARGUMENTS_SUFFIX) {
            return Ok((Self::try_new(stripped)?, FileRole::Arguments));
        }
        Ok((Self::try_new(relative)?, FileRole::Static))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Path of the companion arguments file, relative to a layer root.
    pub fn arguments_path(&self) -> String {
        format!("{}{ARGUMENTS_SUFFIX}", self.0)
    }

    /// Path of the parameterized template file, relative to a layer root.
    pub fn template_path(&self) -> String {
        format!("{}{TEMPLATE_SUFFIX}", self.0)
    }

    /// Whether this path lies at or below `prefix` (segment-wise).
    pub fn starts_with(&self, prefix: &str) -> bool {
        let prefix = prefix.trim_end_matches('/');
        self.0 == prefix || self.0.starts_with(&format!("{prefix}/"))
    }

    /// Native path relative to some root.
    pub fn to_path_buf(&self) -> PathBuf {
        self.0.split('/').collect()
    }
}

impl AsRef<str> for LogicalPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LogicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_strips_template_suffix() {
        let (path, role) = LogicalPath::classify("packages/nextjs/app/layout.tsx.template.toml").unwrap();
        assert_eq!(path.as_str(), "packages/nextjs/app/layout.tsx");
        assert_eq!(role, FileRole::Template);
    }

    #[test]
    fn classify_strips_arguments_suffix() {
        let (path, role) = LogicalPath::classify(".gitignore.args.toml").unwrap();
        assert_eq!(path.as_str(), ".gitignore");
        assert_eq!(role, FileRole::Arguments);
    }

    #[test]
    fn plain_toml_is_static() {
        let (path, role) = LogicalPath::classify("foundry.toml").unwrap();
        assert_eq!(path.as_str(), "foundry.toml");
        assert_eq!(role, FileRole::Static);
    }

    #[test]
    fn backslashes_and_dot_segments_are_normalized() {
        let path = LogicalPath::try_new(".\\packages\\nextjs\\.env").unwrap();
        assert_eq!(path.as_str(), "packages/nextjs/.env");
    }

    #[test]
    fn absolute_and_parent_paths_are_rejected() {
        assert!(matches!(
            LogicalPath::try_new("/etc/passwd"),
            Err(DomainError::AbsolutePathNotAllowed { .. })
        ));
        assert!(LogicalPath::try_new("../outside").is_err());
        assert!(LogicalPath::try_new("").is_err());
    }

    #[test]
    fn companion_paths() {
        let path = LogicalPath::try_new("README.md").unwrap();
        assert_eq!(path.arguments_path(), "README.md.args.toml");
        assert_eq!(path.template_path(), "README.md.template.toml");
        assert_eq!(path.file_name(), "README.md");
    }

    #[test]
    fn starts_with_is_segment_aware() {
        let path = LogicalPath::try_new("packages/hardhat/contracts/A.sol").unwrap();
        assert!(path.starts_with("packages/hardhat"));
        assert!(path.starts_with("packages/hardhat/"));
        assert!(!path.starts_with("packages/hard"));
    }
}
