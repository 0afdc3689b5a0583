//! Extension resolution: selector → local overlay or remote repository.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, RepositoryHost},
    },
    domain::{
        classify_trust, BaselineMarkerSet, DomainError, ExtensionCatalog, RepositoryRef,
        ResolvedExtension, SolidityFramework, EXTENSION_DIR, SOLIDITY_FRAMEWORK_LOG,
    },
    error::StratumResult,
};

/// Directory under the output root that receives a remote clone.
pub const CLONE_DIR: &str = "tmp-external-extension";

/// A resolved extension available on the local disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedExtension {
    /// Directory containing the `extension/` overlay.
    pub root: PathBuf,
    /// Whether `root` was cloned for this run and must be cleaned up.
    pub temporary: bool,
}

pub struct ExtensionResolver {
    catalog: ExtensionCatalog,
    host: Box<dyn RepositoryHost>,
    filesystem: Box<dyn Filesystem>,
    extensions_dir: PathBuf,
}

impl ExtensionResolver {
    pub fn new(
        catalog: ExtensionCatalog,
        host: Box<dyn RepositoryHost>,
        filesystem: Box<dyn Filesystem>,
        extensions_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            catalog,
            host,
            filesystem,
            extensions_dir: extensions_dir.into(),
        }
    }

    pub fn catalog(&self) -> &ExtensionCatalog {
        &self.catalog
    }

    /// Resolve a selector.
    ///
    /// In dev mode the selector names a directory under the local extensions
    /// directory. Otherwise curated flag values are tried first, then
    /// `owner/project[:branch]` and GitHub URLs. Untrusted results are
    /// returned with a warning, never refused.
    #[instrument(skip(self))]
    pub fn resolve(&self, selector: &str, dev: bool) -> StratumResult<ResolvedExtension> {
        if dev {
            let local = self.extensions_dir.join(selector);
            if !self.filesystem.exists(&local) {
                return Err(DomainError::ExtensionNotFound {
                    name: selector.to_string(),
                    location: self.extensions_dir.display().to_string(),
                }
                .into());
            }
            debug!(path = %local.display(), "Resolved local extension");
            return Ok(ResolvedExtension::Local {
                name: selector.to_string(),
            });
        }

        let (repository, curated) = match self.catalog.find(selector) {
            Some(descriptor) => (descriptor.repository_ref()?, true),
            None => (RepositoryRef::parse(selector)?, false),
        };
        let trust = classify_trust(repository.owner(), curated);

        if !self.host.exists(&repository.url(), repository.branch())? {
            return Err(ApplicationError::RepositoryNotFound {
                url: repository.branch_url(),
            }
            .into());
        }

        if trust.is_trusted() {
            info!(repository = %repository, %trust, "Resolved extension");
        } else {
            warn!(
                repository = %repository,
                "Extension is not curated and not from a trusted organization; review it before use"
            );
        }
        Ok(ResolvedExtension::Remote { repository, trust })
    }

    /// Make the extension available on disk. Remote extensions are cloned
    /// into `<output_root>/tmp-external-extension`.
    #[instrument(skip(self), fields(extension = %resolved))]
    pub fn fetch(
        &self,
        resolved: &ResolvedExtension,
        output_root: &Path,
    ) -> StratumResult<FetchedExtension> {
        match resolved {
            ResolvedExtension::Local { name } => Ok(FetchedExtension {
                root: self.extensions_dir.join(name),
                temporary: false,
            }),
            ResolvedExtension::Remote { repository, .. } => {
                let dest = output_root.join(CLONE_DIR);
                if self.filesystem.exists(&dest) {
                    self.filesystem.remove_dir_all(&dest)?;
                }
                self.host
                    .clone_into(&repository.url(), repository.branch(), &dest)?;
                debug!(dest = %dest.display(), "Cloned extension");
                Ok(FetchedExtension {
                    root: dest,
                    temporary: true,
                })
            }
        }
    }

    /// Remove a temporary clone. Local extensions are left alone.
    pub fn cleanup(&self, fetched: &FetchedExtension) -> StratumResult<()> {
        if fetched.temporary && self.filesystem.exists(&fetched.root) {
            self.filesystem.remove_dir_all(&fetched.root)?;
        }
        Ok(())
    }

    /// The framework recorded in the extension's marker, if readable.
    pub fn framework_affinity(&self, extension_root: &Path) -> Option<SolidityFramework> {
        let marker = extension_root
            .join(EXTENSION_DIR)
            .join(SOLIDITY_FRAMEWORK_LOG);
        if !self.filesystem.exists(&marker) {
            return None;
        }
        match self.filesystem.read_to_string(&marker) {
            Ok(text) => {
                let framework = BaselineMarkerSet::parse_framework(&text);
                if framework.is_none() {
                    debug!(marker = %marker.display(), "Ignoring unrecognized framework marker");
                }
                framework
            }
            Err(e) => {
                debug!(marker = %marker.display(), error = %e, "Framework marker unreadable");
                None
            }
        }
    }

    /// Frameworks the extension ships a `packages/<framework>` tree for.
    pub fn supported_frameworks(&self, extension_root: &Path) -> Vec<SolidityFramework> {
        let packages = extension_root.join(EXTENSION_DIR).join("packages");
        SolidityFramework::ALL
            .into_iter()
            .filter(|fw| self.filesystem.exists(&packages.join(fw.as_str())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing::{FakeFs, FakeHost};
    use crate::domain::{ExtensionDescriptor, Trust};
    use crate::error::StratumError;

    fn curated() -> ExtensionCatalog {
        ExtensionCatalog::new(vec![ExtensionDescriptor {
            extension_flag_value: "subgraph".into(),
            repository: "https://github.com/scaffold-eth/create-eth-extensions".into(),
            branch: Some("subgraph".into()),
            description: "The Graph integration.".into(),
            name: None,
        }])
    }

    fn resolver(host: FakeHost, fs: FakeFs) -> ExtensionResolver {
        ExtensionResolver::new(curated(), Box::new(host), Box::new(fs), "/work/externalExtensions")
    }

    #[test]
    fn curated_flag_resolves_to_manifest_entry() {
        let host = FakeHost {
            known: vec!["https://github.com/scaffold-eth/create-eth-extensions".into()],
            ..Default::default()
        };
        let resolved = resolver(host, FakeFs::new()).resolve("subgraph", false).unwrap();

        match resolved {
            ResolvedExtension::Remote { repository, trust } => {
                assert_eq!(repository.branch(), Some("subgraph"));
                assert_eq!(trust, Trust::Curated);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn untrusted_selector_still_resolves() {
        let host = FakeHost {
            known: vec!["https://github.com/someone/cool-ext".into()],
            ..Default::default()
        };
        let resolved = resolver(host, FakeFs::new())
            .resolve("someone/cool-ext:main", false)
            .unwrap();
        assert_eq!(resolved.trust(), Trust::Untrusted);
        assert_eq!(resolved.name(), "main");
    }

    #[test]
    fn missing_repository_names_the_branch_url() {
        let err = resolver(FakeHost::default(), FakeFs::new())
            .resolve("someone/ghost:dev", false)
            .unwrap_err();
        match err {
            StratumError::Application(ApplicationError::RepositoryNotFound { url }) => {
                assert_eq!(url, "https://github.com/someone/ghost/tree/dev");
            }
            other => panic!("unexpected: {other}"),
        }
    }

    #[test]
    fn malformed_selector_is_rejected() {
        let err = resolver(FakeHost::default(), FakeFs::new())
            .resolve("not a selector", false)
            .unwrap_err();
        assert!(matches!(
            err,
            StratumError::Domain(DomainError::InvalidSelector { .. })
        ));
    }

    #[test]
    fn dev_mode_checks_local_directory() {
        let fs = FakeFs::new().with_file("/work/externalExtensions/my-ext/extension/README.md", "x");
        let resolver = resolver(FakeHost::default(), fs);

        assert_eq!(
            resolver.resolve("my-ext", true).unwrap(),
            ResolvedExtension::Local {
                name: "my-ext".into()
            }
        );
        assert!(matches!(
            resolver.resolve("missing", true),
            Err(StratumError::Domain(DomainError::ExtensionNotFound { .. }))
        ));
    }

    #[test]
    fn remote_fetch_clones_into_output_and_cleans_up() {
        let fs = FakeFs::new();
        let host = FakeHost {
            known: vec![],
            clone_files: vec![(
                "extension/solidityFramework.log".into(),
                "foundry\n".into(),
            )],
            fs: fs.clone(),
        };
        let resolver = resolver(host, fs.clone());
        let resolved = ResolvedExtension::Remote {
            repository: RepositoryRef::parse("owner/project").unwrap(),
            trust: Trust::Untrusted,
        };

        let fetched = resolver.fetch(&resolved, Path::new("/out/app")).unwrap();
        assert_eq!(fetched.root, PathBuf::from("/out/app/tmp-external-extension"));
        assert!(fetched.temporary);
        assert_eq!(
            resolver.framework_affinity(&fetched.root),
            Some(SolidityFramework::Foundry)
        );

        resolver.cleanup(&fetched).unwrap();
        assert_eq!(fs.file_count(), 0);
    }

    #[test]
    fn supported_frameworks_follow_package_dirs() {
        let fs = FakeFs::new()
            .with_file("/ext/x/extension/packages/hardhat/contracts/A.sol", "")
            .with_file("/ext/x/extension/packages/nextjs/page.tsx", "");
        let resolver = resolver(FakeHost::default(), fs);

        assert_eq!(
            resolver.supported_frameworks(Path::new("/ext/x")),
            vec![SolidityFramework::Hardhat]
        );
        assert_eq!(resolver.framework_affinity(Path::new("/ext/x")), None);
    }
}
