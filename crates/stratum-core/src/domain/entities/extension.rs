//! Extension selectors, the curated catalogue, and trust classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{
    error::DomainError,
    value_objects::{SolidityFramework, Trust},
};

const GITHUB_PREFIX: &str = "https://github.com/";

/// Organizations whose repositories are trusted without curation.
pub const TRUSTED_ORGANIZATIONS: [&str; 2] = ["scaffold-eth", "buidlguidl"];

/// A GitHub repository plus optional branch, parsed from a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    owner: String,
    project: String,
    branch: Option<String>,
}

impl RepositoryRef {
    /// Parse `owner/project`, `owner/project:branch`, or a GitHub URL with an
    /// optional `/tree/<branch>` suffix.
    pub fn parse(selector: &str) -> Result<Self, DomainError> {
        let selector = selector.trim();
        let invalid = || DomainError::InvalidSelector {
            selector: selector.to_string(),
        };

        if let Some(rest) = selector.strip_prefix(GITHUB_PREFIX) {
            let parts: Vec<&str> = rest.trim_end_matches('/').split('/').collect();
            let owner = parts.first().copied().unwrap_or_default();
            let project = parts
                .get(1)
                .map(|p| p.trim_end_matches(".git"))
                .unwrap_or_default();
            if owner.is_empty() || project.is_empty() {
                return Err(invalid());
            }
            let branch = match (parts.get(2), parts.get(3)) {
                (Some(&"tree"), Some(branch)) if !branch.is_empty() => Some(branch.to_string()),
                _ => None,
            };
            return Ok(Self::new(owner, project, branch));
        }

        let (owner, rest) = selector.split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || rest.contains('/') {
            return Err(invalid());
        }
        let (project, branch) = match rest.split_once(':') {
            Some((project, branch)) => (project, Some(branch)),
            None => (rest, None),
        };
        if project.is_empty() || branch.is_some_and(str::is_empty) {
            return Err(invalid());
        }
        Ok(Self::new(owner, project, branch.map(String::from)))
    }

    pub fn new(
        owner: impl Into<String>,
        project: impl Into<String>,
        branch: Option<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            project: project.into(),
            branch,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// Clone URL without the branch.
    pub fn url(&self) -> String {
        format!("{GITHUB_PREFIX}{}/{}", self.owner, self.project)
    }

    /// Browser URL of the branch, or the repository when no branch is set.
    pub fn branch_url(&self) -> String {
        match &self.branch {
            Some(branch) => format!("{}/tree/{branch}", self.url()),
            None => self.url(),
        }
    }
}

impl fmt::Display for RepositoryRef {
    /// Shorthand form: `owner/project[:branch]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.project)?;
        if let Some(branch) = &self.branch {
            write!(f, ":{branch}")?;
        }
        Ok(())
    }
}

/// One curated extension manifest record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionDescriptor {
    pub extension_flag_value: String,
    pub repository: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ExtensionDescriptor {
    pub fn repository_ref(&self) -> Result<RepositoryRef, DomainError> {
        let parsed = RepositoryRef::parse(&self.repository)?;
        Ok(RepositoryRef::new(
            parsed.owner,
            parsed.project,
            self.branch.clone().or(parsed.branch),
        ))
    }

    /// Human-readable label: name, then branch, then flag value.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.branch.as_deref())
            .unwrap_or(&self.extension_flag_value)
    }
}

/// Curated extensions keyed by flag value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionCatalog {
    entries: Vec<ExtensionDescriptor>,
}

impl ExtensionCatalog {
    pub fn new(entries: Vec<ExtensionDescriptor>) -> Self {
        Self { entries }
    }

    pub fn find(&self, flag_value: &str) -> Option<&ExtensionDescriptor> {
        self.entries
            .iter()
            .find(|e| e.extension_flag_value == flag_value)
    }

    pub fn entries(&self) -> &[ExtensionDescriptor] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Trusted iff curated or owned by an allow-listed organization.
pub fn classify_trust(owner: &str, curated: bool) -> Trust {
    if curated {
        Trust::Curated
    } else if TRUSTED_ORGANIZATIONS
        .iter()
        .any(|org| org.eq_ignore_ascii_case(owner))
    {
        Trust::TrustedOrganization
    } else {
        Trust::Untrusted
    }
}

/// Framework for a run that includes an extension.
///
/// A recorded framework marker wins, then the only framework the extension
/// ships packages for, then the caller's choice.
pub fn choose_framework(
    requested: Option<SolidityFramework>,
    affinity: Option<SolidityFramework>,
    supported: &[SolidityFramework],
) -> Option<SolidityFramework> {
    if affinity.is_some() {
        return affinity;
    }
    if let [only] = supported {
        return Some(*only);
    }
    requested
}

/// Where an extension selector points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedExtension {
    /// A development overlay under the local extensions directory.
    Local { name: String },
    /// A remote repository to fetch.
    Remote {
        repository: RepositoryRef,
        trust: Trust,
    },
}

impl ResolvedExtension {
    pub fn trust(&self) -> Trust {
        match self {
            Self::Local { .. } => Trust::Local,
            Self::Remote { trust, .. } => *trust,
        }
    }

    /// Directory-friendly name for the resolved extension.
    pub fn name(&self) -> String {
        match self {
            Self::Local { name } => name.clone(),
            Self::Remote { repository, .. } => repository
                .branch()
                .unwrap_or(repository.project())
                .to_string(),
        }
    }
}

impl fmt::Display for ResolvedExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local { name } => write!(f, "{name} (local)"),
            Self::Remote { repository, .. } => write!(f, "{}", repository.branch_url()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_shorthand() {
        let r = RepositoryRef::parse("scaffold-eth/se-2-challenges").unwrap();
        assert_eq!(r.owner(), "scaffold-eth");
        assert_eq!(r.project(), "se-2-challenges");
        assert_eq!(r.branch(), None);
        assert_eq!(r.url(), "https://github.com/scaffold-eth/se-2-challenges");
    }

    #[test]
    fn parses_shorthand_with_branch() {
        let r = RepositoryRef::parse("owner/project:feature-x").unwrap();
        assert_eq!(r.branch(), Some("feature-x"));
        assert_eq!(r.branch_url(), "https://github.com/owner/project/tree/feature-x");
        assert_eq!(r.to_string(), "owner/project:feature-x");
    }

    #[test]
    fn parses_github_urls() {
        let r = RepositoryRef::parse("https://github.com/owner/project/tree/dev").unwrap();
        assert_eq!((r.owner(), r.project(), r.branch()), ("owner", "project", Some("dev")));

        let r = RepositoryRef::parse("https://github.com/owner/project").unwrap();
        assert_eq!(r.branch(), None);
    }

    #[test]
    fn rejects_malformed_selectors() {
        for bad in ["justaname", "a/b/c", "/project", "owner/", "owner/project:", "https://github.com/owner"] {
            assert!(
                matches!(RepositoryRef::parse(bad), Err(DomainError::InvalidSelector { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn invalid_selector_message_names_the_selector() {
        let err = RepositoryRef::parse("nope").unwrap_err();
        assert!(err.to_string().contains("'nope'"));
    }

    #[test]
    fn trust_classification() {
        assert_eq!(classify_trust("someone", true), Trust::Curated);
        assert_eq!(classify_trust("BuidlGuidl", false), Trust::TrustedOrganization);
        assert_eq!(classify_trust("someone", false), Trust::Untrusted);
        assert!(!Trust::Untrusted.is_trusted());
    }

    #[test]
    fn descriptor_branch_overrides_repository_url() {
        let d = ExtensionDescriptor {
            extension_flag_value: "challenge-dex".into(),
            repository: "https://github.com/scaffold-eth/se-2-challenges".into(),
            branch: Some("challenge-dex".into()),
            description: "Build a DEX.".into(),
            name: None,
        };
        let r = d.repository_ref().unwrap();
        assert_eq!(r.to_string(), "scaffold-eth/se-2-challenges:challenge-dex");
        assert_eq!(d.display_name(), "challenge-dex");
    }

    #[test]
    fn descriptor_serializes_with_manifest_field_names() {
        let d = ExtensionDescriptor {
            extension_flag_value: "subgraph".into(),
            repository: "https://github.com/scaffold-eth/create-eth-extensions".into(),
            branch: None,
            description: "Subgraph.".into(),
            name: Some("The Graph".into()),
        };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["extensionFlagValue"], "subgraph");
        assert!(json.get("branch").is_none());
    }

    #[test]
    fn framework_marker_overrides_request() {
        use SolidityFramework::*;
        assert_eq!(choose_framework(Some(Hardhat), Some(Foundry), &[]), Some(Foundry));
        assert_eq!(choose_framework(None, None, &[Foundry]), Some(Foundry));
        assert_eq!(
            choose_framework(Some(Hardhat), None, &[Hardhat, Foundry]),
            Some(Hardhat)
        );
        assert_eq!(choose_framework(None, None, &[]), None);
    }

    #[test]
    fn resolved_remote_name_prefers_branch() {
        let resolved = ResolvedExtension::Remote {
            repository: RepositoryRef::parse("owner/project:feature").unwrap(),
            trust: Trust::Untrusted,
        };
        assert_eq!(resolved.name(), "feature");
        assert_eq!(resolved.trust(), Trust::Untrusted);
    }
}
