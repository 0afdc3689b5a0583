//! Domain value objects: SolidityFramework, LayerKind, FileRole, Trust.
//!
//! These are pure value types, `Copy` where possible, equality-by-value.
//! They define string representations and `FromStr` parsers; layer and
//! capture behavior lives in the entities that use them.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── SolidityFramework ────────────────────────────────────────────────────────

/// A solidity-framework overlay. At most one is active per generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolidityFramework {
    Hardhat,
    Foundry,
}

impl SolidityFramework {
    /// Every known framework, in the order they are probed and listed.
    pub const ALL: [SolidityFramework; 2] = [Self::Hardhat, Self::Foundry];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hardhat => "hardhat",
            Self::Foundry => "foundry",
        }
    }
}

impl fmt::Display for SolidityFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SolidityFramework {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hardhat" => Ok(Self::Hardhat),
            "foundry" => Ok(Self::Foundry),
            other => Err(DomainError::InvalidFramework {
                value: other.to_string(),
            }),
        }
    }
}

// ── LayerKind ────────────────────────────────────────────────────────────────

/// Which tier a layer occupies. Activation order is base, framework, extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Base,
    Framework(SolidityFramework),
    /// An extension overlay. The framework is the run's active choice; it
    /// selects which `packages/<framework>` subtree the overlay contributes.
    Extension {
        framework: Option<SolidityFramework>,
    },
}

impl LayerKind {
    pub const fn is_extension(&self) -> bool {
        matches!(self, Self::Extension { .. })
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => f.write_str("base"),
            Self::Framework(fw) => write!(f, "framework:{fw}"),
            Self::Extension { .. } => f.write_str("extension"),
        }
    }
}

// ── FileRole ─────────────────────────────────────────────────────────────────

/// How a file found under a layer root takes part in materialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileRole {
    /// `<logical>.template.toml`: rendered once per logical path.
    Template,
    /// `<logical>.args.toml`: one layer's slot contributions.
    Arguments,
    /// Anything else: copied verbatim.
    Static,
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template => f.write_str("template"),
            Self::Arguments => f.write_str("arguments"),
            Self::Static => f.write_str("static"),
        }
    }
}

// ── Trust ────────────────────────────────────────────────────────────────────

/// Trust classification of a resolved extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trust {
    /// Listed in the curated catalogue.
    Curated,
    /// Owned by an allow-listed organization.
    TrustedOrganization,
    /// Anything else. Callers must surface a warning.
    Untrusted,
    /// A local development directory.
    Local,
}

impl Trust {
    pub const fn is_trusted(&self) -> bool {
        !matches!(self, Self::Untrusted)
    }
}

impl fmt::Display for Trust {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Curated => f.write_str("curated"),
            Self::TrustedOrganization => f.write_str("trusted organization"),
            Self::Untrusted => f.write_str("untrusted"),
            Self::Local => f.write_str("local"),
        }
    }
}
