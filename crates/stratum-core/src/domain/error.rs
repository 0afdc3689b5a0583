// ============================================================================
// domain/error.rs - CONTRACT VIOLATIONS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (they travel inside reports)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Template contract violations
    // ========================================================================
    #[error(
        "template '{template}' received unexpected slot '{slot}'; expecting only: {}",
        .accepted.join(", ")
    )]
    UnknownSlot {
        template: String,
        slot: String,
        accepted: Vec<String>,
    },

    #[error("Invalid template '{path}': {reason}")]
    InvalidTemplate { path: String, reason: String },

    #[error("Invalid arguments file '{path}': {reason}")]
    InvalidArguments { path: String, reason: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    // ========================================================================
    // Selection errors
    // ========================================================================
    #[error(
        "Invalid extension format '{selector}'. Use \"owner/project\", \"owner/project:branch\" or a GitHub URL"
    )]
    InvalidSelector { selector: String },

    #[error("Unknown solidity framework '{value}' (expected one of: hardhat, foundry)")]
    InvalidFramework { value: String },

    #[error("Extension '{name}' not found at {location}")]
    ExtensionNotFound { name: String, location: String },

    // ========================================================================
    // Baseline inference
    // ========================================================================
    #[error("No common history with {upstream}: the project shares no merge-base with any framework branch")]
    NoMergeBase { upstream: String },

    #[error("Baseline inference for '{branch}' needs a commit timestamp")]
    MissingTimestamp { branch: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownSlot {
                template, accepted, ..
            } => vec![
                format!("Arguments for '{template}' no longer match its slots"),
                format!("Accepted slots: {}", accepted.join(", ")),
                "Try: stratum migrate <extension> --reference <templates> to find renamed slots"
                    .into(),
            ],
            Self::InvalidSelector { selector } => vec![
                format!("Could not parse '{selector}'"),
                "Examples: scaffold-eth/se-2-challenges, owner/project:branch".into(),
                "Or: https://github.com/owner/project/tree/branch".into(),
                "Try: stratum extensions list for curated names".into(),
            ],
            Self::InvalidFramework { .. } => vec![
                "Supported frameworks:".into(),
                "  • hardhat".into(),
                "  • foundry".into(),
            ],
            Self::ExtensionNotFound { name, location } => vec![
                format!("No overlay directory '{name}' under {location}"),
                "Dev mode expects <extensions dir>/<name>/extension".into(),
                "Run without --dev to fetch a remote extension".into(),
            ],
            Self::NoMergeBase { upstream } => vec![
                format!("The project must be a clone of {upstream}"),
                "Or pass --baseline <commit> explicitly".into(),
            ],
            Self::InvalidTemplate { path, .. } | Self::InvalidArguments { path, .. } => vec![
                format!("Check the TOML syntax of {path}"),
                "Raw expressions are written as { \"$raw\" = \"expr\" }".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownSlot { .. }
            | Self::InvalidTemplate { .. }
            | Self::InvalidArguments { .. }
            | Self::AbsolutePathNotAllowed { .. }
            | Self::InvalidSelector { .. }
            | Self::InvalidFramework { .. }
            | Self::NoMergeBase { .. } => ErrorCategory::Validation,
            Self::ExtensionNotFound { .. } => ErrorCategory::NotFound,
            Self::MissingTimestamp { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
