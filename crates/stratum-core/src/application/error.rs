//! Application layer errors.
//!
//! These errors represent failures in orchestration, not contract
//! violations. Contract violations are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// An external tool (git) exited non-zero or could not be started.
    #[error("{tool} failed running `{command}`: {reason}")]
    ExternalTool {
        tool: String,
        command: String,
        reason: String,
    },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A remote repository or branch does not exist.
    #[error("Repository not found: {url}")]
    RepositoryNotFound { url: String },

    /// Store access failed (lock poisoned, etc.).
    #[error("Layer store error")]
    StoreLockError,

    /// Validation failed (application-level, not domain).
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Output directory already exists.
    #[error("Output already exists at {path}")]
    OutputExists { path: PathBuf },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ExternalTool { tool, command, .. } => vec![
                format!("Command failed: {command}"),
                format!("Check that {tool} is installed and on PATH"),
                "Re-run once the underlying problem is fixed; nothing is retried automatically"
                    .into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::RepositoryNotFound { url } => vec![
                format!("Nothing found at {url}"),
                "Check the owner, project and branch spelling".into(),
                "Try: stratum extensions list to see curated extensions".into(),
            ],
            Self::StoreLockError => vec![
                "The layer store is locked".into(),
                "Try again in a moment".into(),
            ],
            Self::OutputExists { path } => vec![
                format!("Directory already exists: {}", path.display()),
                "Use --force to write into it anyway".into(),
                "Choose a different project name".into(),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ExternalTool { .. } => ErrorCategory::External,
            Self::FilesystemError { .. } | Self::StoreLockError => ErrorCategory::Internal,
            Self::RepositoryNotFound { .. } => ErrorCategory::NotFound,
            Self::ValidationFailed(_) | Self::OutputExists { .. } => ErrorCategory::Validation,
        }
    }
}
