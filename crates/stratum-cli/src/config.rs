//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `STRATUM__SECTION__KEY`
//! 3. Config file (`--config`, or the platform config directory)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use stratum_adapters::builtin_templates::{discover_templates_dir, is_templates_root};
use stratum_core::{application::Upstream, domain::SolidityFramework};

use crate::error::{CliError, CliResult};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "STRATUM";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Templates root.
    pub templates: TemplatesConfig,
    /// Local extension overlays.
    pub extensions: ExtensionsConfig,
    /// Upstream repository used for baseline inference.
    pub upstream: UpstreamConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// Unset means "discover".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionsConfig {
    /// Dev overlays are read from here and captures are written here.
    pub dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub repository: String,
    pub remote_name: String,
    pub hardhat_branch: String,
    pub foundry_branch: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let upstream = Upstream::default();
        let branch = |framework: SolidityFramework| {
            upstream
                .branches
                .iter()
                .find(|(fw, _)| *fw == framework)
                .map(|(_, b)| b.clone())
                .unwrap_or_default()
        };
        Self {
            templates: TemplatesConfig::default(),
            extensions: ExtensionsConfig {
                dir: PathBuf::from("externalExtensions"),
            },
            upstream: UpstreamConfig {
                hardhat_branch: branch(SolidityFramework::Hardhat),
                foundry_branch: branch(SolidityFramework::Foundry),
                repository: upstream.repository,
                remote_name: upstream.remote,
            },
            output: OutputConfig {
                no_color: false,
                format: "human".into(),
            },
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the config file, then environment.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.to_path_buf(), true),
            None => (Self::config_path(), false),
        };
        debug!(path = %path.display(), required, "Loading configuration");

        let settings = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.stratum.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("org", "stratum", "stratum")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".stratum.toml"))
    }

    /// The upstream repository as the capture service expects it.
    pub fn upstream(&self) -> Upstream {
        Upstream {
            repository: self.upstream.repository.clone(),
            remote: self.upstream.remote_name.clone(),
            branches: vec![
                (SolidityFramework::Hardhat, self.upstream.hardhat_branch.clone()),
                (SolidityFramework::Foundry, self.upstream.foundry_branch.clone()),
            ],
        }
    }

    /// Pick the templates root: flag, then config, then discovery.
    pub fn templates_dir(&self, flag: Option<&Path>) -> CliResult<PathBuf> {
        if let Some(dir) = flag.map(Path::to_path_buf).or_else(|| self.templates.dir.clone()) {
            return if is_templates_root(&dir) {
                Ok(dir)
            } else {
                Err(CliError::TemplatesNotFound {
                    configured: Some(dir),
                })
            };
        }
        discover_templates_dir().ok_or(CliError::TemplatesNotFound { configured: None })
    }

    /// Look up a dotted key such as `upstream.repository`.
    pub fn get(&self, key: &str) -> CliResult<String> {
        let tree = serde_json::to_value(self).map_err(|e| CliError::ConfigError {
            message: format!("Failed to serialise config: {e}"),
            source: Some(Box::new(e)),
        })?;

        let unknown = || CliError::ConfigError {
            message: format!("Unknown config key: '{key}'"),
            source: None,
        };
        let value = key
            .split('.')
            .try_fold(&tree, |node, part| node.get(part))
            .ok_or_else(unknown)?;

        match value {
            serde_json::Value::String(s) => Ok(s.clone()),
            serde_json::Value::Bool(_) | serde_json::Value::Number(_) => Ok(value.to_string()),
            _ => Err(unknown()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_upstream() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.upstream(), Upstream::default());
        assert_eq!(cfg.extensions.dir, PathBuf::from("externalExtensions"));
        assert!(cfg.templates.dir.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("stratum.toml");
        fs::write(
            &path,
            "[extensions]\ndir = \"overlays\"\n\n[upstream]\nfoundry_branch = \"forge\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.extensions.dir, PathBuf::from("overlays"));
        assert_eq!(cfg.upstream.foundry_branch, "forge");
        assert_eq!(cfg.upstream.hardhat_branch, "main");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(AppConfig::load(Some(&temp.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn get_known_keys() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get("extensions.dir").unwrap(), "externalExtensions");
        assert_eq!(cfg.get("output.no_color").unwrap(), "false");
        assert_eq!(
            cfg.get("upstream.repository").unwrap(),
            "https://github.com/scaffold-eth/scaffold-eth-2"
        );
    }

    #[test]
    fn get_unknown_or_section_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(cfg.get("does.not.exist"), Err(CliError::ConfigError { .. })));
        assert!(matches!(cfg.get("upstream"), Err(CliError::ConfigError { .. })));
    }

    #[test]
    fn templates_flag_must_point_at_a_root() {
        let temp = TempDir::new().unwrap();
        let cfg = AppConfig::default();
        assert!(matches!(
            cfg.templates_dir(Some(temp.path())),
            Err(CliError::TemplatesNotFound { .. })
        ));

        fs::create_dir(temp.path().join("base")).unwrap();
        assert_eq!(cfg.templates_dir(Some(temp.path())).unwrap(), temp.path());
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
