//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use stratum_core::domain::SolidityFramework;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "stratum",
    bin_name = "stratum",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Layered dapp scaffolding",
    long_about = "Stratum composes a base monorepo, a solidity framework and an \
                  optional extension into a new project, and captures project \
                  changes back into reusable extensions.",
    after_help = "EXAMPLES:\n\
        \x20 stratum new my-dapp\n\
        \x20 stratum new my-dapp -s foundry -e subgraph\n\
        \x20 stratum capture ../my-dapp --name vault\n\
        \x20 stratum completions bash > /usr/share/bash-completion/completions/stratum",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new project from the layered templates.
    #[command(
        visible_alias = "n",
        about = "Create a new project",
        after_help = "EXAMPLES:\n\
            \x20 stratum new my-dapp\n\
            \x20 stratum new my-dapp --solidity-framework none\n\
            \x20 stratum new my-dapp -e scaffold-eth/create-eth-extensions:subgraph\n\
            \x20 stratum new my-dapp -e my-ext --dev"
    )]
    New(NewArgs),

    /// Capture a modified project as an extension overlay.
    #[command(
        about = "Capture project changes as an extension",
        after_help = "EXAMPLES:\n\
            \x20 stratum capture ../my-dapp\n\
            \x20 stratum capture ../my-dapp --name vault\n\
            \x20 stratum capture ../my-dapp --baseline 1a2b3c4 --framework foundry"
    )]
    Capture(CaptureArgs),

    /// Check an extension's arguments files against a newer reference.
    #[command(
        about = "Check an extension for slot drift",
        after_help = "EXAMPLES:\n\
            \x20 stratum migrate externalExtensions/vault --reference ../create-eth-extensions\n\
            \x20 stratum migrate externalExtensions/vault --reference ../ref --fix"
    )]
    Migrate(MigrateArgs),

    /// Inspect and export the curated extension catalogue.
    #[command(about = "Curated extension catalogue", subcommand)]
    Extensions(ExtensionsCommands),

    /// Initialise a Stratum configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 stratum init                    # default location\n\
            \x20 stratum --config ./stratum.toml init\n\
            \x20 stratum init --force            # overwrite"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 stratum completions bash > ~/.local/share/bash-completion/completions/stratum\n\
            \x20 stratum completions zsh  > ~/.zfunc/_stratum\n\
            \x20 stratum completions fish > ~/.config/fish/completions/stratum.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Stratum configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 stratum config get extensions.dir\n\
            \x20 stratum config list\n\
            \x20 stratum config path"
    )]
    Config(ConfigCommands),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `stratum new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project directory.  A plain name creates `./name`; a path like
    /// `../foo` places the project one level up.
    #[arg(value_name = "NAME", help = "Project name or path")]
    pub name: String,

    /// Solidity framework overlay.
    #[arg(
        short = 's',
        long = "solidity-framework",
        value_name = "FRAMEWORK",
        value_enum,
        help = "Solidity framework (default: hardhat)"
    )]
    pub solidity_framework: Option<FrameworkChoice>,

    /// Extension to apply on top of the framework.
    #[arg(
        short = 'e',
        long = "extension",
        value_name = "EXTENSION",
        help = "Curated name, owner/project[:branch] or GitHub URL"
    )]
    pub extension: Option<String>,

    /// Resolve the extension from the local extensions directory.
    #[arg(long = "dev", requires = "extension", help = "Use a local extension")]
    pub dev: bool,

    /// Override the templates root.
    #[arg(
        long = "templates-dir",
        value_name = "DIR",
        help = "Templates root (contains base/ and solidity-frameworks/)"
    )]
    pub templates_dir: Option<PathBuf>,

    /// Preview what would be created without writing any files.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,

    /// Overwrite an existing directory (destructive).
    #[arg(long = "force", help = "Overwrite existing directory")]
    pub force: bool,
}

/// `--solidity-framework` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FrameworkChoice {
    Hardhat,
    Foundry,
    /// Base layer only.
    None,
}

impl FrameworkChoice {
    pub fn framework(self) -> Option<SolidityFramework> {
        match self {
            Self::Hardhat => Some(SolidityFramework::Hardhat),
            Self::Foundry => Some(SolidityFramework::Foundry),
            Self::None => None,
        }
    }
}

// ── capture ───────────────────────────────────────────────────────────────────

/// Arguments for `stratum capture`.
#[derive(Debug, Args)]
pub struct CaptureArgs {
    /// Git repository of the modified project.
    #[arg(value_name = "PROJECT_PATH", help = "Project to capture")]
    pub project_path: PathBuf,

    /// Extension name (default: the project directory name).
    #[arg(long = "name", value_name = "NAME", help = "Extension name")]
    pub name: Option<String>,

    /// Skip upstream inference and diff against this commit.
    #[arg(
        long = "baseline",
        value_name = "COMMIT",
        help = "Baseline commit (skips upstream inference)"
    )]
    pub baseline: Option<String>,

    /// Framework recorded alongside an explicit baseline.
    #[arg(
        long = "framework",
        value_name = "FRAMEWORK",
        requires = "baseline",
        value_enum,
        help = "Framework of the baseline commit"
    )]
    pub framework: Option<FrameworkChoice>,

    /// Override the templates root.
    #[arg(long = "templates-dir", value_name = "DIR", help = "Templates root")]
    pub templates_dir: Option<PathBuf>,
}

// ── migrate ───────────────────────────────────────────────────────────────────

/// Arguments for `stratum migrate`.
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Extension to check (the directory or its `extension/` subdirectory).
    #[arg(value_name = "EXTENSION_PATH", help = "Extension to check")]
    pub extension_path: PathBuf,

    /// Newer extension to compare against.
    #[arg(
        short = 'r',
        long = "reference",
        value_name = "PATH",
        help = "Reference extension"
    )]
    pub reference: PathBuf,

    /// Rewrite arguments files with renamed and newly required slots.
    #[arg(long = "fix", help = "Rewrite arguments files")]
    pub fix: bool,

    /// Report what `--fix` would change without writing.
    #[arg(long = "dry-run", help = "Report only")]
    pub dry_run: bool,
}

// ── extensions ────────────────────────────────────────────────────────────────

/// Subcommands for `stratum extensions`.
#[derive(Debug, Subcommand)]
pub enum ExtensionsCommands {
    /// Print the curated extensions.
    #[command(visible_alias = "ls")]
    List {
        #[arg(
            long = "format",
            value_enum,
            default_value = "table",
            help = "Output format"
        )]
        format: ListFormat,
    },
    /// Write the curated catalogue as a JSON manifest.
    Export {
        /// Destination file (default: stdout).
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// Output format for `extensions list`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// JSON array.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `stratum init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `stratum completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `stratum config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `upstream.repository`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
