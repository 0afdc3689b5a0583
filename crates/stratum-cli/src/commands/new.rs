//! Implementation of the `stratum new` command.
//!
//! Responsibility: translate CLI arguments into a layer stack, call the core
//! services, and display results. No composition logic lives here.

use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::TempDir;
use tracing::{debug, info, instrument, warn};

use stratum_adapters::{DiskLayerStore, GitRepositoryHost, LocalFilesystem, curated_catalog};
use stratum_core::{
    application::{
        ExtensionResolver, FetchedExtension, MaterializeOptions, MaterializeReport,
        MaterializeService,
    },
    domain::{LayerStack, SolidityFramework, choose_framework},
};

use crate::{
    cli::{NewArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Execute the `stratum new` command.
///
/// Dispatch sequence:
/// 1. Validate the project name and check the output directory
/// 2. Resolve the templates root
/// 3. Resolve and fetch the extension, if any
/// 4. Settle the framework (extension markers can force one)
/// 5. Materialize base, framework and extension layers
/// 6. Remove the temporary extension clone and report
#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: NewArgs,
    global: &GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Resolve project path
    let (project_name, project_path) = resolve_project_path(&args.name)?;
    validate_project_name(&project_name)?;

    if project_path.exists() && !args.dry_run {
        if !args.force {
            return Err(CliError::ProjectExists { path: project_path });
        }
        warn!(path = %project_path.display(), "Removing existing directory (--force)");
        std::fs::remove_dir_all(&project_path).with_cli_context(|| {
            format!("Failed to remove '{}'", project_path.display())
        })?;
    }

    // 2. Templates
    let templates_root = config.templates_dir(args.templates_dir.as_deref())?;
    debug!(templates = %templates_root.display(), "Templates root resolved");

    // 3. Extension
    let requested = args
        .solidity_framework
        .map_or(Some(SolidityFramework::Hardhat), |choice| choice.framework());

    let resolver = ExtensionResolver::new(
        curated_catalog(),
        Box::new(GitRepositoryHost::new()),
        Box::new(LocalFilesystem::new()),
        config.extensions.dir.clone(),
    );
    // Held until the end of the command; dropping it removes the scratch root.
    let mut scratch = None;
    let fetched = match &args.extension {
        Some(selector) => {
            let root = clone_root(&project_path, args.dry_run, &mut scratch)?;
            Some(fetch_extension(&resolver, selector, args.dev, &root, &output)?)
        }
        None => None,
    };

    // 4. Framework
    let framework = match &fetched {
        Some(ext) => {
            let chosen = choose_framework(
                requested,
                resolver.framework_affinity(&ext.root),
                &resolver.supported_frameworks(&ext.root),
            );
            if chosen != requested && args.solidity_framework.is_some() {
                output.warning(&format!(
                    "The extension requires {}; ignoring --solidity-framework",
                    describe(chosen)
                ))?;
            }
            chosen
        }
        None => requested,
    };

    // 5. Materialize
    let stack = LayerStack::resolve(
        &templates_root,
        framework,
        fetched.as_ref().map(|ext| ext.root.as_path()),
    );
    let service = MaterializeService::new(
        Box::new(DiskLayerStore::new()),
        Box::new(LocalFilesystem::new()),
    );

    info!(project = %project_name, framework = describe(framework), "Materialize started");
    let spinner = output.spinner(format!("Creating '{project_name}'..."));
    let result = service.materialize(
        &stack,
        &project_path,
        MaterializeOptions {
            // The directory may hold the extension clone.
            allow_existing: true,
            dry_run: args.dry_run,
        },
    );
    spinner.finish_and_clear();

    // 6. Cleanup runs even when materialization failed.
    if let Some(ext) = &fetched {
        if let Err(e) = resolver.cleanup(ext) {
            warn!(error = %e, path = %ext.root.display(), "Failed to remove extension clone");
        }
    }
    let report = result?;
    info!(project = %project_name, files = report.written.len(), "Materialize completed");

    print_report(&report, &project_name, &project_path, framework, global, &output)
}

// ── Path resolution ───────────────────────────────────────────────────────────

/// `(leaf name, full project path)` for a name or path argument.
pub fn resolve_project_path(name: &str) -> CliResult<(String, PathBuf)> {
    let path = Path::new(name);

    let project_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CliError::InvalidProjectName {
            name: name.into(),
            reason: "cannot extract valid project name".into(),
        })?
        .to_string();

    Ok((project_name, path.to_path_buf()))
}

fn validate_project_name(name: &str) -> CliResult<()> {
    if name.is_empty() {
        return Err(CliError::InvalidProjectName {
            name: name.into(),
            reason: "name cannot be empty".into(),
        });
    }
    if name.starts_with('.') {
        return Err(CliError::InvalidProjectName {
            name: name.into(),
            reason: "name cannot start with '.'".into(),
        });
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(CliError::InvalidProjectName {
            name: name.into(),
            reason: "use letters, digits, '-', '_' and '.' only".into(),
        });
    }
    Ok(())
}

// ── Extension handling ────────────────────────────────────────────────────────

/// Remote clones land inside the project directory, or in a scratch
/// directory when nothing may be written there. The scratch directory lives
/// in `scratch` and is deleted with everything under it when that drops.
fn clone_root(
    project_path: &Path,
    dry_run: bool,
    scratch: &mut Option<TempDir>,
) -> CliResult<PathBuf> {
    if !dry_run {
        return Ok(project_path.to_path_buf());
    }
    let dir = tempfile::Builder::new()
        .prefix("stratum-")
        .tempdir()
        .with_cli_context(|| "Failed to create a scratch directory for the dry run")?;
    let root = dir.path().to_path_buf();
    *scratch = Some(dir);
    Ok(root)
}

fn fetch_extension(
    resolver: &ExtensionResolver,
    selector: &str,
    dev: bool,
    clone_root: &Path,
    output: &OutputManager,
) -> CliResult<FetchedExtension> {
    let spinner = output.spinner(format!("Resolving extension '{selector}'..."));
    let resolved = resolver.resolve(selector, dev);
    spinner.finish_and_clear();
    let resolved = resolved?;

    if !resolved.trust().is_trusted() {
        output.warning(&format!(
            "'{resolved}' is not a curated extension and not from a trusted \
             organization. Review its contents before running it."
        ))?;
    }

    let spinner = output.spinner(format!("Fetching '{resolved}'..."));
    let fetched = resolver.fetch(&resolved, clone_root);
    spinner.finish_and_clear();
    Ok(fetched?)
}

fn describe(framework: Option<SolidityFramework>) -> &'static str {
    framework.map_or("no framework", |fw| fw.as_str())
}

// ── Reporting ─────────────────────────────────────────────────────────────────

fn print_report(
    report: &MaterializeReport,
    project_name: &str,
    project_path: &Path,
    framework: Option<SolidityFramework>,
    global: &GlobalArgs,
    output: &OutputManager,
) -> CliResult<()> {
    if output.is_json() {
        output.json(&json!({
            "project": project_name,
            "path": project_path,
            "framework": framework,
            "dryRun": report.dry_run,
            "written": report.written.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
            "removed": report.removed.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
            "skipped": report
                .skipped
                .iter()
                .map(|s| json!({ "path": s.path.as_str(), "reason": s.reason }))
                .collect::<Vec<_>>(),
        }))?;
        return Ok(());
    }

    for skipped in &report.skipped {
        output.warning(&format!("Skipped {}: {}", skipped.path, skipped.reason))?;
    }

    if report.dry_run {
        output.info(&format!(
            "Dry run: would create '{}' at {} ({}, {} files)",
            project_name,
            project_path.display(),
            describe(framework),
            report.written.len(),
        ))?;
        for path in &report.written {
            output.print(&format!("  {path}"))?;
        }
        for path in &report.removed {
            output.print(&format!("  - {path} (removed by extension)"))?;
        }
        return Ok(());
    }

    output.success(&format!(
        "Project '{project_name}' created with {} files",
        report.written.len()
    ))?;

    if global.verbose > 0 {
        for path in &report.removed {
            output.info(&format!("Removed by extension: {path}"))?;
        }
    }

    if !output.is_quiet() {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", project_path.display()))?;
        output.print("  yarn install")?;
        if framework.is_some() {
            output.print("  yarn chain      # local network")?;
            output.print("  yarn deploy     # deploy contracts")?;
        }
        output.print("  yarn start      # frontend")?;
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
