//! `stratum capture`: turn a modified project into an extension overlay.

use std::path::Path;

use chrono::Local;
use serde_json::json;
use tracing::{info, instrument};

use stratum_adapters::{DiskLayerStore, GitCli, LocalFilesystem};
use stratum_core::{
    application::{CaptureService, ExplicitBaseline},
    domain::{CaptureReport, EXTENSION_DIR, RemovalKind, TemplateCatalog},
};

use crate::{
    cli::CaptureArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(project = %args.project_path.display()))]
pub fn execute(args: CaptureArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    if !args.project_path.join(".git").exists() {
        return Err(CliError::InvalidInput {
            message: format!(
                "'{}' is not the root of a git repository",
                args.project_path.display()
            ),
        });
    }
    let name = extension_name(&args.project_path, args.name.as_deref())?;
    let overlay_root = config.extensions.dir.join(&name);

    let templates_root = config.templates_dir(args.templates_dir.as_deref())?;
    let catalog = TemplateCatalog::scan(&DiskLayerStore::new(), &templates_root)?;

    let baseline = args.baseline.map(|commit| ExplicitBaseline {
        commit,
        framework: args.framework.and_then(|choice| choice.framework()),
    });
    let service = CaptureService::new(
        Box::new(GitCli::new()),
        Box::new(LocalFilesystem::new()),
        config.upstream(),
    );

    let spinner = output.spinner(if baseline.is_some() {
        "Collecting changes...".to_string()
    } else {
        format!("Comparing against {}...", config.upstream.repository)
    });
    let report = service.capture(&args.project_path, &overlay_root, &catalog, baseline);
    spinner.finish_and_clear();
    let report = report?;

    info!(extension = %name, copied = report.copied().count(), "Capture finished");
    print_report(&report, &name, &overlay_root, &output)
}

/// `--name`, or the project directory's own name.
fn extension_name(project: &Path, name: Option<&str>) -> CliResult<String> {
    let name = match name {
        Some(name) => name.to_string(),
        None => project
            .canonicalize()
            .ok()
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| CliError::InvalidInput {
                message: "cannot derive an extension name; pass --name".into(),
            })?,
    };
    if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
        return Err(CliError::InvalidInput {
            message: format!("'{name}' is not a usable extension name"),
        });
    }
    Ok(name)
}

fn print_report(
    report: &CaptureReport,
    name: &str,
    overlay_root: &Path,
    output: &OutputManager,
) -> CliResult<()> {
    let captured = report.copied().count();
    let advisories = report.advisories();

    if output.is_json() {
        output.json(&json!({
            "extension": name,
            "path": overlay_root.join(EXTENSION_DIR),
            "baseline": {
                "commit": report.markers.commit,
                "framework": report.markers.framework,
            },
            "copied": report.copied().map(|p| p.as_str()).collect::<Vec<_>>(),
            "deleted": report.markers.deleted.iter().map(|p| p.as_str()).collect::<Vec<_>>(),
            "advisories": advisories
                .iter()
                .map(|(path, message)| json!({ "path": path.as_str(), "message": message }))
                .collect::<Vec<_>>(),
        }))?;
        return Ok(());
    }

    output.header(&format!(
        "Baseline {} ({})",
        short(&report.markers.commit),
        report
            .markers
            .framework
            .map_or("unknown framework", |fw| fw.as_str())
    ))?;

    if report.outcomes.is_empty() && report.removals.is_empty() {
        output.info("No changes since the baseline; nothing was captured")?;
        return Ok(());
    }

    for (path, message) in &advisories {
        output.warning(&format!("{path}: {message}"))?;
    }
    for removal in &report.removals {
        let verb = match removal.kind {
            RemovalKind::Deleted => "deleted",
            RemovalKind::Renamed => "renamed away",
        };
        output.print(&format!("  - {} ({verb})", removal.path))?;
    }

    output.success(&format!(
        "Captured {captured} file(s) into {} at {}",
        overlay_root.join(EXTENSION_DIR).display(),
        Local::now().format("%Y-%m-%d %H:%M"),
    ))?;
    if !advisories.is_empty() {
        output.info(&format!(
            "{} change(s) were not captured; see the warnings above",
            advisories.len()
        ))?;
    }
    output.print(&format!("Try it: stratum new my-dapp -e {name} --dev"))?;
    Ok(())
}

fn short(commit: &str) -> &str {
    commit.get(..7).unwrap_or(commit)
}
