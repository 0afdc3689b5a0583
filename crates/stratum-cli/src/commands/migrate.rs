//! `stratum migrate`: report slot drift between an extension and a newer
//! reference, optionally fixing it.

use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tracing::instrument;

use stratum_adapters::DiskLayerStore;
use stratum_core::{
    application::{MigrationOptions, MigrationService},
    domain::{EXTENSION_DIR, FileMigration, FileStatus, MigrationReport},
};

use crate::{
    cli::MigrateArgs,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(extension = %args.extension_path.display()))]
pub fn execute(args: MigrateArgs, output: OutputManager) -> CliResult<()> {
    let current = overlay_dir(&args.extension_path)?;
    let reference = overlay_dir(&args.reference)?;

    let service = MigrationService::new(Box::new(DiskLayerStore::new()));
    let report = service.check(
        &current,
        &reference,
        MigrationOptions {
            fix: args.fix,
            dry_run: args.dry_run,
        },
    )?;

    if output.is_json() {
        output.json(&report_json(&report))?;
        return Ok(());
    }
    print_report(&report, &args, &output)
}

/// Accept either an extension directory or its `extension/` overlay.
fn overlay_dir(path: &Path) -> CliResult<PathBuf> {
    if !path.is_dir() {
        return Err(CliError::InvalidInput {
            message: format!("'{}' is not a directory", path.display()),
        });
    }
    let nested = path.join(EXTENSION_DIR);
    Ok(if nested.is_dir() { nested } else { path.to_path_buf() })
}

fn print_report(
    report: &MigrationReport,
    args: &MigrateArgs,
    output: &OutputManager,
) -> CliResult<()> {
    output.header(&format!(
        "Checked {} arguments file(s) against {}",
        report.files.len(),
        args.reference.display()
    ))?;

    for file in report.files.iter().filter(|f| f.status.has_issues()) {
        print_file(file, output)?;
    }

    let issues = report.issue_count();
    if issues == 0 {
        output.success("Extension is up to date")?;
    } else if report.fixed_count() > 0 {
        output.success(&format!(
            "Rewrote {} of {issues} file(s) with issues",
            report.fixed_count()
        ))?;
    } else if args.fix && args.dry_run {
        output.info(&format!("Dry run: {issues} file(s) with issues, nothing written"))?;
    } else {
        output.warning(&format!("{issues} file(s) need attention"))?;
        if !args.fix {
            output.info("Re-run with --fix to apply renames and add new slots")?;
        }
    }
    Ok(())
}

fn print_file(file: &FileMigration, output: &OutputManager) -> CliResult<()> {
    let marker = if file.fixed { " (fixed)" } else { "" };
    output.print(&format!("{}{marker}", file.path))?;
    match &file.status {
        FileStatus::OnlyInReference { slots } => {
            output.print("  missing from the extension")?;
            if !slots.is_empty() {
                output.print(&format!("  reference slots: {}", slots.join(", ")))?;
            }
        }
        FileStatus::OnlyInCurrent => {
            output.print("  not present in the reference")?;
        }
        FileStatus::Compared(comparison) => {
            for rename in &comparison.renamed {
                output.print(&format!("  renamed: {} -> {}", rename.old, rename.new))?;
            }
            for slot in &comparison.added {
                output.print(&format!("  new slot: {slot}"))?;
            }
            for slot in &comparison.removed {
                output.print(&format!("  unknown slot: {slot}"))?;
            }
            for difference in &comparison.different {
                output.print(&format!("  value differs: {}", difference.slot))?;
            }
        }
    }
    Ok(())
}

fn report_json(report: &MigrationReport) -> Value {
    let files: Vec<Value> = report
        .files
        .iter()
        .map(|file| {
            let status = match &file.status {
                FileStatus::OnlyInReference { slots } => {
                    json!({ "kind": "only-in-reference", "slots": slots })
                }
                FileStatus::OnlyInCurrent => json!({ "kind": "only-in-extension" }),
                FileStatus::Compared(c) => json!({
                    "kind": "compared",
                    "renamed": c
                        .renamed
                        .iter()
                        .map(|r| json!({ "old": r.old, "new": r.new }))
                        .collect::<Vec<_>>(),
                    "added": c.added,
                    "removed": c.removed,
                    "different": c.different.iter().map(|d| d.slot.as_str()).collect::<Vec<_>>(),
                }),
            };
            json!({ "path": file.path.as_str(), "fixed": file.fixed, "status": status })
        })
        .collect();
    json!({
        "issues": report.issue_count(),
        "fixed": report.fixed_count(),
        "files": files,
    })
}
