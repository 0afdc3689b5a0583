//! Migration check: compares an extension's arguments files with a newer
//! reference overlay and optionally rewrites them.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, info, instrument};

use crate::{
    application::ports::LayerSource,
    domain::{
        compare_args, fix_args, FileMigration, FileRole, FileStatus, Layer, LayerKind,
        LogicalPath, MigrationReport,
    },
    error::StratumResult,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationOptions {
    /// Rewrite arguments files with renamed and newly required slots.
    pub fix: bool,
    /// Report what `fix` would change without writing.
    pub dry_run: bool,
}

pub struct MigrationService {
    source: Box<dyn LayerSource>,
}

impl MigrationService {
    pub fn new(source: Box<dyn LayerSource>) -> Self {
        Self { source }
    }

    /// Compare every arguments file under `current` with its counterpart
    /// under `reference`. Both are overlay directories (the `extension/`
    /// trees themselves).
    #[instrument(
        skip_all,
        fields(current = %current.display(), reference = %reference.display(), fix = options.fix)
    )]
    pub fn check(
        &self,
        current: &Path,
        reference: &Path,
        options: MigrationOptions,
    ) -> StratumResult<MigrationReport> {
        // Whole trees: no framework filtering or marker exclusion.
        let current = Layer::new(current, LayerKind::Base);
        let reference = Layer::new(reference, LayerKind::Base);

        let current_args = self.arguments_files(&current)?;
        let reference_args = self.arguments_files(&reference)?;

        let mut report = MigrationReport::default();
        for path in current_args.union(&reference_args) {
            let migration = match (current_args.contains(path), reference_args.contains(path)) {
                (true, true) => self.compare_file(&current, &reference, path, options)?,
                (false, _) => {
                    let slots = self
                        .source
                        .load_arguments(&reference, path)?
                        .into_iter()
                        .map(|(slot, _)| slot)
                        .collect();
                    FileMigration {
                        path: path.clone(),
                        status: FileStatus::OnlyInReference { slots },
                        fixed: false,
                    }
                }
                (true, false) => FileMigration {
                    path: path.clone(),
                    status: FileStatus::OnlyInCurrent,
                    fixed: false,
                },
            };
            report.files.push(migration);
        }

        info!(
            files = report.files.len(),
            issues = report.issue_count(),
            fixed = report.fixed_count(),
            "Migration check completed"
        );
        Ok(report)
    }

    fn arguments_files(&self, layer: &Layer) -> StratumResult<BTreeSet<LogicalPath>> {
        Ok(self
            .source
            .list_files(layer)?
            .into_iter()
            .filter(|f| f.role == FileRole::Arguments)
            .map(|f| f.logical)
            .collect())
    }

    fn compare_file(
        &self,
        current: &Layer,
        reference: &Layer,
        path: &LogicalPath,
        options: MigrationOptions,
    ) -> StratumResult<FileMigration> {
        let current_args = self.source.load_arguments(current, path)?;
        let reference_args = self.source.load_arguments(reference, path)?;
        let comparison = compare_args(&current_args, &reference_args);

        let needs_fix = !(comparison.renamed.is_empty() && comparison.added.is_empty());
        let fixed = options.fix && needs_fix && !options.dry_run;
        if fixed {
            let rewritten = fix_args(&current_args, &reference_args, &comparison.renamed);
            self.source.write_arguments(current, path, &rewritten)?;
            debug!(path = %path, "Rewrote arguments file");
        } else if options.fix && needs_fix {
            debug!(path = %path, "Dry run: arguments file left unchanged");
        }

        Ok(FileMigration {
            path: path.clone(),
            status: FileStatus::Compared(comparison),
            fixed,
        })
    }
}
