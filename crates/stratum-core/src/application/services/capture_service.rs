//! Capture Service - turns a modified project into an extension overlay.
//!
//! This service coordinates one capture:
//! 1. Establish the baseline (explicit, or inferred from upstream branches)
//! 2. Enumerate changed and removed files since the baseline
//! 3. Classify every changed file
//! 4. Copy novel additions and write the baseline markers
//!
//! Every git query runs before the first write, so a failing query leaves
//! no partial overlay behind.

use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, VersionControl},
    },
    domain::{
        classify_change, exact_match, infer_baseline, BaselineInference, BaselineMarkerSet,
        BranchProbe, CaptureOutcome, CaptureReport, Confidence, LogicalPath, Removal,
        SolidityFramework, TemplateCatalog, EXTENSION_DIR,
    },
    error::StratumResult,
};

/// The upstream base-product repository and its framework branches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstream {
    pub repository: String,
    /// Remote name registered in the project being captured.
    pub remote: String,
    /// `(framework, branch)`, in probe order.
    pub branches: Vec<(SolidityFramework, String)>,
}

impl Default for Upstream {
    fn default() -> Self {
        Self {
            repository: "https://github.com/scaffold-eth/scaffold-eth-2".into(),
            remote: "scaffold-eth-2".into(),
            branches: vec![
                (SolidityFramework::Hardhat, "main".into()),
                (SolidityFramework::Foundry, "foundry".into()),
            ],
        }
    }
}

/// A baseline supplied by the caller instead of inferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplicitBaseline {
    pub commit: String,
    pub framework: Option<SolidityFramework>,
}

/// Extension-diff capture.
pub struct CaptureService {
    vcs: Box<dyn VersionControl>,
    filesystem: Box<dyn Filesystem>,
    upstream: Upstream,
}

impl CaptureService {
    pub fn new(
        vcs: Box<dyn VersionControl>,
        filesystem: Box<dyn Filesystem>,
        upstream: Upstream,
    ) -> Self {
        Self {
            vcs,
            filesystem,
            upstream,
        }
    }

    /// Infer which upstream framework branch `project` was derived from.
    ///
    /// Commit timestamps are only queried when no branch tip matches exactly.
    #[instrument(skip_all, fields(project = %project.display()))]
    pub fn infer_baseline(&self, project: &Path) -> StratumResult<BaselineInference> {
        let upstream = &self.upstream;
        self.vcs
            .add_remote(project, &upstream.remote, &upstream.repository)?;

        let mut probes = Vec::with_capacity(upstream.branches.len());
        for (framework, branch) in &upstream.branches {
            self.vcs.fetch(project, &upstream.remote, branch)?;
            let remote_ref = format!("{}/{branch}", upstream.remote);
            let tip = self.vcs.rev_parse(project, &remote_ref)?;
            let merge_base = self.vcs.merge_base(project, &remote_ref)?;
            debug!(%framework, %branch, %tip, ?merge_base, "Probed upstream branch");
            probes.push(BranchProbe {
                framework: *framework,
                branch: branch.clone(),
                tip,
                merge_base,
                committed_at: None,
            });
        }

        if exact_match(&probes).is_none() {
            for probe in probes.iter_mut() {
                if let Some(commit) = &probe.merge_base {
                    probe.committed_at = Some(self.vcs.commit_timestamp(project, commit)?);
                }
            }
        }

        let inference = infer_baseline(&probes, &upstream.repository)?;
        match &inference {
            BaselineInference::Heuristic {
                confidence: Confidence::Weak,
                framework,
                ..
            } => warn!(%framework, "Merge-bases share a timestamp; baseline framework is a guess"),
            other => info!(framework = %other.framework(), commit = other.commit(), "Baseline inferred"),
        }
        Ok(inference)
    }

    /// Capture the changes in `project` since the baseline into
    /// `<overlay_root>/extension`.
    ///
    /// Rejected files are reported as advisories in the returned report.
    /// A project with no changes yields an empty report and writes nothing.
    #[instrument(
        skip_all,
        fields(project = %project.display(), overlay = %overlay_root.display())
    )]
    pub fn capture(
        &self,
        project: &Path,
        overlay_root: &Path,
        catalog: &TemplateCatalog,
        baseline: Option<ExplicitBaseline>,
    ) -> StratumResult<CaptureReport> {
        let (commit, framework) = match baseline {
            Some(explicit) => (explicit.commit, explicit.framework),
            None => {
                let inferred = self.infer_baseline(project)?;
                (inferred.commit().to_string(), Some(inferred.framework()))
            }
        };

        let changed = self.vcs.changed_files(project, &commit)?;
        let removed = self.vcs.removed_files(project, &commit)?;

        let mut outcomes = Vec::with_capacity(changed.len());
        for path in &changed {
            let path = LogicalPath::try_new(path)?;
            let class = classify_change(&path, catalog);
            debug!(path = %path, class = %class, "Classified change");
            outcomes.push(CaptureOutcome { path, class });
        }

        let mut removals = Vec::with_capacity(removed.len());
        for (kind, path) in removed {
            removals.push(Removal {
                path: LogicalPath::try_new(path)?,
                kind,
            });
        }

        let report = CaptureReport {
            markers: BaselineMarkerSet {
                commit,
                framework,
                deleted: removals.iter().map(|r| r.path.clone()).collect(),
            },
            outcomes,
            removals,
        };

        if report.outcomes.is_empty() && report.removals.is_empty() {
            info!("No changes since the baseline; nothing captured");
            return Ok(report);
        }

        // Checked before the previous overlay is cleared, so a failure leaves it intact.
        for path in report.copied() {
            let source = project.join(path.to_path_buf());
            if !self.filesystem.exists(&source) {
                return Err(ApplicationError::FilesystemError {
                    path: source,
                    reason: "changed since the baseline but missing from the working tree; \
                             restore it or commit its deletion"
                        .into(),
                }
                .into());
            }
        }

        self.write_overlay(project, overlay_root, &report)?;
        info!(
            copied = report.copied().count(),
            advisories = report.advisories().len(),
            "Capture completed"
        );
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn write_overlay(
        &self,
        project: &Path,
        overlay_root: &Path,
        report: &CaptureReport,
    ) -> StratumResult<()> {
        let extension_dir = overlay_root.join(EXTENSION_DIR);
        if self.filesystem.exists(&extension_dir) {
            debug!(dir = %extension_dir.display(), "Clearing previous overlay");
            self.filesystem.remove_dir_all(&extension_dir)?;
        }
        self.filesystem.create_dir_all(&extension_dir)?;

        for path in report.copied() {
            let source = project.join(path.to_path_buf());
            let destination = extension_dir.join(path.to_path_buf());
            if let Some(parent) = destination.parent() {
                self.filesystem.create_dir_all(parent)?;
            }
            self.filesystem.copy_file(&source, &destination)?;
        }

        for (name, contents) in report.markers.files() {
            self.filesystem
                .write_file(&extension_dir.join(name), contents.as_bytes())?;
        }

        self.vcs.init_and_commit(overlay_root, "Initial commit")
    }
}
