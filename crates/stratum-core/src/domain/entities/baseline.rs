//! Baseline marker files and upstream baseline inference.

use crate::domain::{
    entities::common::LogicalPath, error::DomainError, value_objects::SolidityFramework,
};

/// Commit the captured overlay was diffed against.
pub const COMMIT_HASH_LOG: &str = "commitHash.log";

/// Newline-separated paths deleted or renamed since the baseline.
pub const DELETED_FILES_LOG: &str = "deletedFiles.log";

/// Framework the overlay was authored against.
pub const SOLIDITY_FRAMEWORK_LOG: &str = "solidityFramework.log";

pub const MARKER_FILES: [&str; 3] = [COMMIT_HASH_LOG, DELETED_FILES_LOG, SOLIDITY_FRAMEWORK_LOG];

/// The `{commit, framework, deleted paths}` record stored with an overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaselineMarkerSet {
    pub commit: String,
    pub framework: Option<SolidityFramework>,
    pub deleted: Vec<LogicalPath>,
}

impl BaselineMarkerSet {
    /// `(file name, contents)` for every marker that should be written.
    pub fn files(&self) -> Vec<(&'static str, String)> {
        let mut files = vec![
            (COMMIT_HASH_LOG, self.commit.clone()),
            (
                DELETED_FILES_LOG,
                self.deleted
                    .iter()
                    .map(LogicalPath::as_str)
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
        ];
        if let Some(fw) = self.framework {
            files.push((SOLIDITY_FRAMEWORK_LOG, fw.to_string()));
        }
        files
    }

    /// Parse a deleted-files log. Blank and unusable lines are ignored.
    pub fn parse_deleted(text: &str) -> Vec<LogicalPath> {
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .filter_map(|l| LogicalPath::try_new(l).ok())
            .collect()
    }

    /// Parse a framework log. Anything but a known framework name is `None`.
    pub fn parse_framework(text: &str) -> Option<SolidityFramework> {
        text.trim().parse().ok()
    }
}

/// What version control reported about one upstream framework branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchProbe {
    pub framework: SolidityFramework,
    pub branch: String,
    /// Current tip of the upstream branch.
    pub tip: String,
    /// Merge-base of the project's HEAD with the branch, if any.
    pub merge_base: Option<String>,
    /// Commit time of `merge_base`, seconds since the epoch. Only needed when
    /// no branch matches exactly.
    pub committed_at: Option<i64>,
}

impl BranchProbe {
    pub fn is_exact(&self) -> bool {
        self.merge_base.as_deref() == Some(self.tip.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// A single candidate, or merge-bases with distinct commit times.
    Strong,
    /// Merge-bases committed at the same second.
    Weak,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaselineInference {
    /// The project's merge-base is the tip of this framework's branch.
    Exact {
        framework: SolidityFramework,
        commit: String,
    },
    /// No tip matched; the most recent merge-base was chosen.
    Heuristic {
        framework: SolidityFramework,
        commit: String,
        confidence: Confidence,
    },
}

impl BaselineInference {
    pub fn framework(&self) -> SolidityFramework {
        match self {
            Self::Exact { framework, .. } | Self::Heuristic { framework, .. } => *framework,
        }
    }

    pub fn commit(&self) -> &str {
        match self {
            Self::Exact { commit, .. } | Self::Heuristic { commit, .. } => commit,
        }
    }
}

/// The single probe whose merge-base is its branch tip. Two or more exact
/// matches are ambiguous and yield `None`.
pub fn exact_match(probes: &[BranchProbe]) -> Option<BaselineInference> {
    let mut exact = probes.iter().filter(|p| p.is_exact());
    match (exact.next(), exact.next()) {
        (Some(p), None) => Some(BaselineInference::Exact {
            framework: p.framework,
            commit: p.tip.clone(),
        }),
        _ => None,
    }
}

/// Infer which framework branch a project derives from.
///
/// 1. A merge-base equal to exactly one branch tip wins outright.
/// 2. Otherwise the most recent merge-base wins; on equal commit times the
///    later probe wins with [`Confidence::Weak`].
///
/// Fails when no probe has a merge-base, or when recency is needed and a
/// candidate carries no timestamp.
pub fn infer_baseline(
    probes: &[BranchProbe],
    upstream: &str,
) -> Result<BaselineInference, DomainError> {
    if let Some(exact) = exact_match(probes) {
        return Ok(exact);
    }

    let candidates: Vec<&BranchProbe> = probes.iter().filter(|p| p.merge_base.is_some()).collect();

    match candidates.as_slice() {
        [] => Err(DomainError::NoMergeBase {
            upstream: upstream.to_string(),
        }),
        [only] => Ok(BaselineInference::Heuristic {
            framework: only.framework,
            commit: only.merge_base.clone().unwrap_or_default(),
            confidence: Confidence::Strong,
        }),
        many => {
            let mut best: Option<(&BranchProbe, i64)> = None;
            let mut tied = false;
            for probe in many {
                let at = probe.committed_at.ok_or_else(|| DomainError::MissingTimestamp {
                    branch: probe.branch.clone(),
                })?;
                match best {
                    Some((_, best_at)) if at < best_at => {}
                    Some((_, best_at)) => {
                        tied = at == best_at;
                        best = Some((*probe, at));
                    }
                    None => best = Some((*probe, at)),
                }
            }
            let (winner, _) = best.ok_or_else(|| DomainError::NoMergeBase {
                upstream: upstream.to_string(),
            })?;
            Ok(BaselineInference::Heuristic {
                framework: winner.framework,
                commit: winner.merge_base.clone().unwrap_or_default(),
                confidence: if tied {
                    Confidence::Weak
                } else {
                    Confidence::Strong
                },
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(
        framework: SolidityFramework,
        tip: &str,
        merge_base: Option<&str>,
        committed_at: Option<i64>,
    ) -> BranchProbe {
        BranchProbe {
            framework,
            branch: framework.to_string(),
            tip: tip.into(),
            merge_base: merge_base.map(String::from),
            committed_at,
        }
    }

    const HH: SolidityFramework = SolidityFramework::Hardhat;
    const FD: SolidityFramework = SolidityFramework::Foundry;

    #[test]
    fn exact_tip_match_selects_that_framework() {
        let probes = [
            probe(HH, "aaa", Some("aaa"), None),
            probe(FD, "fff", Some("old"), None),
        ];
        assert_eq!(
            infer_baseline(&probes, "upstream").unwrap(),
            BaselineInference::Exact {
                framework: HH,
                commit: "aaa".into()
            }
        );
    }

    #[test]
    fn exact_match_on_second_branch() {
        let probes = [
            probe(HH, "aaa", Some("old"), None),
            probe(FD, "fff", Some("fff"), None),
        ];
        assert_eq!(infer_baseline(&probes, "u").unwrap().framework(), FD);
    }

    #[test]
    fn two_exact_matches_fall_back_to_recency() {
        let probes = [
            probe(HH, "aaa", Some("aaa"), Some(10)),
            probe(FD, "fff", Some("fff"), Some(20)),
        ];
        assert_eq!(
            infer_baseline(&probes, "u").unwrap(),
            BaselineInference::Heuristic {
                framework: FD,
                commit: "fff".into(),
                confidence: Confidence::Strong
            }
        );
    }

    #[test]
    fn recency_fallback_prefers_newer_merge_base() {
        let probes = [
            probe(HH, "aaa", Some("h1"), Some(200)),
            probe(FD, "fff", Some("f1"), Some(100)),
        ];
        assert_eq!(
            infer_baseline(&probes, "u").unwrap(),
            BaselineInference::Heuristic {
                framework: HH,
                commit: "h1".into(),
                confidence: Confidence::Strong
            }
        );
    }

    #[test]
    fn equal_timestamps_go_to_the_later_branch_with_weak_confidence() {
        let probes = [
            probe(HH, "aaa", Some("h1"), Some(100)),
            probe(FD, "fff", Some("f1"), Some(100)),
        ];
        assert_eq!(
            infer_baseline(&probes, "u").unwrap(),
            BaselineInference::Heuristic {
                framework: FD,
                commit: "f1".into(),
                confidence: Confidence::Weak
            }
        );
    }

    #[test]
    fn single_candidate_needs_no_timestamp() {
        let probes = [probe(HH, "aaa", None, None), probe(FD, "fff", Some("f1"), None)];
        let inference = infer_baseline(&probes, "u").unwrap();
        assert_eq!(inference.framework(), FD);
        assert_eq!(inference.commit(), "f1");
    }

    #[test]
    fn no_merge_base_is_an_error() {
        let probes = [probe(HH, "aaa", None, None), probe(FD, "fff", None, None)];
        assert!(matches!(
            infer_baseline(&probes, "u"),
            Err(DomainError::NoMergeBase { .. })
        ));
    }

    #[test]
    fn missing_timestamp_is_reported() {
        let probes = [
            probe(HH, "aaa", Some("h1"), Some(1)),
            probe(FD, "fff", Some("f1"), None),
        ];
        assert!(matches!(
            infer_baseline(&probes, "u"),
            Err(DomainError::MissingTimestamp { .. })
        ));
    }

    #[test]
    fn marker_files_render_and_parse() {
        let markers = BaselineMarkerSet {
            commit: "abc123".into(),
            framework: Some(FD),
            deleted: vec![
                LogicalPath::try_new("packages/nextjs/app/page.tsx").unwrap(),
                LogicalPath::try_new("README.md").unwrap(),
            ],
        };
        let files = markers.files();
        assert_eq!(files.len(), 3);

        let deleted = &files.iter().find(|(n, _)| *n == DELETED_FILES_LOG).unwrap().1;
        assert_eq!(deleted, "packages/nextjs/app/page.tsx\nREADME.md");
        assert_eq!(BaselineMarkerSet::parse_deleted(deleted), markers.deleted);
        assert_eq!(BaselineMarkerSet::parse_framework("foundry\n"), Some(FD));
        assert_eq!(BaselineMarkerSet::parse_framework("truffle"), None);
    }

    #[test]
    fn framework_marker_is_optional() {
        let markers = BaselineMarkerSet {
            commit: "abc".into(),
            framework: None,
            deleted: vec![],
        };
        assert!(markers.files().iter().all(|(n, _)| *n != SOLIDITY_FRAMEWORK_LOG));
    }
}
