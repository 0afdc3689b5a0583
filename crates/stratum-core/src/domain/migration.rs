//! Arguments-file drift between an extension and a newer reference overlay.

use std::collections::BTreeSet;

use crate::domain::{entities::common::LogicalPath, template::ConfigValue};

/// Slots renamed in earlier template revisions, `(old, new)`.
///
/// Checked in order; each new name is claimed by at most one old name.
pub const KNOWN_RENAMES: [(&str, &str); 4] = [
    ("preConfigContent", "preContent"),
    ("extraContent", "extraContents"),
    ("menuIconImports", "preContent"),
    ("menuObjects", "extraMenuLinksObjects"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRename {
    pub old: String,
    pub new: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueDifference {
    pub slot: String,
    pub current: ConfigValue,
    pub reference: ConfigValue,
}

/// Slot-level comparison of one arguments file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgsComparison {
    /// Present only in the current file.
    pub removed: Vec<String>,
    /// Present only in the reference file.
    pub added: Vec<String>,
    pub renamed: Vec<SlotRename>,
    pub different: Vec<ValueDifference>,
}

impl ArgsComparison {
    pub fn has_issues(&self) -> bool {
        !(self.removed.is_empty()
            && self.added.is_empty()
            && self.renamed.is_empty()
            && self.different.is_empty())
    }
}

/// Compare the slot names and values of two arguments files.
pub fn compare_args(
    current: &[(String, ConfigValue)],
    reference: &[(String, ConfigValue)],
) -> ArgsComparison {
    let mut current_keys: BTreeSet<&str> = current.iter().map(|(k, _)| k.as_str()).collect();
    let mut reference_keys: BTreeSet<&str> = reference.iter().map(|(k, _)| k.as_str()).collect();
    let mut comparison = ArgsComparison::default();

    for (old, new) in KNOWN_RENAMES {
        if current_keys.contains(old) && reference_keys.contains(new) {
            comparison.renamed.push(SlotRename {
                old: old.to_string(),
                new: new.to_string(),
            });
            current_keys.remove(old);
            reference_keys.remove(new);
        }
    }

    comparison.added = reference
        .iter()
        .map(|(k, _)| k.as_str())
        .filter(|k| reference_keys.contains(k) && !current_keys.contains(k))
        .map(String::from)
        .collect();
    comparison.removed = current
        .iter()
        .map(|(k, _)| k.as_str())
        .filter(|k| current_keys.contains(k) && !reference_keys.contains(k))
        .map(String::from)
        .collect();

    for (slot, value) in current {
        if let Some((_, reference_value)) = reference.iter().find(|(k, _)| k == slot) {
            if value != reference_value {
                comparison.different.push(ValueDifference {
                    slot: slot.clone(),
                    current: value.clone(),
                    reference: reference_value.clone(),
                });
            }
        }
    }

    comparison
}

/// Apply renames in place and append reference slots the current file lacks,
/// using the reference values as placeholders.
pub fn fix_args(
    current: &[(String, ConfigValue)],
    reference: &[(String, ConfigValue)],
    renamed: &[SlotRename],
) -> Vec<(String, ConfigValue)> {
    let mut fixed: Vec<(String, ConfigValue)> = current.to_vec();

    for rename in renamed {
        if fixed.iter().any(|(k, _)| *k == rename.new) {
            fixed.retain(|(k, _)| *k != rename.old);
            continue;
        }
        if let Some(entry) = fixed.iter_mut().find(|(k, _)| *k == rename.old) {
            entry.0 = rename.new.clone();
        }
    }

    for (slot, value) in reference {
        if !fixed.iter().any(|(k, _)| k == slot) {
            fixed.push((slot.clone(), value.clone()));
        }
    }

    fixed
}

/// What the migration check found for one arguments file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileStatus {
    /// Only the reference ships this arguments file.
    OnlyInReference { slots: Vec<String> },
    /// Only the extension ships this arguments file.
    OnlyInCurrent,
    Compared(ArgsComparison),
}

impl FileStatus {
    pub fn has_issues(&self) -> bool {
        match self {
            Self::OnlyInReference { .. } | Self::OnlyInCurrent => true,
            Self::Compared(comparison) => comparison.has_issues(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileMigration {
    pub path: LogicalPath,
    pub status: FileStatus,
    /// Whether the arguments file was rewritten.
    pub fixed: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationReport {
    pub files: Vec<FileMigration>,
}

impl MigrationReport {
    pub fn issue_count(&self) -> usize {
        self.files.iter().filter(|f| f.status.has_issues()).count()
    }

    pub fn fixed_count(&self) -> usize {
        self.files.iter().filter(|f| f.fixed).count()
    }
}
