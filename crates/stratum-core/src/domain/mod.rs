// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Stratum.
//!
//! This module contains pure composition logic with no I/O. Layer walking,
//! git, and file writes are reached through ports (traits) defined in the
//! application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Few external crates**: std, thiserror, serde, serde_json, tracing
//! - **Immutable values**: Domain objects are Clone + PartialEq
//! - **Pure functions**: deep-merge, stringify, classification and baseline
//!   inference are free functions, testable without fixtures
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod migration;
pub mod template;
pub mod value_objects;

// Re-exports for convenience
pub use entities::{
    baseline::{
        exact_match, infer_baseline, BaselineInference, BaselineMarkerSet, BranchProbe, Confidence,
        COMMIT_HASH_LOG, DELETED_FILES_LOG, MARKER_FILES, SOLIDITY_FRAMEWORK_LOG,
    },
    capture::{
        classify_change, generated_artifact, CaptureOutcome, CaptureReport, ChangeClass,
        Removal, RemovalKind, TemplateCatalog,
    },
    common::{LogicalPath, ARGUMENTS_SUFFIX, TEMPLATE_SUFFIX},
    extension::{
        choose_framework, classify_trust, ExtensionCatalog, ExtensionDescriptor, RepositoryRef,
        ResolvedExtension, TRUSTED_ORGANIZATIONS,
    },
    layer::{Layer, LayerStack, BASE_DIR, EXTENSION_DIR, FRAMEWORKS_DIR},
    project_structure::{FileContent, FileToWrite, ProjectStructure, SkippedFile},
};

pub use error::{DomainError, ErrorCategory};

pub use migration::{
    compare_args, fix_args, ArgsComparison, FileMigration, FileStatus, MigrationReport,
    SlotRename, KNOWN_RENAMES,
};

pub use template::{
    deep_merge, stringify, stringify_with_comments, ConfigValue, ParameterizedTemplate,
    ResolvedSlots, SlotArgs, SlotKind, SlotSpec, SlotTemplate, WithDefaults,
};

pub use value_objects::{FileRole, LayerKind, SolidityFramework, Trust};

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::str::FromStr;

    use super::*;
    use serde_json::json;

    // ========================================================================
    // Value Object Tests
    // ========================================================================

    #[test]
    fn framework_parses_case_insensitively() {
        assert_eq!(
            SolidityFramework::from_str("Hardhat").unwrap(),
            SolidityFramework::Hardhat
        );
        assert_eq!(
            SolidityFramework::from_str(" foundry ").unwrap(),
            SolidityFramework::Foundry
        );
        assert!(matches!(
            SolidityFramework::from_str("truffle"),
            Err(DomainError::InvalidFramework { .. })
        ));
    }

    #[test]
    fn layer_kind_display() {
        assert_eq!(LayerKind::Base.to_string(), "base");
        assert_eq!(
            LayerKind::Framework(SolidityFramework::Hardhat).to_string(),
            "framework:hardhat"
        );
    }

    // ========================================================================
    // Default/Validation Wrapper Tests
    // ========================================================================

    #[test]
    fn unknown_slot_message_lists_every_accepted_key() {
        let path = LogicalPath::try_new("packages/nextjs/app/layout.tsx").unwrap();
        let template = ParameterizedTemplate::new(
            &path,
            "{{preContent}}{{globalClassNames}}",
            vec![
                SlotSpec::join("preContent", ""),
                SlotSpec::join("globalClassNames", ""),
            ],
        )
        .unwrap()
        .with_defaults(&path);

        let err = template
            .call(&SlotArgs::new().with("preConfigContent", "x"))
            .unwrap_err();
        let message = err.to_string();

        assert!(message.contains("preConfigContent"));
        assert!(message.contains("preContent"));
        assert!(message.contains("globalClassNames"));
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn closures_are_slot_templates() {
        let template = WithDefaults::new(
            "greeting",
            |slots: &ResolvedSlots| -> Result<String, DomainError> {
                Ok(format!("hello {}", slots.get("who")[0].as_str().unwrap_or("?")))
            },
            vec![("who".into(), ConfigValue::from("world"))],
        );
        assert_eq!(template.call(&SlotArgs::new()).unwrap(), "hello world");
        assert_eq!(
            template
                .call(&SlotArgs::new().with("who", "layers"))
                .unwrap(),
            "hello layers"
        );
    }

    // ========================================================================
    // Deep-Merge and Stringify Tests
    // ========================================================================

    #[test]
    fn deep_merge_replaces_arrays() {
        let base = ConfigValue::from_json(json!({ "a": [1, 2], "b": { "c": 1 } }));
        let over = ConfigValue::from_json(json!({ "a": [9] }));
        assert_eq!(
            deep_merge(&base, &over),
            ConfigValue::from_json(json!({ "a": [9], "b": { "c": 1 } }))
        );
    }

    #[test]
    fn raw_values_render_unquoted() {
        let value = ConfigValue::object([("x", ConfigValue::raw("foo()"))]);
        let text = stringify(&value);
        assert!(text.contains("foo()"));
        assert!(!text.contains("\"foo()\""));
    }

    // ========================================================================
    // Layer Tests
    // ========================================================================

    #[test]
    fn layer_stack_places_extension_last() {
        let stack = LayerStack::resolve(
            Path::new("templates"),
            Some(SolidityFramework::Hardhat),
            Some(Path::new("ext")),
        );
        assert!(stack.layers().last().unwrap().kind().is_extension());
        assert_eq!(stack.framework(), Some(SolidityFramework::Hardhat));
    }

    // ========================================================================
    // Capture Tests
    // ========================================================================

    #[test]
    fn every_change_gets_exactly_one_class() {
        let mut catalog = TemplateCatalog::new();
        catalog.record(LogicalPath::try_new(".gitignore").unwrap(), FileRole::Template);
        catalog.record(LogicalPath::try_new("README.md").unwrap(), FileRole::Static);

        let classes: Vec<String> = [".gitignore", "yarn.lock", "README.md", "NEW.md"]
            .iter()
            .map(|p| classify_change(&LogicalPath::try_new(p).unwrap(), &catalog).to_string())
            .collect();

        assert_eq!(
            classes,
            vec![
                "template-conflict",
                "generated-artifact",
                "existing-core-file",
                "novel-addition"
            ]
        );
    }
}
