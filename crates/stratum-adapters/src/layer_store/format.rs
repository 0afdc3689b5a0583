//! `.template.toml` and `.args.toml` parsing.
//!
//! # `<logical>.template.toml`
//!
//! ```toml
//! body = '''
//! # dependencies
//! node_modules
//! {{postContent}}'''
//!
//! [[slots]]
//! name    = "postContent"
//! default = ""
//! kind    = "join"        # join | first | merge
//! separator = "\n"        # join only
//!
//! [slots.comments]        # merge only, keyed by dotted property path
//! "pollingInterval" = "Milliseconds between polls."
//! ```
//!
//! # `<logical>.args.toml`
//!
//! Every top-level key is one slot contribution, in file order. A raw
//! expression is a single-key table: `targetNetworks = [{ "$raw" = "chains.foundry" }]`.

use serde::Deserialize;
use tracing::debug;

use stratum_core::domain::{
    ConfigValue, DomainError, LogicalPath, ParameterizedTemplate, SlotKind, SlotSpec,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplateFile {
    body: String,
    #[serde(default)]
    slots: Vec<SlotEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SlotEntry {
    name: String,
    default: Option<toml::Value>,
    #[serde(default)]
    kind: SlotKindName,
    separator: Option<String>,
    #[serde(default)]
    comments: toml::Table,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SlotKindName {
    #[default]
    Join,
    First,
    Merge,
}

fn to_config(value: toml::Value) -> Result<ConfigValue, String> {
    serde_json::to_value(value)
        .map(ConfigValue::from_json)
        .map_err(|e| e.to_string())
}

/// Parse a template file for `logical`.
pub fn parse_template(logical: &LogicalPath, text: &str) -> Result<ParameterizedTemplate, DomainError> {
    let invalid = |reason: String| DomainError::InvalidTemplate {
        path: logical.template_path(),
        reason,
    };
    let file: TemplateFile = toml::from_str(text).map_err(|e| invalid(e.to_string()))?;

    let mut specs = Vec::with_capacity(file.slots.len());
    for entry in file.slots {
        let default = entry.default.map(to_config).transpose().map_err(invalid)?;
        let spec = match entry.kind {
            SlotKindName::Join => SlotSpec {
                name: entry.name,
                default: default.unwrap_or_else(|| ConfigValue::string("")),
                kind: SlotKind::Join {
                    separator: entry.separator.unwrap_or_else(|| "\n".into()),
                },
            },
            SlotKindName::First => SlotSpec::first(
                entry.name,
                default.unwrap_or_else(|| ConfigValue::string("")),
            ),
            SlotKindName::Merge => {
                let comments = entry
                    .comments
                    .into_iter()
                    .map(|(path, text)| match text {
                        toml::Value::String(text) => Ok((path, text)),
                        other => Err(invalid(format!(
                            "comment for '{path}' must be a string, found {}",
                            other.type_str()
                        ))),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                SlotSpec {
                    name: entry.name,
                    default: default.unwrap_or_else(|| ConfigValue::Object(Vec::new())),
                    kind: SlotKind::Merge { comments },
                }
            }
        };
        specs.push(spec);
    }

    ParameterizedTemplate::new(logical, file.body, specs)
}

/// Parse an arguments file for `logical` into ordered contributions.
pub fn parse_arguments(
    logical: &LogicalPath,
    text: &str,
) -> Result<Vec<(String, ConfigValue)>, DomainError> {
    let invalid = |reason: String| DomainError::InvalidArguments {
        path: logical.arguments_path(),
        reason,
    };
    let table: toml::Table = toml::from_str(text).map_err(|e| invalid(e.to_string()))?;
    table
        .into_iter()
        .map(|(slot, value)| Ok((slot, to_config(value).map_err(invalid)?)))
        .collect()
}

/// Serialize contributions back to arguments-file text.
///
/// TOML has no null; null contributions are dropped.
pub fn render_arguments(
    logical: &LogicalPath,
    contributions: &[(String, ConfigValue)],
) -> Result<String, DomainError> {
    let invalid = |reason: String| DomainError::InvalidArguments {
        path: logical.arguments_path(),
        reason,
    };
    let mut table = toml::Table::new();
    for (slot, value) in contributions {
        if *value == ConfigValue::Null {
            debug!(slot = %slot, "Dropping null contribution");
            continue;
        }
        let value = toml::Value::try_from(value.to_json()).map_err(|e| invalid(e.to_string()))?;
        table.insert(slot.clone(), value);
    }
    toml::to_string_pretty(&table).map_err(|e| invalid(e.to_string()))
}
