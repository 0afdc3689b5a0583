//! Declarative slot templates loaded from `.template.toml` files.
//!
//! A [`ParameterizedTemplate`] is a body with `{{slotName}}` placeholders
//! plus one [`SlotSpec`] per slot. Rendering replaces each declared
//! placeholder with that slot's fragments, combined according to its
//! [`SlotKind`]. Placeholders that name no declared slot are left as-is.

use super::merge::deep_merge;
use super::slots::{ResolvedSlots, SlotTemplate, WithDefaults};
use super::stringify::{stringify, stringify_with_comments};
use super::value::ConfigValue;
use crate::domain::entities::common::LogicalPath;
use crate::domain::error::DomainError;

/// How a slot's fragments become text.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotKind {
    /// Non-blank fragments joined by `separator`.
    Join { separator: String },
    /// The first fragment only.
    First,
    /// The slot default deep-merged with the last fragment, stringified.
    Merge { comments: Vec<(String, String)> },
}

impl Default for SlotKind {
    fn default() -> Self {
        Self::Join {
            separator: "\n".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotSpec {
    pub name: String,
    pub default: ConfigValue,
    pub kind: SlotKind,
}

impl SlotSpec {
    pub fn join(name: impl Into<String>, default: impl Into<ConfigValue>) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
            kind: SlotKind::default(),
        }
    }

    pub fn first(name: impl Into<String>, default: impl Into<ConfigValue>) -> Self {
        Self {
            name: name.into(),
            default: default.into(),
            kind: SlotKind::First,
        }
    }

    pub fn merge(name: impl Into<String>, default: ConfigValue) -> Self {
        Self {
            name: name.into(),
            default,
            kind: SlotKind::Merge {
                comments: Vec::new(),
            },
        }
    }

    fn render(&self, fragments: &[ConfigValue]) -> String {
        match &self.kind {
            SlotKind::Join { separator } => fragments
                .iter()
                .filter(|f| !f.is_blank())
                .map(fragment_text)
                .collect::<Vec<_>>()
                .join(separator),
            SlotKind::First => fragments.first().map(fragment_text).unwrap_or_default(),
            SlotKind::Merge { comments } => {
                let merged = match fragments.last() {
                    Some(last) => deep_merge(&self.default, last),
                    None => self.default.clone(),
                };
                stringify_with_comments(&merged, comments)
            }
        }
    }
}

fn fragment_text(fragment: &ConfigValue) -> String {
    match fragment {
        ConfigValue::String(s) => s.clone(),
        ConfigValue::Raw(expr) => expr.clone(),
        ConfigValue::Null => String::new(),
        other => stringify(other),
    }
}

/// A template body with named insertion points.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterizedTemplate {
    body: String,
    slots: Vec<SlotSpec>,
}

impl ParameterizedTemplate {
    /// Build a template, rejecting duplicate slot names.
    pub fn new(
        logical: &LogicalPath,
        body: impl Into<String>,
        slots: Vec<SlotSpec>,
    ) -> Result<Self, DomainError> {
        for (index, slot) in slots.iter().enumerate() {
            if slot.name.trim().is_empty() {
                return Err(DomainError::InvalidTemplate {
                    path: logical.template_path(),
                    reason: "slot name cannot be empty".into(),
                });
            }
            if slots[..index].iter().any(|s| s.name == slot.name) {
                return Err(DomainError::InvalidTemplate {
                    path: logical.template_path(),
                    reason: format!("slot '{}' declared twice", slot.name),
                });
            }
        }
        Ok(Self {
            body: body.into(),
            slots,
        })
    }

    pub fn slots(&self) -> &[SlotSpec] {
        &self.slots
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Wrap in the default/validation layer.
    pub fn with_defaults(self, logical: &LogicalPath) -> WithDefaults<Self> {
        let defaults = self
            .slots
            .iter()
            .map(|s| (s.name.clone(), s.default.clone()))
            .collect();
        WithDefaults::new(logical.as_str(), self, defaults)
    }
}

impl SlotTemplate for ParameterizedTemplate {
    /// One left-to-right pass over the body. Rendered fragments are emitted
    /// as-is and never scanned for placeholders themselves.
    fn render(&self, slots: &ResolvedSlots) -> Result<String, DomainError> {
        let mut out = String::with_capacity(self.body.len());
        let mut rest = self.body.as_str();
        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            rest = &rest[start..];
            let Some(end) = rest[2..].find("}}") else {
                break;
            };
            let name = &rest[2..2 + end];
            match self.slots.iter().find(|spec| spec.name == name) {
                Some(spec) => {
                    out.push_str(&spec.render(slots.get(&spec.name)));
                    rest = &rest[2 + end + 2..];
                }
                None => {
                    out.push('{');
                    rest = &rest[1..];
                }
            }
        }
        out.push_str(rest);
        Ok(out)
    }
}
