//! Slot template contract and the default/validation wrapper.
//!
//! A [`SlotTemplate`] turns a complete set of slot values into file text.
//! [`WithDefaults`] sits in front of it: it fills every declared slot that
//! received nothing with `[default]` and rejects any slot name the template
//! does not declare.

use std::collections::BTreeMap;

use super::value::ConfigValue;
use crate::domain::error::DomainError;

/// Slot contributions collected across layers, before defaults apply.
///
/// Each contribution is appended, so a slot's fragments stay in layer
/// activation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotArgs {
    entries: Vec<(String, Vec<ConfigValue>)>,
}

impl SlotArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one fragment to `slot`.
    pub fn contribute(&mut self, slot: impl Into<String>, value: ConfigValue) {
        let slot = slot.into();
        match self.entries.iter_mut().find(|(name, _)| *name == slot) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((slot, vec![value])),
        }
    }

    /// Append every fragment of `values` to `slot`.
    pub fn contribute_all(&mut self, slot: impl Into<String>, values: Vec<ConfigValue>) {
        let slot = slot.into();
        for value in values {
            self.contribute(slot.clone(), value);
        }
    }

    /// Builder form of [`Self::contribute`].
    pub fn with(mut self, slot: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.contribute(slot, value.into());
        self
    }

    pub fn get(&self, slot: &str) -> Option<&[ConfigValue]> {
        self.entries
            .iter()
            .find(|(name, _)| name == slot)
            .map(|(_, values)| values.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Slot values after defaults: every declared slot has at least one fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSlots {
    values: BTreeMap<String, Vec<ConfigValue>>,
}

impl ResolvedSlots {
    /// Fragments for a declared slot. Undeclared names yield an empty slice.
    pub fn get(&self, slot: &str) -> &[ConfigValue] {
        self.values.get(slot).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The unit every parameterized file implements.
pub trait SlotTemplate {
    fn render(&self, slots: &ResolvedSlots) -> Result<String, DomainError>;
}

impl<F> SlotTemplate for F
where
    F: Fn(&ResolvedSlots) -> Result<String, DomainError>,
{
    fn render(&self, slots: &ResolvedSlots) -> Result<String, DomainError> {
        self(slots)
    }
}

/// Default/validation wrapper around a [`SlotTemplate`].
#[derive(Debug, Clone)]
pub struct WithDefaults<T> {
    name: String,
    template: T,
    defaults: Vec<(String, ConfigValue)>,
}

impl<T: SlotTemplate> WithDefaults<T> {
    /// `name` identifies the template in error messages.
    pub fn new(
        name: impl Into<String>,
        template: T,
        defaults: Vec<(String, ConfigValue)>,
    ) -> Self {
        Self {
            name: name.into(),
            template,
            defaults,
        }
    }

    /// Declared slot names, in declaration order.
    pub fn accepted(&self) -> Vec<String> {
        self.defaults.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Apply defaults and validation, then render.
    pub fn call(&self, received: &SlotArgs) -> Result<String, DomainError> {
        let resolved = self.resolve(received)?;
        self.template.render(&resolved)
    }

    /// Apply defaults and validation without rendering.
    pub fn resolve(&self, received: &SlotArgs) -> Result<ResolvedSlots, DomainError> {
        for slot in received.names() {
            if !self.defaults.iter().any(|(name, _)| name == slot) {
                return Err(DomainError::UnknownSlot {
                    template: self.name.clone(),
                    slot: slot.to_string(),
                    accepted: self.accepted(),
                });
            }
        }

        let values = self
            .defaults
            .iter()
            .map(|(name, default)| {
                let values = match received.get(name) {
                    Some(given) if !given.is_empty() => given.to_vec(),
                    _ => vec![default.clone()],
                };
                (name.clone(), values)
            })
            .collect();

        Ok(ResolvedSlots { values })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greeting() -> WithDefaults<impl SlotTemplate> {
        let render = |slots: &ResolvedSlots| -> Result<String, DomainError> {
            let lines: Vec<_> = slots
                .get("lines")
                .iter()
                .filter_map(ConfigValue::as_str)
                .filter(|s| !s.is_empty())
                .collect();
            let title = slots.get("title")[0].as_str().unwrap_or_default().to_string();
            Ok(format!("{title}\n{}", lines.join("\n")))
        };
        WithDefaults::new(
            "greeting.txt",
            render,
            vec![
                ("title".into(), ConfigValue::string("Hello")),
                ("lines".into(), ConfigValue::string("")),
            ],
        )
    }

    #[test]
    fn missing_slots_get_their_default() {
        let out = greeting().call(&SlotArgs::new()).unwrap();
        assert_eq!(out, "Hello\n");
    }

    #[test]
    fn every_declared_slot_is_present_after_resolve() {
        let resolved = greeting().resolve(&SlotArgs::new()).unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved.get("title"), &[ConfigValue::string("Hello")]);
    }

    #[test]
    fn contributions_keep_activation_order() {
        let args = SlotArgs::new()
            .with("lines", "from base")
            .with("lines", "from framework");
        let out = greeting().call(&args).unwrap();
        assert_eq!(out, "Hello\nfrom base\nfrom framework");
    }

    #[test]
    fn supplied_slot_replaces_default() {
        let args = SlotArgs::new().with("title", "Hi");
        assert!(greeting().call(&args).unwrap().starts_with("Hi"));
    }

    #[test]
    fn unknown_slot_is_rejected_and_lists_accepted() {
        let args = SlotArgs::new().with("titel", "typo");
        let err = greeting().call(&args).unwrap_err();

        match &err {
            DomainError::UnknownSlot { slot, accepted, template } => {
                assert_eq!(slot, "titel");
                assert_eq!(template, "greeting.txt");
                assert_eq!(accepted, &["title".to_string(), "lines".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let message = err.to_string();
        assert!(message.contains("titel"));
        assert!(message.contains("title, lines"));
    }

    #[test]
    fn contribute_all_appends() {
        let mut args = SlotArgs::new();
        args.contribute("a", ConfigValue::from(1));
        args.contribute_all("a", vec![ConfigValue::from(2), ConfigValue::from(3)]);
        assert_eq!(args.get("a").map(<[ConfigValue]>::len), Some(3));
    }
}
