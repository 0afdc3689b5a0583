//! Structural merge of configuration defaults with a layer's override.

use super::value::ConfigValue;

/// Deep-merge `overrides` onto `base`.
///
/// - Objects merge key-by-key, recursively. Keys absent from `overrides`
///   keep their base value.
/// - Arrays are replaced wholesale by the override's array, at any depth.
/// - Any other override value wins.
///
/// Output key order is the base's key order, followed by override-only keys
/// in the order the override declares them.
pub fn deep_merge(base: &ConfigValue, overrides: &ConfigValue) -> ConfigValue {
    match (base, overrides) {
        (ConfigValue::Object(base_entries), ConfigValue::Object(override_entries)) => {
            let mut merged: Vec<(String, ConfigValue)> = base_entries
                .iter()
                .map(|(key, base_value)| {
                    let value = match lookup(override_entries, key) {
                        Some(override_value) => deep_merge(base_value, override_value),
                        None => base_value.clone(),
                    };
                    (key.clone(), value)
                })
                .collect();

            for (key, value) in override_entries {
                if lookup(base_entries, key).is_none() {
                    merged.push((key.clone(), value.clone()));
                }
            }
            ConfigValue::Object(merged)
        }
        (_, other) => other.clone(),
    }
}

fn lookup<'a>(entries: &'a [(String, ConfigValue)], key: &str) -> Option<&'a ConfigValue> {
    entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}
