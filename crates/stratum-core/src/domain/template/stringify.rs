//! Render a [`ConfigValue`] as object/array literal source text.
//!
//! Output is JSON-compatible for plain data: keys and strings are
//! double-quoted and escaped, two-space indentation, full depth.
//! [`ConfigValue::Raw`] is written verbatim, unquoted.
//!
//! Comment annotations are keyed by dotted property path (`"wallet.poll"`,
//! array elements use their index: `"targetNetworks.0"`). They are attached
//! while the tree is being rendered, so a key that repeats at another depth
//! is never annotated by mistake. Paths that match nothing are skipped.

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use super::value::ConfigValue;

const INDENT: &str = "  ";
const COMMENT_WIDTH: usize = 80;

/// Render `value` without annotations.
pub fn stringify(value: &ConfigValue) -> String {
    stringify_with_comments(value, &[])
}

/// Render `value`, placing each `(path, comment)` above its property.
pub fn stringify_with_comments(value: &ConfigValue, comments: &[(String, String)]) -> String {
    let mut renderer = Renderer {
        out: String::new(),
        comments,
        used: HashSet::new(),
        path: Vec::new(),
    };
    renderer.value(value, 0);

    for (path, _) in comments {
        if !renderer.used.contains(path.as_str()) {
            debug!(path = %path, "comment target not found, skipping");
        }
    }
    renderer.out
}

struct Renderer<'a> {
    out: String,
    comments: &'a [(String, String)],
    used: HashSet<&'a str>,
    path: Vec<String>,
}

impl<'a> Renderer<'a> {
    fn value(&mut self, value: &ConfigValue, depth: usize) {
        match value {
            ConfigValue::Null => self.out.push_str("null"),
            ConfigValue::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            ConfigValue::Number(n) => self.out.push_str(&n.to_string()),
            ConfigValue::String(s) => self.out.push_str(&quote(s)),
            ConfigValue::Raw(expr) => self.out.push_str(expr),
            ConfigValue::Array(items) if items.is_empty() => self.out.push_str("[]"),
            ConfigValue::Object(entries) if entries.is_empty() => self.out.push_str("{}"),
            ConfigValue::Array(items) => {
                self.out.push_str("[\n");
                for (index, item) in items.iter().enumerate() {
                    self.path.push(index.to_string());
                    self.comment(depth + 1);
                    self.indent(depth + 1);
                    self.value(item, depth + 1);
                    self.path.pop();
                    self.separator(index + 1 < items.len());
                }
                self.indent(depth);
                self.out.push(']');
            }
            ConfigValue::Object(entries) => {
                self.out.push_str("{\n");
                for (index, (key, item)) in entries.iter().enumerate() {
                    self.path.push(key.clone());
                    self.comment(depth + 1);
                    self.indent(depth + 1);
                    self.out.push_str(&quote(key));
                    self.out.push_str(": ");
                    self.value(item, depth + 1);
                    self.path.pop();
                    self.separator(index + 1 < entries.len());
                }
                self.indent(depth);
                self.out.push('}');
            }
        }
    }

    fn comment(&mut self, depth: usize) {
        let current = self.path.join(".");
        let comments: &'a [(String, String)] = self.comments;
        let Some((path, text)) = comments.iter().find(|(p, _)| *p == current) else {
            return;
        };
        self.used.insert(path.as_str());

        let width = COMMENT_WIDTH.saturating_sub(depth * INDENT.len() + 3).max(20);
        for line in wrap(text, width) {
            self.indent(depth);
            self.out.push_str("// ");
            self.out.push_str(&line);
            self.out.push('\n');
        }
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
    }

    fn separator(&mut self, more: bool) {
        if more {
            self.out.push(',');
        }
        self.out.push('\n');
    }
}

fn quote(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if !line.is_empty() && line.len() + 1 + word.len() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> ConfigValue {
        ConfigValue::from_json(json!({
            "targetNetworks": [31337],
            "pollingInterval": 30000,
            "onlyLocalBurnerWallet": true,
            "name": "say \"hi\"\n",
            "nested": { "empty": {}, "list": [], "none": null, "ratio": 0.5 }
        }))
    }

    #[test]
    fn plain_data_round_trips_through_json() {
        let value = sample();
        let text = stringify(&value);
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(ConfigValue::from_json(parsed), value);
    }

    #[test]
    fn raw_values_are_unquoted() {
        let value = ConfigValue::object([("x", ConfigValue::raw("foo()"))]);
        let text = stringify(&value);
        assert!(text.contains("foo()"));
        assert!(!text.contains("\"foo()\""));
    }

    #[test]
    fn template_literal_survives_raw() {
        let value = ConfigValue::object([(
            "rpc",
            ConfigValue::raw("`https://eth.example/${process.env.KEY}`"),
        )]);
        assert!(stringify(&value).contains("\"rpc\": `https://eth.example/${process.env.KEY}`"));
    }

    #[test]
    fn layout_is_two_space_indented() {
        let value = ConfigValue::object([("a", ConfigValue::Array(vec![ConfigValue::from(1)]))]);
        assert_eq!(stringify(&value), "{\n  \"a\": [\n    1\n  ]\n}");
    }

    #[test]
    fn comment_lands_above_nested_property_only() {
        // "poll" exists at two depths; only the nested one is annotated.
        let value = ConfigValue::from_json(json!({
            "poll": 1,
            "wallet": { "poll": 2 }
        }));
        let comments = vec![("wallet.poll".to_string(), "Refresh rate".to_string())];
        let text = stringify_with_comments(&value, &comments);

        let expected = "{\n  \"poll\": 1,\n  \"wallet\": {\n    // Refresh rate\n    \"poll\": 2\n  }\n}";
        assert_eq!(text, expected);
    }

    #[test]
    fn long_comments_wrap_at_indentation() {
        let value = ConfigValue::from_json(json!({ "a": { "b": 1 } }));
        let long = "word ".repeat(40);
        let comments = vec![("a.b".to_string(), long)];
        let text = stringify_with_comments(&value, &comments);

        let comment_lines: Vec<_> = text.lines().filter(|l| l.trim_start().starts_with("//")).collect();
        assert!(comment_lines.len() > 1);
        for line in comment_lines {
            assert!(line.starts_with("    // "));
            assert!(line.len() <= COMMENT_WIDTH);
        }
    }

    #[test]
    fn missing_comment_target_is_skipped() {
        let value = ConfigValue::object([("a", ConfigValue::from(1))]);
        let comments = vec![("does.not.exist".to_string(), "ignored".to_string())];
        assert_eq!(stringify_with_comments(&value, &comments), stringify(&value));
    }

    #[test]
    fn array_elements_can_be_annotated() {
        let value = ConfigValue::from_json(json!({ "nets": ["a", "b"] }));
        let comments = vec![("nets.1".to_string(), "second".to_string())];
        let text = stringify_with_comments(&value, &comments);
        assert!(text.contains("    \"a\",\n    // second\n    \"b\""));
    }
}
