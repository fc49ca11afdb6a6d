//! Front-matter parsing
//!
//! Splits a content file into its YAML front-matter block and the body.
//! The block is kept as an untyped, ordered key/value map; turning it into
//! typed post metadata is the job of [`PostMeta`](super::PostMeta).

use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::Value;

use crate::error::{ContentError, Result};

const DELIMITER: &str = "---";
const YAML_END: &str = "...";

/// Untyped front-matter of a content file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrontMatter {
    fields: IndexMap<String, Value>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str)> {
        let content = content.trim_start_matches('\u{feff}');
        let trimmed = content.trim_start();

        let (first, rest) = split_first_line(trimmed);
        if first.trim_end() != DELIMITER {
            // No front-matter found
            return Ok((FrontMatter::default(), content));
        }

        let mut offset = 0;
        while offset < rest.len() {
            let (line, tail) = split_first_line(&rest[offset..]);
            let marker = line.trim_end();
            if marker == DELIMITER || marker == YAML_END {
                let yaml = &rest[..offset];
                let body = tail.trim_start_matches(['\n', '\r']);

                // A `---` horizontal rule followed by prose is body text
                if !yaml.trim().is_empty() && !has_yaml_structure(yaml) {
                    return Ok((FrontMatter::default(), content));
                }

                return Ok((Self::from_yaml(yaml)?, body));
            }
            offset += line.len() + 1;
        }

        // A lone leading rule with no closing line is plain Markdown
        if !has_yaml_structure(rest) {
            return Ok((FrontMatter::default(), content));
        }

        Err(ContentError::UnterminatedFrontMatter)
    }

    fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: Value = serde_yaml::from_str(yaml)
            .map_err(|e| ContentError::InvalidFrontMatter(e.to_string()))?;

        match value {
            Value::Mapping(map) => Ok(Self {
                fields: map
                    .into_iter()
                    .map(|(k, v)| (key_to_string(k), v))
                    .collect(),
            }),
            Value::Null => Ok(Self::default()),
            other => Err(ContentError::InvalidFrontMatter(format!(
                "expected key/value pairs, found {}",
                value_kind(&other)
            ))),
        }
    }

    /// Look up a raw front-matter value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over the fields in file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn split_first_line(s: &str) -> (&str, &str) {
    match s.find('\n') {
        Some(i) => (&s[..i], &s[i + 1..]),
        None => (s, ""),
    }
}

/// True when at least one line looks like a `key: value` pair
fn has_yaml_structure(block: &str) -> bool {
    block.lines().any(|line| {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return false;
        }
        let Some(colon_pos) = trimmed.find(':') else {
            return false;
        };
        let key = trimmed[..colon_pos].trim_matches(['"', '\'']);
        let is_valid_key = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
            && !matches!(key, "http" | "https" | "ftp");
        let after_colon = &trimmed[colon_pos + 1..];
        is_valid_key && (after_colon.is_empty() || after_colon.starts_with(' '))
    })
}

fn key_to_string(key: Value) -> String {
    match key {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: "Event Sourcing in Practice"
description: Rebuilding state from an append-only log
date: 2024-01-15
tags:
  - cqrs
  - event-sourcing
---

Events are facts.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.len(), 4);
        assert_eq!(
            fm.get("title").and_then(Value::as_str),
            Some("Event Sourcing in Practice")
        );
        assert_eq!(fm.get("date").and_then(Value::as_str), Some("2024-01-15"));
        assert!(fm.get("tags").unwrap().is_sequence());
        assert_eq!(body, "Events are facts.\n");
    }

    #[test]
    fn test_fields_keep_file_order() {
        let content = "---\nzeta: 1\nalpha: 2\nmid: 3\n---\nbody";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        let keys: Vec<&str> = fm.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just a heading\n\nSome text.";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_empty_frontmatter() {
        let (fm, body) = FrontMatter::parse("---\n---\nBody").unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_crlf_and_bom() {
        let content = "\u{feff}---\r\ntitle: Windows\r\n---\r\n\r\nBody\r\n";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.get("title").and_then(Value::as_str), Some("Windows"));
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn test_yaml_document_end_marker() {
        let (fm, body) = FrontMatter::parse("---\ntitle: Dots\n...\nBody").unwrap();
        assert_eq!(fm.get("title").and_then(Value::as_str), Some("Dots"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_body_keeps_later_separators() {
        let content = "---\ntitle: Sagas\n---\nIntro\n\n---\n\nMore";
        let (_, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(body, "Intro\n\n---\n\nMore");
    }

    #[test]
    fn test_unterminated_frontmatter() {
        let err = FrontMatter::parse("---\ntitle: Oops\n\nNo closing line").unwrap_err();
        assert!(matches!(err, ContentError::UnterminatedFrontMatter));
    }

    #[test]
    fn test_leading_rule_without_closing() {
        let content = "---\n\nAn essay that opens with a horizontal rule.\n";
        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_non_ascii_keys() {
        let (fm, body) = FrontMatter::parse("---\ntítulo: Hola\n---\nbody\n").unwrap();
        assert_eq!(fm.get("título").and_then(|v| v.as_str()), Some("Hola"));
        assert_eq!(body, "body\n");
    }

    #[test]
    fn test_invalid_yaml() {
        let err = FrontMatter::parse("---\ntitle: [unclosed\n---\nBody").unwrap_err();
        assert!(matches!(err, ContentError::InvalidFrontMatter(_)));
    }

    #[test]
    fn test_non_mapping_yaml() {
        let err = FrontMatter::parse("---\n\"title: quoted\"\n---\nBody").unwrap_err();
        assert!(matches!(err, ContentError::InvalidFrontMatter(_)));
    }

    #[test]
    fn test_markdown_separator_not_yaml() {
        let content = r#"---

Check out https://example.com/path and keep reading.

---
More content.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert!(fm.is_empty());
        assert!(body.contains("https://example.com"));
        assert!(body.contains("More content."));
    }

    #[test]
    fn test_non_string_keys() {
        let (fm, _) = FrontMatter::parse("---\n2024: leap\ntrue: yes\n---\n").unwrap();
        assert_eq!(fm.get("2024").and_then(Value::as_str), Some("leap"));
        assert!(fm.get("true").is_some());
    }
}
