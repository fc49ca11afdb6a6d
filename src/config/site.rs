//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub url: String,

    // Directory
    pub content_dir: String,
    pub content_extension: String,
    pub static_dir: String,
    pub roadmap_file: String,

    // Indexing
    pub on_parse_error: ParseErrorPolicy,

    // Presentation
    pub home_posts: usize,
    pub date_format: String,
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub server: ServerConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Tech Blog".to_string(),
            subtitle: String::new(),
            description: String::new(),
            author: String::new(),
            url: "http://localhost:4000".to_string(),

            content_dir: "content".to_string(),
            content_extension: "md".to_string(),
            static_dir: "static".to_string(),
            roadmap_file: "roadmap.md".to_string(),

            on_parse_error: ParseErrorPolicy::Skip,

            home_posts: 5,
            date_format: "YYYY-MM-DD".to_string(),
            highlight: HighlightConfig::default(),
            server: ServerConfig::default(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        // An empty file deserializes to unit, not a mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }
}

/// What to do when a single content file cannot be read or parsed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseErrorPolicy {
    /// Log a warning and leave the file out of the listing
    #[default]
    Skip,
    /// Fail the whole listing
    Fail,
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Development server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "127.0.0.1".to_string(),
            port: 4000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "content");
        assert_eq!(config.content_extension, "md");
        assert_eq!(config.on_parse_error, ParseErrorPolicy::Skip);
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Notes on Systems
content_dir: posts
on_parse_error: fail
home_posts: 3
highlight:
  theme: InspiredGitHub
server:
  port: 8080
github_username: someone
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Notes on Systems");
        assert_eq!(config.content_dir, "posts");
        assert_eq!(config.on_parse_error, ParseErrorPolicy::Fail);
        assert_eq!(config.home_posts, 3);
        assert_eq!(config.highlight.theme, "InspiredGitHub");
        assert!(!config.highlight.line_number);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.ip, "127.0.0.1");
        assert!(config.extra.contains_key("github_username"));
    }

    #[test]
    fn test_load_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("_config.yml");
        fs::write(&path, "\n").unwrap();
        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.title, "Tech Blog");
    }
}
