//! techblog-rs: a small technical blog engine
//!
//! Markdown posts live in a content directory. The [`content::PostIndex`]
//! walks that tree on every request, derives each post's slug and group from
//! its path and parses its front-matter. The server and CLI are thin layers
//! on top of the index.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the site configuration file in the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// A blog site rooted at a base directory
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content (posts) directory
    pub content_dir: PathBuf,
    /// Static assets directory
    pub static_dir: PathBuf,
    /// Roadmap page source
    pub roadmap_path: PathBuf,
}

impl Blog {
    /// Open a site, loading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} found, using defaults", CONFIG_FILE);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Open a site with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        let static_dir = base_dir.join(&config.static_dir);
        let roadmap_path = base_dir.join(&config.roadmap_file);

        Self {
            config,
            base_dir,
            content_dir,
            static_dir,
            roadmap_path,
        }
    }

    /// Post index over the content directory
    pub fn index(&self) -> content::PostIndex {
        content::PostIndex::from_config(&self.config, &self.base_dir)
    }

    /// Raw roadmap markdown, `None` when the file does not exist
    pub fn read_roadmap(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.roadmap_path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Initialize a new site
    pub fn init(target_dir: &Path) -> Result<()> {
        commands::init::init_site(target_dir)
    }

    /// Create a new post, returning its path
    pub fn new_post(&self, title: &str, group: Option<&str>, tags: &[String]) -> Result<PathBuf> {
        commands::new::create_post(self, title, group, tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_blog_defaults_without_config() {
        let dir = TempDir::new().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.content_dir, dir.path().join("content"));
        assert_eq!(blog.roadmap_path, dir.path().join("roadmap.md"));
        assert!(blog.read_roadmap().unwrap().is_none());
        assert!(blog.index().list_posts().unwrap().is_empty());
    }

    #[test]
    fn test_blog_reads_config() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "title: Field Notes\ncontent_dir: posts\nroadmap_file: plans.md\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("posts")).unwrap();
        fs::write(dir.path().join("posts/one.md"), "---\ntitle: One\n---\n").unwrap();
        fs::write(dir.path().join("plans.md"), "- next").unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.config.title, "Field Notes");
        assert_eq!(blog.index().list_posts().unwrap()[0].title, "One");
        assert_eq!(blog.read_roadmap().unwrap().as_deref(), Some("- next"));
    }

    #[test]
    fn test_blog_rejects_bad_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "home_posts: lots\n").unwrap();
        assert!(Blog::new(dir.path()).is_err());
    }
}
