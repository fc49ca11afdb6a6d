//! Post indexer - discovers posts in the content directory

use chrono::{DateTime, Local};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use super::{FrontMatter, Post, PostMeta};
use crate::config::{ParseErrorPolicy, SiteConfig};
use crate::error::{ContentError, Result};

/// Read-only index over a tree of content files
///
/// Nothing is cached: every call walks the tree and reads the files again,
/// so results always reflect what is on disk.
#[derive(Debug, Clone)]
pub struct PostIndex {
    root: PathBuf,
    extension: String,
    policy: ParseErrorPolicy,
}

impl PostIndex {
    /// Create an index over `root` for `.md` files, skipping unparseable ones
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            extension: "md".to_string(),
            policy: ParseErrorPolicy::Skip,
        }
    }

    /// Create an index from site configuration, relative to `base_dir`
    pub fn from_config(config: &SiteConfig, base_dir: &Path) -> Self {
        Self::new(base_dir.join(&config.content_dir))
            .with_extension(&config.content_extension)
            .with_policy(config.on_parse_error)
    }

    /// Use a different content file extension (without the dot)
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Choose what happens when a single file fails to parse
    pub fn with_policy(mut self, policy: ParseErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load every post, newest first
    pub fn list_posts(&self) -> Result<Vec<Post>> {
        let mut posts = Vec::new();

        for path in self.content_files()? {
            let Some(slug) = self.slug_for(&path) else {
                continue;
            };
            match load_post(&path, slug) {
                Ok(post) => {
                    tracing::debug!("Indexed {}", post.slug_path());
                    posts.push(post);
                }
                Err(e) => match self.policy {
                    ParseErrorPolicy::Skip => {
                        tracing::warn!("Skipping {:?}: {}", path, e);
                    }
                    ParseErrorPolicy::Fail => return Err(e.in_file(&path)),
                },
            }
        }

        // Stable sort keeps traversal order among equal dates
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(posts)
    }

    /// Look up one post by slug; `Ok(None)` when no such file exists
    pub fn get_post<S: AsRef<str>>(&self, slug: &[S]) -> Result<Option<Post>> {
        if slug.is_empty() || !slug.iter().all(|s| is_safe_segment(s.as_ref())) {
            return Ok(None);
        }

        let mut path = self.root.clone();
        for segment in slug {
            path.push(segment.as_ref());
        }
        let file_name = format!("{}.{}", slug[slug.len() - 1].as_ref(), self.extension);
        path.set_file_name(file_name);

        if !path.is_file() {
            return Ok(None);
        }

        let slug = slug.iter().map(|s| s.as_ref().to_string()).collect();
        load_post(&path, slug).map(Some).map_err(|e| e.in_file(&path))
    }

    /// Distinct group names, sorted
    pub fn list_groups(&self) -> Result<Vec<String>> {
        let groups: BTreeSet<String> = self
            .list_posts()?
            .into_iter()
            .filter_map(|p| p.group)
            .filter(|g| !g.is_empty())
            .collect();
        Ok(groups.into_iter().collect())
    }

    /// Posts of one group, newest first
    pub fn posts_in_group(&self, group: &str) -> Result<Vec<Post>> {
        Ok(self
            .list_posts()?
            .into_iter()
            .filter(|p| p.in_group(Some(group)))
            .collect())
    }

    /// Tags with their post counts, most used first
    pub fn list_tags(&self) -> Result<Vec<(String, usize)>> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for post in self.list_posts()? {
            for tag in post.tags {
                *counts.entry(tag).or_insert(0) += 1;
            }
        }
        let mut tags: Vec<_> = counts.into_iter().collect();
        tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Ok(tags)
    }

    /// Content files under the root in lexicographic order
    fn content_files(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            tracing::debug!("Content directory {:?} does not exist", self.root);
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => match self.policy {
                    ParseErrorPolicy::Skip => {
                        tracing::warn!("Skipping unreadable entry: {}", e);
                        continue;
                    }
                    ParseErrorPolicy::Fail => {
                        return Err(ContentError::Walk {
                            path: self.root.clone(),
                            source: e,
                        })
                    }
                },
            };
            let path = entry.path();
            if entry.file_type().is_file() && self.is_content_file(path) {
                files.push(path.to_path_buf());
            }
        }

        Ok(files)
    }

    fn is_content_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e == self.extension)
            .unwrap_or(false)
    }

    /// Relative path with the extension stripped, as path segments
    fn slug_for(&self, path: &Path) -> Option<Vec<String>> {
        let relative = path.strip_prefix(&self.root).ok()?.with_extension("");
        let slug: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        if slug.is_empty() {
            None
        } else {
            Some(slug)
        }
    }
}

/// Read and parse a single content file
fn load_post(path: &Path, slug: Vec<String>) -> Result<Post> {
    let raw = fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (fm, body) = FrontMatter::parse(&raw)?;
    let meta = PostMeta::from_front_matter(&fm);

    // Undated posts take the file mtime, stable across reads
    let fallback_date = match meta.date {
        Some(date) => date,
        None => file_modified(path).unwrap_or_else(Local::now),
    };

    Ok(Post::from_parts(slug, meta, body.to_string(), fallback_date))
}

fn file_modified(path: &Path) -> Option<DateTime<Local>> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Local>::from)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

/// A slug segment that maps to exactly one visible path component
fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.starts_with('.')
        && !segment.contains(['/', '\\', '\0'])
}
