//! Post model

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::PostMeta;
use crate::helpers::post_url;

/// A blog post, one content file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Path segments relative to the content root, extension stripped
    pub slug: Vec<String>,

    /// Post title
    pub title: String,

    /// Short summary, empty when not given
    pub description: String,

    /// Publication date; the file's modification time when front-matter has none
    pub date: DateTime<Local>,

    /// Post tags
    pub tags: Vec<String>,

    /// Raw markdown content
    pub content: String,

    /// First slug segment for posts in a subdirectory
    pub group: Option<String>,
}

impl Post {
    /// Assemble a post from its slug, normalized metadata and body.
    ///
    /// `fallback_date` is used when the front-matter carries no usable date.
    /// The slug must not be empty.
    pub fn from_parts(
        slug: Vec<String>,
        meta: PostMeta,
        content: String,
        fallback_date: DateTime<Local>,
    ) -> Self {
        debug_assert!(!slug.is_empty(), "post slug must not be empty");

        let title = meta
            .title
            .unwrap_or_else(|| slug.last().cloned().unwrap_or_default());
        let group = if slug.len() > 1 {
            slug.first().cloned()
        } else {
            None
        };

        Self {
            slug,
            title,
            description: meta.description.unwrap_or_default(),
            date: meta.date.unwrap_or(fallback_date),
            tags: meta.tags,
            content,
            group,
        }
    }

    /// Slug segments joined with `/`
    pub fn slug_path(&self) -> String {
        self.slug.join("/")
    }

    /// Whether the post sits in `group`; `None` matches top-level posts
    pub fn in_group(&self, group: Option<&str>) -> bool {
        self.group.as_deref() == group
    }

    /// Site-relative URL of the post page
    pub fn url_path(&self) -> String {
        post_url(&self.slug)
    }
}
