//! Show a single post

use anyhow::{bail, Result};
use std::io::Write;

use crate::content::MarkdownRenderer;
use crate::helpers::{format_date, full_url_for, slug_from_path};
use crate::Blog;

/// Print one post looked up by its `a/b` slug
pub fn run(blog: &Blog, slug: &str, html: bool) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_post(blog, slug, html, &mut out)
}

/// Write a post's metadata followed by its raw or rendered body
pub fn write_post<W: Write>(blog: &Blog, slug: &str, html: bool, out: &mut W) -> Result<()> {
    let segments = slug_from_path(slug);
    let Some(post) = blog.index().get_post(&segments)? else {
        bail!("Post not found: {}", slug);
    };

    writeln!(out, "title:       {}", post.title)?;
    writeln!(
        out,
        "date:        {}",
        format_date(&post.date, &blog.config.date_format)
    )?;
    if !post.description.is_empty() {
        writeln!(out, "description: {}", post.description)?;
    }
    if let Some(group) = &post.group {
        writeln!(out, "group:       {}", group)?;
    }
    if !post.tags.is_empty() {
        writeln!(out, "tags:        {}", post.tags.join(", "))?;
    }
    writeln!(out, "url:         {}", full_url_for(&blog.config, &post.url_path()))?;
    writeln!(out)?;

    if html {
        let renderer = MarkdownRenderer::with_options(
            &blog.config.highlight.theme,
            blog.config.highlight.line_number,
        );
        write!(out, "{}", renderer.render(&post.content)?)?;
    } else {
        write!(out, "{}", post.content)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> (TempDir, Blog) {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("content/tutorials");
        fs::create_dir_all(&content).unwrap();
        fs::write(
            content.join("getting-started.md"),
            "---\ntitle: Getting Started\ndate: 2024-02-03\ntags: [intro]\n---\n\n## Step one\n",
        )
        .unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        (dir, blog)
    }

    #[test]
    fn test_show_raw() {
        let (_dir, blog) = site();
        let mut out = Vec::new();
        write_post(&blog, "tutorials/getting-started", false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("title:       Getting Started\ndate:        2024-02-03\n"));
        assert!(text.contains("group:       tutorials\n"));
        assert!(text.contains("url:         http://localhost:4000/blog/tutorials/getting-started\n"));
        assert!(text.ends_with("\n## Step one\n"));
    }

    #[test]
    fn test_show_html() {
        let (_dir, blog) = site();
        let mut out = Vec::new();
        write_post(&blog, "/tutorials/getting-started/", true, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(r#"<h2 id="step-one">"#));
    }

    #[test]
    fn test_show_missing() {
        let (_dir, blog) = site();
        let mut out = Vec::new();
        let err = write_post(&blog, "nonexistent", false, &mut out).unwrap_err();
        assert!(err.to_string().contains("Post not found"));
    }
}
