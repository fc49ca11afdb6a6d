//! List site content

use anyhow::{bail, Result};
use serde::Serialize;
use std::io::Write;

use crate::helpers::format_date;
use crate::Blog;

/// One post as printed by `list --json`
#[derive(Serialize)]
struct PostSummary<'a> {
    slug: &'a [String],
    title: &'a str,
    description: &'a str,
    date: String,
    tags: &'a [String],
    group: Option<&'a str>,
}

/// List site content by type, posts optionally limited to one group
pub fn run(blog: &Blog, content_type: &str, group: Option<&str>, json: bool) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_listing(blog, content_type, group, json, &mut out)
}

/// Write a listing of posts, groups or tags to `out`
pub fn write_listing<W: Write>(
    blog: &Blog,
    content_type: &str,
    group: Option<&str>,
    json: bool,
    out: &mut W,
) -> Result<()> {
    let index = blog.index();

    if group.is_some() && !matches!(content_type, "post" | "posts") {
        bail!("--group only applies to posts");
    }

    match content_type {
        "post" | "posts" => {
            let posts = match group {
                Some(group) => index.posts_in_group(group)?,
                None => index.list_posts()?,
            };
            if json {
                let summaries: Vec<PostSummary> = posts
                    .iter()
                    .map(|p| PostSummary {
                        slug: &p.slug,
                        title: &p.title,
                        description: &p.description,
                        date: p.date.to_rfc3339(),
                        tags: &p.tags,
                        group: p.group.as_deref(),
                    })
                    .collect();
                writeln!(out, "{}", serde_json::to_string_pretty(&summaries)?)?;
            } else {
                writeln!(out, "Posts ({}):", posts.len())?;
                for post in &posts {
                    writeln!(
                        out,
                        "  {} - {} [{}]",
                        format_date(&post.date, &blog.config.date_format),
                        post.title,
                        post.slug_path()
                    )?;
                }
            }
        }
        "group" | "groups" => {
            let groups = index.list_groups()?;
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&groups)?)?;
            } else {
                writeln!(out, "Groups ({}):", groups.len())?;
                for group in groups {
                    writeln!(out, "  {}", group)?;
                }
            }
        }
        "tag" | "tags" => {
            let tags = index.list_tags()?;
            if json {
                let map: indexmap::IndexMap<&str, usize> =
                    tags.iter().map(|(t, n)| (t.as_str(), *n)).collect();
                writeln!(out, "{}", serde_json::to_string_pretty(&map)?)?;
            } else {
                writeln!(out, "Tags ({}):", tags.len())?;
                for (tag, count) in tags {
                    writeln!(out, "  {} ({})", tag, count)?;
                }
            }
        }
        _ => {
            bail!(
                "Unknown type: {}. Available: post, group, tag",
                content_type
            );
        }
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
        let content = dir.path().join("content");
        fs::create_dir_all(content.join("patterns")).unwrap();
        fs::write(
            content.join("hello.md"),
            "---\ntitle: Hello\ndate: 2024-01-01\n---\n",
        )
        .unwrap();
        fs::write(
            content.join("patterns/saga.md"),
            "---\ntitle: Sagas\ndate: 2024-06-01\ntags: [sagas]\n---\n",
        )
        .unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        (dir, blog)
    }

    fn listing(blog: &Blog, kind: &str, json: bool) -> String {
        let mut out = Vec::new();
        write_listing(blog, kind, None, json, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_list_posts_text() {
        let (_dir, blog) = site();
        let text = listing(&blog, "posts", false);
        assert_eq!(
            text,
            "Posts (2):\n  2024-06-01 - Sagas [patterns/saga]\n  2024-01-01 - Hello [hello]\n"
        );
    }

    #[test]
    fn test_list_posts_json() {
        let (_dir, blog) = site();
        let value: serde_json::Value =
            serde_json::from_str(&listing(&blog, "post", true)).unwrap();
        assert_eq!(value[0]["slug"], serde_json::json!(["patterns", "saga"]));
        assert_eq!(value[0]["group"], "patterns");
        assert!(value[1]["group"].is_null());
    }

    #[test]
    fn test_list_groups_and_tags() {
        let (_dir, blog) = site();
        assert_eq!(listing(&blog, "groups", false), "Groups (1):\n  patterns\n");
        assert_eq!(listing(&blog, "tags", true), "{\n  \"sagas\": 1\n}\n");
    }

    #[test]
    fn test_list_posts_in_group() {
        let (_dir, blog) = site();
        let mut out = Vec::new();
        write_listing(&blog, "posts", Some("patterns"), false, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Posts (1):\n  2024-06-01 - Sagas [patterns/saga]\n"
        );

        let mut out = Vec::new();
        assert!(write_listing(&blog, "tags", Some("patterns"), false, &mut out).is_err());
    }

    #[test]
    fn test_list_unknown_type() {
        let (_dir, blog) = site();
        let mut out = Vec::new();
        assert!(write_listing(&blog, "pages", None, false, &mut out).is_err());
    }
}
