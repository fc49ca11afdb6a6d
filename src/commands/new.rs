//! Create a new post

use anyhow::{bail, Result};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::Blog;

/// Front-matter written into a fresh post
#[derive(Serialize)]
struct NewPostFrontMatter<'a> {
    title: &'a str,
    description: &'a str,
    date: String,
    tags: &'a [String],
}

/// Create a new post file, optionally inside a group directory
pub fn create_post(
    blog: &Blog,
    title: &str,
    group: Option<&str>,
    tags: &[String],
) -> Result<PathBuf> {
    let now = chrono::Local::now();

    let file_stem = slug::slugify(title);
    if file_stem.is_empty() {
        bail!("Cannot derive a file name from title {:?}", title);
    }

    let target_dir = match group {
        Some(group) => {
            let group = slug::slugify(group);
            if group.is_empty() {
                bail!("Invalid group name");
            }
            blog.content_dir.join(group)
        }
        None => blog.content_dir.clone(),
    };

    let file_path = target_dir.join(format!("{}.{}", file_stem, blog.config.content_extension));

    // Check if file already exists
    if file_path.exists() {
        bail!("File already exists: {:?}", file_path);
    }

    let front_matter = serde_yaml::to_string(&NewPostFrontMatter {
        title,
        description: "",
        date: now.format("%Y-%m-%d %H:%M:%S").to_string(),
        tags,
    })?;

    fs::create_dir_all(&target_dir)?;
    fs::write(&file_path, format!("---\n{}---\n\n", front_matter))?;

    tracing::info!("Created {:?}", file_path);
    Ok(file_path)
}
