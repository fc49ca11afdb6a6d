//! Initialize a new blog site

use anyhow::{bail, Result};
use std::fs;
use std::path::Path;

use crate::CONFIG_FILE;

const DEFAULT_CONFIG: &str = r#"# Site
title: Tech Blog
subtitle: ''
description: ''
author: ''
url: http://localhost:4000

# Directory
content_dir: content
content_extension: md
static_dir: static
roadmap_file: roadmap.md

# Indexing: skip | fail
on_parse_error: skip

# Presentation
home_posts: 5
date_format: YYYY-MM-DD
highlight:
  theme: base16-ocean.dark
  line_number: false

# Server
server:
  ip: 127.0.0.1
  port: 4000
"#;

const SAMPLE_POST: &str = r#"---
title: Hello World
description: The first post on this blog
date: 2024-01-01
tags: [meta]
---

Posts are Markdown files under `content/`. Put a post in a subdirectory
to place it in a group.

```rust
fn main() {
    println!("hello");
}
```
"#;

const SAMPLE_ROADMAP: &str = r#"- [x] Set up the blog
- [ ] Write the first real post
"#;

const DEFAULT_STYLE: &str = r#"body { max-width: 46rem; margin: 0 auto; padding: 1rem; font-family: sans-serif; line-height: 1.6; }
.site-header { display: flex; justify-content: space-between; align-items: baseline; }
.site-header nav a { margin-left: 1rem; }
.post-list { list-style: none; padding: 0; }
.post-item time { color: #777; margin-left: .5rem; font-size: .9em; }
.post-tags { list-style: none; padding: 0; display: flex; gap: .5rem; }
.anchor { margin-right: .4rem; text-decoration: none; opacity: .3; }
figure.highlight { margin: 0; overflow-x: auto; }
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        bail!("A site already exists in {:?}", target_dir);
    }

    fs::create_dir_all(target_dir.join("content"))?;
    fs::create_dir_all(target_dir.join("static"))?;

    fs::write(&config_path, DEFAULT_CONFIG)?;
    write_if_missing(&target_dir.join("content/hello-world.md"), SAMPLE_POST)?;
    write_if_missing(&target_dir.join("roadmap.md"), SAMPLE_ROADMAP)?;
    write_if_missing(&target_dir.join("static/style.css"), DEFAULT_STYLE)?;

    tracing::info!("Initialized site in {:?}", target_dir);
    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if !path.exists() {
        fs::write(path, content)?;
    }
    Ok(())
}
