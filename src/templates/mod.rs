//! Built-in page templates using the Tera template engine
//!
//! Templates are embedded in the binary. Each `render_*` method turns
//! indexed posts into one complete HTML page.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{MarkdownRenderer, Post};
use crate::helpers::{date_xml, format_date, html_escape, summary};

/// Length of the generated summary for posts without a description
const SUMMARY_LENGTH: usize = 160;

/// Page renderer with the embedded templates
#[derive(Debug, Clone)]
pub struct PageRenderer {
    tera: Tera,
    config: SiteConfig,
    markdown: MarkdownRenderer,
}

impl PageRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();

        // Values are escaped when the context is built; rendered markdown
        // must pass through untouched
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("pages/layout.html")),
            ("_post_item.html", include_str!("pages/_post_item.html")),
            ("home.html", include_str!("pages/home.html")),
            ("blog.html", include_str!("pages/blog.html")),
            ("post.html", include_str!("pages/post.html")),
            ("roadmap.html", include_str!("pages/roadmap.html")),
            ("not_found.html", include_str!("pages/not_found.html")),
        ])?;

        let markdown =
            MarkdownRenderer::with_options(&config.highlight.theme, config.highlight.line_number);

        Ok(Self {
            tera,
            config: config.clone(),
            markdown,
        })
    }

    pub fn markdown(&self) -> &MarkdownRenderer {
        &self.markdown
    }

    /// Home page: site intro and the most recent posts
    pub fn render_home(&self, posts: &[Post]) -> Result<String> {
        let recent: Vec<PostData> = posts
            .iter()
            .take(self.config.home_posts)
            .map(|p| self.post_data(p, false))
            .collect::<Result<_>>()?;

        let mut context = self.base_context();
        context.insert("posts", &recent);
        self.render("home.html", &context)
    }

    /// Blog index: ungrouped posts first, then one section per group
    pub fn render_blog_index(&self, posts: &[Post], groups: &[String]) -> Result<String> {
        let mut sections = Vec::with_capacity(groups.len() + 1);

        let ungrouped: Vec<PostData> = posts
            .iter()
            .filter(|p| p.in_group(None))
            .map(|p| self.post_data(p, false))
            .collect::<Result<_>>()?;
        if !ungrouped.is_empty() {
            sections.push(GroupData {
                name: None,
                posts: ungrouped,
            });
        }

        for group in groups {
            let grouped: Vec<PostData> = posts
                .iter()
                .filter(|p| p.in_group(Some(group.as_str())))
                .map(|p| self.post_data(p, false))
                .collect::<Result<_>>()?;
            sections.push(GroupData {
                name: Some(html_escape(group)),
                posts: grouped,
            });
        }

        let mut context = self.base_context();
        context.insert("groups", &sections);
        context.insert("total", &posts.len());
        self.render("blog.html", &context)
    }

    /// A single post with its rendered body
    pub fn render_post(&self, post: &Post) -> Result<String> {
        let data = self.post_data(post, true)?;

        let mut context = self.base_context();
        context.insert("has_diagrams", &data.content.contains(r#"class="mermaid""#));
        context.insert("post", &data);
        self.render("post.html", &context)
    }

    /// Roadmap page; `None` renders the empty roadmap
    pub fn render_roadmap(&self, markdown: Option<&str>) -> Result<String> {
        let content = markdown
            .map(|md| self.markdown.render(md))
            .transpose()?
            .unwrap_or_default();

        let mut context = self.base_context();
        context.insert("has_diagrams", &content.contains(r#"class="mermaid""#));
        context.insert("content", &content);
        self.render("roadmap.html", &context)
    }

    /// 404 page for an unknown path
    pub fn render_not_found(&self, path: &str) -> Result<String> {
        let mut context = self.base_context();
        context.insert("path", &html_escape(path));
        self.render("not_found.html", &context)
    }

    fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    fn base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert(
            "site",
            &SiteData {
                title: html_escape(&self.config.title),
                subtitle: html_escape(&self.config.subtitle),
                description: html_escape(&self.config.description),
                author: html_escape(&self.config.author),
                url: html_escape(&self.config.url),
            },
        );
        context.insert("has_diagrams", &false);
        context
    }

    /// Template view of a post; the body is only rendered when `with_content`
    fn post_data(&self, post: &Post, with_content: bool) -> Result<PostData> {
        let content = if with_content {
            self.markdown.render(&post.content)?
        } else {
            String::new()
        };

        let description = if !post.description.is_empty() {
            html_escape(&post.description)
        } else if with_content {
            html_escape(&summary(&content, SUMMARY_LENGTH))
        } else {
            String::new()
        };

        Ok(PostData {
            title: html_escape(&post.title),
            description,
            date: format_date(&post.date, &self.config.date_format),
            datetime: date_xml(&post.date),
            url: post.url_path(),
            tags: post.tags.iter().map(|t| html_escape(t)).collect(),
            group: post.group.as_deref().map(html_escape),
            content,
        })
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub title: String,
    pub description: String,
    pub date: String,
    pub datetime: String,
    pub url: String,
    pub tags: Vec<String>,
    pub group: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GroupData {
    pub name: Option<String>,
    pub posts: Vec<PostData>,
}
