//! Markdown rendering with syntax highlighting

use anyhow::Result;
use lazy_static::lazy_static;
use pulldown_cmark::{
    html, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd,
};
use std::collections::HashMap;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::helpers::html_escape;

lazy_static! {
    static ref SYNTAX_SET: SyntaxSet = SyntaxSet::load_defaults_newlines();
    static ref THEME_SET: ThemeSet = ThemeSet::load_defaults();
}

/// Fence language whose blocks are handed to the client-side diagram script
const DIAGRAM_LANG: &str = "mermaid";

/// Markdown renderer with syntax highlighting
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    theme_name: String,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", false)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool) -> Self {
        if !THEME_SET.themes.contains_key(theme) {
            tracing::warn!("Unknown highlight theme {:?}, code will not be colored", theme);
        }
        Self {
            theme_name: theme.to_string(),
            line_numbers,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        // Front-matter is stripped before rendering, so no metadata blocks
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();

        let mut code_block: Option<Option<String>> = None;
        let mut code_content = String::new();

        let mut heading: Option<(HeadingLevel, Option<String>)> = None;
        let mut heading_events: Vec<Event> = Vec::new();
        let mut anchors = AnchorSet::default();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => fence_language(&info),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some(lang);
                    code_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(lang) = code_block.take() {
                        let block = self.code_block_html(&code_content, lang.as_deref());
                        events.push(Event::Html(CowStr::from(block)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    code_content.push_str(&text);
                }
                Event::Start(Tag::Heading { level, id, .. }) => {
                    heading = Some((level, id.map(|id| id.to_string())));
                    heading_events.clear();
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((level, explicit_id)) = heading.take() {
                        let block = anchors.heading_html(level, explicit_id, &heading_events);
                        events.push(Event::Html(CowStr::from(block)));
                    }
                }
                event if heading.is_some() => heading_events.push(event),
                event => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    fn code_block_html(&self, code: &str, lang: Option<&str>) -> String {
        match lang {
            Some(DIAGRAM_LANG) => {
                format!(r#"<pre class="mermaid">{}</pre>"#, html_escape(code))
            }
            lang => self.highlight_code(code, lang),
        }
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        // Try to find syntax for the language
        let syntax = SYNTAX_SET
            .find_syntax_by_token(lang)
            .or_else(|| SYNTAX_SET.find_syntax_by_extension(lang))
            .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());

        let highlighted = THEME_SET
            .themes
            .get(&self.theme_name)
            .and_then(|theme| highlighted_html_for_string(code, &SYNTAX_SET, syntax, theme).ok());

        let class = html_escape(lang);
        match highlighted {
            Some(highlighted) if self.line_numbers => {
                self.add_line_numbers(&highlighted, code, &class)
            }
            Some(highlighted) => {
                format!(r#"<figure class="highlight {}">{}</figure>"#, class, highlighted)
            }
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                class,
                html_escape(code)
            ),
        }
    }

    /// Add a line-number gutter next to highlighted code
    fn add_line_numbers(&self, highlighted: &str, code: &str, class: &str) -> String {
        let gutter: Vec<String> = (1..=code.lines().count().max(1))
            .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
            .collect();

        format!(
            r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
            class,
            gutter.join("\n"),
            highlighted
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Language token of a fence info string (`rust,ignore` -> `rust`)
fn fence_language(info: &str) -> Option<String> {
    info.split(|c: char| c == ',' || c == '{' || c.is_whitespace())
        .next()
        .filter(|lang| !lang.is_empty())
        .map(|lang| lang.to_ascii_lowercase())
}

/// Hands out unique heading ids within one document
#[derive(Default)]
struct AnchorSet {
    seen: HashMap<String, usize>,
}

impl AnchorSet {
    fn unique(&mut self, base: String) -> String {
        let base = if base.is_empty() {
            "section".to_string()
        } else {
            base
        };
        let count = self.seen.entry(base.clone()).or_insert(0);
        let id = if *count == 0 {
            base
        } else {
            format!("{}-{}", base, count)
        };
        *count += 1;
        id
    }

    fn heading_html(
        &mut self,
        level: HeadingLevel,
        explicit_id: Option<String>,
        inner: &[Event],
    ) -> String {
        let text: String = inner
            .iter()
            .filter_map(|e| match e {
                Event::Text(t) | Event::Code(t) => Some(t.as_ref()),
                _ => None,
            })
            .collect();
        let id = self.unique(explicit_id.unwrap_or_else(|| slug::slugify(&text)));

        let mut inner_html = String::new();
        html::push_html(&mut inner_html, inner.iter().cloned());

        let tag = heading_tag(level);
        format!(
            r##"<{tag} id="{id}"><a class="anchor" href="#{id}" aria-hidden="true">#</a>{inner_html}</{tag}>"##
        ) + "\n"
    }
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}
