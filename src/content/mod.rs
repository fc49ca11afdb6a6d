//! Content module - post discovery, front-matter and markdown rendering

mod frontmatter;
pub mod indexer;
mod markdown;
mod meta;
mod post;

pub use frontmatter::FrontMatter;
pub use indexer::PostIndex;
pub use markdown::MarkdownRenderer;
pub use meta::{parse_date_string, PostMeta};
pub use post::Post;
